/// A cursor for character-by-character inline parsing.
///
/// Works on bytes for the ASCII delimiters and steps over whole characters
/// for everything else, so slicing `s` at the cursor is always valid.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Peeks `n` bytes ahead.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    /// The character before the cursor, if any.
    pub fn prev_char(&self) -> Option<char> {
        self.s[..self.i].chars().next_back()
    }

    /// Everything from the cursor on.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Length of the run of byte `b` starting at the cursor.
    pub fn run_len(&self, b: u8) -> usize {
        self.s.as_bytes()[self.i..]
            .iter()
            .take_while(|&&c| c == b)
            .count()
    }

    /// Advances over one character, returning it.
    pub fn bump_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes. The caller keeps `i` on a char boundary.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }
}
