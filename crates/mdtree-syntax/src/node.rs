//! Node kinds and per-kind payloads.

use serde::Serialize;

/// Every kind of node the parser can produce.
///
/// Renderers dispatch on this. The structural marker kinds
/// (`*OpenMarker`, `*CloseMarker`, [`NodeKind::BlockquoteMarker`]) keep the
/// delimiters of their parent in the tree but carry no meaning of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NodeKind {
    // === Blocks ===
    Document,
    Paragraph,
    Heading,
    ThematicBreak,
    Blockquote,
    BlockquoteMarker,
    List,
    ListItem,
    TaskListItemMarker,
    CodeBlock,
    HtmlBlock,
    MathBlock,
    MathBlockOpenMarker,
    MathBlockContent,
    MathBlockCloseMarker,
    Table,
    TableHead,
    TableRow,
    TableCell,

    // === Inlines ===
    Text,
    CodeSpan,
    Emphasis,
    EmAsteriskOpenMarker,
    EmAsteriskCloseMarker,
    EmUnderscoreOpenMarker,
    EmUnderscoreCloseMarker,
    Strong,
    StrongAsteriskOpenMarker,
    StrongAsteriskCloseMarker,
    StrongUnderscoreOpenMarker,
    StrongUnderscoreCloseMarker,
    Strikethrough,
    Strikethrough1OpenMarker,
    Strikethrough1CloseMarker,
    Strikethrough2OpenMarker,
    Strikethrough2CloseMarker,
    Link,
    Image,
    HardBreak,
    SoftBreak,
    InlineHtml,
    InlineMath,
    InlineMathOpenMarker,
    InlineMathContent,
    InlineMathCloseMarker,
    Emoji,
    EmojiUnicode,
    EmojiImg,
    EmojiAlias,
}

impl NodeKind {
    /// Delimiter kinds that only mirror their parent's syntax.
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            Self::BlockquoteMarker
                | Self::MathBlockOpenMarker
                | Self::MathBlockCloseMarker
                | Self::EmAsteriskOpenMarker
                | Self::EmAsteriskCloseMarker
                | Self::EmUnderscoreOpenMarker
                | Self::EmUnderscoreCloseMarker
                | Self::StrongAsteriskOpenMarker
                | Self::StrongAsteriskCloseMarker
                | Self::StrongUnderscoreOpenMarker
                | Self::StrongUnderscoreCloseMarker
                | Self::Strikethrough1OpenMarker
                | Self::Strikethrough1CloseMarker
                | Self::Strikethrough2OpenMarker
                | Self::Strikethrough2CloseMarker
                | Self::InlineMathOpenMarker
                | Self::InlineMathCloseMarker
        )
    }

    /// Kinds whose text is handed to the inline parser after block parsing.
    pub fn has_inline_content(self) -> bool {
        matches!(self, Self::Paragraph | Self::Heading | Self::TableCell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListType {
    Bullet,
    Ordered,
    /// A list whose first item carries a task marker
    Task,
}

/// Payload of a [`NodeKind::List`] node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListData {
    pub typ: ListType,
    /// `-`, `*` or `+`; `None` for ordered lists
    pub bullet_char: Option<char>,
    pub bullet: bool,
    /// First ordinal of an ordered list (1 for bullet lists)
    pub start: u32,
    /// Set once every item has been parsed
    pub tight: bool,
    /// Columns of whitespace before the first marker
    pub indent_width: usize,
    /// Marker text of the first item (`-`, `1.`, `3)`)
    pub marker: String,
    /// Marker plus the whitespace after it, in columns
    pub marker_width: usize,
    /// `.` or `)` for ordered lists
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItemData {
    pub marker: String,
    pub tight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkData {
    pub destination: String,
    pub title: Option<String>,
}

/// Kind-specific data carried by a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum NodeData {
    #[default]
    None,
    List(ListData),
    ListItem(ListItemData),
    Heading {
        level: u8,
    },
    TaskListItem {
        checked: bool,
    },
    CodeBlock {
        info: Option<String>,
    },
    Link(LinkData),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_markers() {
        assert!(NodeKind::BlockquoteMarker.is_marker());
        assert!(NodeKind::EmAsteriskOpenMarker.is_marker());
        assert!(NodeKind::InlineMathCloseMarker.is_marker());
    }

    #[test]
    fn content_kinds_are_not_markers() {
        assert!(!NodeKind::Text.is_marker());
        assert!(!NodeKind::MathBlockContent.is_marker());
        assert!(!NodeKind::TaskListItemMarker.is_marker());
    }

    #[test]
    fn inline_content_kinds() {
        assert!(NodeKind::Paragraph.has_inline_content());
        assert!(NodeKind::TableCell.has_inline_content());
        assert!(!NodeKind::CodeBlock.has_inline_content());
    }
}
