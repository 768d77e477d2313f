use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not start a list: {line:?}")]
    NotAListStart { line: String },
}
