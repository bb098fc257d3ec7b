use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Cell coordinates outside the 3x3 grid")]
    InvalidCell,
    #[error("Serialized pattern contains a byte outside the grid range")]
    InvalidEncoding,
    #[error("Saved display mode ordinal is unknown")]
    InvalidDisplayMode,
    #[error("Animate mode needs a non-empty pattern")]
    NothingToAnimate,
}

pub type Result<T> = core::result::Result<T, PatternError>;
