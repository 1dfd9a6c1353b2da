use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Mine count does not fit the board")]
    InvalidConfiguration,
    #[error("Location outside the board")]
    OutOfRange,
}

pub type Result<T> = core::result::Result<T, BoardError>;
