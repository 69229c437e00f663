use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimerError>;

#[derive(Error, Debug)]
pub enum TimerError {
    #[error("Invalid font name: {0}")]
    InvalidStyle(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
