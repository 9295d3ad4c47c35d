use thiserror::Error;

use crate::options::OptionsError;

pub type Result<T> = std::result::Result<T, TerminalError>;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Options(#[from] OptionsError),
}
