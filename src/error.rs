use std::io;

use crate::config::ConfigError;
use crate::rebase::RebaseError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] io::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Rebase(#[from] RebaseError),
}
