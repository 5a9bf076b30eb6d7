use std::sync::Arc;

use client::ClientError;
use engine::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid timezone: {0}")]
    Timezone(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to load: {0}")]
    Fetch(Arc<ClientError>),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Input(String),
    #[error("server returned {received} of {expected} newer transactions, balances would be wrong")]
    PartialHistory { expected: u64, received: usize },
}
