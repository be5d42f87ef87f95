use thiserror::Error;

#[derive(Debug, Error)]
pub enum RebaseError {
    #[error("invalid rebase parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("division by zero: rebase multiplier is zero")]
    ZeroMultiplier,
    #[error("invalid perks pool address: {0}")]
    InvalidPerksPool(String),
    #[error("failed to parse rebase configuration: {0}")]
    Config(String),
}
