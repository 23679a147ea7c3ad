use thiserror::Error;

pub mod app_config;
pub mod audience;
mod config;
pub mod product;
pub mod write_op;

pub use app_config::{AppConfig, Environment};
pub use audience::{AudienceTag, AudienceVocab};
pub use config::{load_app_config, load_app_config_from_env};
pub use product::{CanonicalProduct, ImageRef};
pub use write_op::WriteOp;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
