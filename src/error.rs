use thiserror::Error;

use crate::marker::Marker;

#[derive(Error, Debug)]
pub enum IntermarkError {
    #[error("Interface {interface} is already bound to {bound} and cannot be rebound to {requested}")]
    ConflictingMarker {
        interface: String,
        bound: Marker,
        requested: Marker,
    },
    #[error("Interface {interface} (argument {position}) has no bound marker")]
    UnboundInterface { interface: String, position: usize },
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IntermarkError>;

// Helper conversions
impl From<config::ConfigError> for IntermarkError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
