use arcstr::ArcStr;
use thiserror::Error;

use crate::netlist::MasterId;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("no template for cell {0}")]
    TemplateNotFound(MasterId),

    #[error("master not found: {0}")]
    MasterNotFound(MasterId),

    #[error("instance not found: {0}")]
    InstanceNotFound(ArcStr),

    #[error("instance {inst} has no terminal named {term}")]
    TerminalNotFound { inst: ArcStr, term: ArcStr },

    #[error("pin not found: {0}")]
    PinNotFound(ArcStr),

    #[error("pin already exists: {0}")]
    DuplicatePin(ArcStr),

    #[error("cannot rename pin {old} to {new}: name already in use")]
    PinRenameConflict { old: ArcStr, new: ArcStr },

    #[error("instance {0} has already been designed")]
    AlreadyDesigned(ArcStr),

    #[error("instance already exists: {0}")]
    DuplicateInstance(ArcStr),

    #[error("configuration error: {0}")]
    ConfigurationInvariant(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error parsing TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("error serializing/deserializing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Shorthand for a [`ComposeError::ConfigurationInvariant`] with a formatted message.
macro_rules! config_err {
    ($($arg:tt)*) => {
        $crate::error::ComposeError::ConfigurationInvariant(format!($($arg)*))
    };
}

pub(crate) use config_err;
