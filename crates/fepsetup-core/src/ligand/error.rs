use super::config::ConfigError;
use super::forcefield::ForceFieldError;
use crate::core::io::sdf::SdfError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LigandError {
    #[error("Unable to load ligand: {reason}")]
    MalformedInput {
        reason: String,
        #[source]
        source: Option<SdfError>,
    },
    #[error("SDF input contains at least {count} molecules, expected exactly 1")]
    Multiplicity { count: usize },
    #[error("Conversion from {representation} is not supported")]
    UnsupportedConversion { representation: &'static str },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot serialize ligand: {0}")]
    Serialization(#[source] SdfError),
    #[error("Force-field conversion failed: {0}")]
    ForceField(#[from] ForceFieldError),
    #[error("Invalid identity configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Toolkit conversion failed: {0}")]
    Toolkit(#[source] Box<dyn std::error::Error + Send + Sync>),
}
