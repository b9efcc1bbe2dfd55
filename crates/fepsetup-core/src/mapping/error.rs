use crate::core::utils::identifiers::short_type_name;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidMappingKind {
    #[error("atom {index} of molecule 1 is mapped more than once")]
    DuplicateSource { index: usize },
    #[error("atom {index} of molecule 2 is the target of more than one atom")]
    DuplicateTarget { index: usize },
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("'{mapper}' is abstract and does not implement '{method}'")]
    AbstractMethod {
        mapper: &'static str,
        method: &'static str,
    },
    #[error("Invalid atom mapping: {0}")]
    InvalidMapping(#[from] InvalidMappingKind),
    #[error("Atom index {index} is out of range for molecule {molecule} with {atom_count} atoms")]
    AtomOutOfRange {
        molecule: u8,
        index: usize,
        atom_count: usize,
    },
    #[error("Mapping generator failed: {0}")]
    Generator(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Error for a required generation step that `T` does not provide, named by
/// the type's unqualified name.
pub fn abstract_method<T: ?Sized>(method: &'static str) -> MappingError {
    MappingError::AbstractMethod {
        mapper: short_type_name::<T>(),
        method,
    }
}
