//! # Mapping Module
//!
//! The contract every atom-mapping strategy implements, and the values those
//! strategies produce.
//!
//! ## Overview
//!
//! A strategy implements [`AtomMapper::mappings_generator`]. Callers use the
//! provided [`AtomMapper::suggest_mappings`], which does no matching of its
//! own: it defers to the generator on first consumption and forwards its
//! results, stopping at the first error. [`LigandAtomMapper`] is the base
//! mapper with no generator, and reports [`MappingError::AbstractMethod`].
//!
//! ## Key Components
//!
//! - [`AtomMapper`] - The strategy trait.
//! - [`Suggestions`] - The lazy, single-pass result sequence.
//! - [`AtomMapping`] - An ordered, injective atom index correspondence.
//! - [`LigandAtomMapping`] - A mapping bound to the two ligands it relates.

pub mod atom_mapping;
pub mod error;
pub mod mapper;

pub use atom_mapping::{AtomMapping, LigandAtomMapping};
pub use error::{InvalidMappingKind, MappingError};
pub use mapper::{
    AtomMapper, LigandAtomMapper, MappingStream, SuggestionPhase, Suggestions,
    suggest_ligand_mappings,
};
