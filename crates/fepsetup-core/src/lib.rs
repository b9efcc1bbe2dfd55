//! # fepsetup
//!
//! Building blocks for setting up relative free-energy networks of small
//! molecules: ligands with a content-derived identity, and a pluggable
//! contract for proposing atom mappings between them.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers, each depending only on the ones
//! above it in this list.
//!
//! - **[`core`]: The Toolkit.** Molecules with property tags, the V2000
//!   molfile and SDF codecs, and canonical SMILES generation.
//!
//! - **[`ligand`]: Identity.** `LigandMolecule` owns a structure, resolves its
//!   name, stamps identity tags, and compares, hashes, and sorts by canonical
//!   SMILES and name. It round-trips through a single SDF record.
//!
//! - **[`mapping`]: Strategies.** The `AtomMapper` trait, whose provided
//!   `suggest_mappings` lazily delegates to each strategy's required
//!   `mappings_generator`, plus the mapping value types it yields.

pub mod core;
pub mod ligand;
pub mod mapping;

#[cfg(test)]
mod fixtures;
