//! # Core Module
//!
//! The toolkit layer of the library: everything needed to hold a ligand in
//! memory, move it in and out of the MDL file formats, and derive a canonical
//! signature from its connectivity.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds, property tags and molecules
//! - **File I/O** ([`io`]) - The V2000 molfile codec and the SDF record reader/writer
//! - **Canonicalization** ([`canon`]) - Aromaticity perception, atom ranking, stereo perception and canonical SMILES
//! - **Utilities** ([`utils`]) - Small helpers shared by the layers above
//!
//! Nothing in this module knows about ligand identity or atom mappings; those
//! live in [`crate::ligand`] and [`crate::mapping`] and only consume the types
//! defined here.

pub mod canon;
pub mod io;
pub mod models;
pub mod utils;
