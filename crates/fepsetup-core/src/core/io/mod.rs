//! Provides input/output functionality for the MDL file formats.
//!
//! This module contains the V2000 molfile codec and the structure-data file
//! (SDF) layer built on top of it. Both share the [`traits::MolecularFile`]
//! interface for reading from and writing to buffered streams and paths.

pub mod molfile;
pub mod sdf;
pub mod traits;
