//! # Ligand Module
//!
//! Canonical, hashable ligands that survive a round trip through SDF text.
//!
//! ## Overview
//!
//! A [`LigandMolecule`] takes ownership of a structural [`Molecule`](crate::core::models::molecule::Molecule),
//! resolves its display name, stamps the identity tags onto its property map,
//! and derives a [`LigandHash`] from the canonical SMILES and the name. All
//! equality, hashing, and ordering goes through that hash.
//!
//! ## Key Components
//!
//! - [`LigandMolecule`] - The identity wrapper with SDF and toolkit conversions.
//! - [`LigandHash`] - SMILES and name plus a stable SHA-256 digest.
//! - [`IdentityConfig`] - The property tags and version string to stamp.
//! - [`ForceFieldMolecule`] - Kekulé form with per-atom stereo for parameterization.
//! - [`LigandError`] - Failures while loading or converting ligands.

pub mod config;
pub mod error;
pub mod forcefield;
pub mod hashing;
pub mod molecule;

pub use config::IdentityConfig;
pub use error::LigandError;
pub use forcefield::{ForceFieldError, ForceFieldMolecule};
pub use hashing::LigandHash;
pub use molecule::{LigandMolecule, LigandMoleculeBuilder, NameConflictWarning};
