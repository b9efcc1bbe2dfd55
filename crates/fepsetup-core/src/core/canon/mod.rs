//! Canonical signatures for ligands.
//!
//! Every drawing is first normalized to a Kekulé form in which aromatic rings
//! are perceived by Hückel's rule ([`aromaticity`], over the rings found by
//! [`rings`]). Atoms are then partitioned into symmetry classes by iterated
//! neighbourhood hashing ([`ranking`]). The classes decide which atoms are
//! tetrahedral stereocentres and which double bonds carry cis/trans stereo
//! ([`stereo`]); their configurations are folded back into the refinement
//! before the remaining ties are broken. The resulting total order drives the
//! SMILES writer ([`smiles`]), whose output serves as the structural half of a
//! ligand's identity.

pub mod aromaticity;
pub mod ranking;
pub mod rings;
pub mod smiles;
pub mod stereo;

pub use aromaticity::{AromaticForm, KekulizationError};
pub use ranking::CanonicalRanking;
pub use smiles::canonical_smiles;
pub use stereo::{BondConfiguration, Chirality, DoubleBondStereo, Neighbor, TetrahedralCenter};
