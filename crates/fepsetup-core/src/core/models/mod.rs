//! # Core Models Module
//!
//! This module contains the structural representation of small-molecule ligands
//! that every other part of the library builds on.
//!
//! ## Overview
//!
//! A [`molecule::Molecule`] owns its atoms, bonds and an ordered bag of string
//! property tags. Derived chemistry (implicit hydrogens, aromatic atoms, the
//! dimensionality of the coordinates) is computed on demand from the stored
//! topology rather than cached on the atoms.
//!
//! ## Key Components
//!
//! - [`element`] - Chemical elements, symbol lookup and default valences
//! - [`atom`] - Individual atoms with coordinates, charge, isotope and radicals
//! - [`topology`] - Bond orders, wedge annotations and bonds
//! - [`properties`] - Insertion-ordered property tags written to SDF data items
//! - [`molecule`] - The complete molecule with cached adjacency
//!
//! ## Usage
//!
//! ```ignore
//! use fepsetup::core::models::{atom::Atom, element::Element, molecule::Molecule};
//! use fepsetup::core::models::topology::BondOrder;
//!
//! let mut mol = Molecule::new();
//! let c = mol.add_atom(Atom::new(Element::CARBON, Point3::origin()));
//! let o = mol.add_atom(Atom::new(Element::OXYGEN, Point3::new(1.43, 0.0, 0.0)));
//! mol.add_bond(c, o, BondOrder::Single);
//! mol.properties_mut().set("source", "manual");
//! ```

pub mod atom;
pub mod element;
pub mod molecule;
pub mod properties;
pub mod topology;
