use crate::core::canon::aromaticity::{self, AromaticForm, KekulizationError};
use crate::core::canon::ranking::CanonicalRanking;
use crate::core::canon::stereo::Chirality;
use crate::core::models::molecule::Molecule;
use crate::core::models::properties::PropertyMap;
use nalgebra::Point3;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForceFieldError {
    #[error("Undefined stereochemistry at atoms {atoms:?}")]
    UndefinedStereochemistry { atoms: Vec<usize> },
    #[error(transparent)]
    Kekulization(#[from] KekulizationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForceFieldAtom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
    /// Handedness relative to the atom's bonds in bond order, with the
    /// implicit hydrogen last. `None` for non-stereogenic or undefined centres.
    pub chirality: Option<Chirality>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceFieldBond {
    pub atom1: usize,
    pub atom2: usize,
    /// Integer Kekulé order.
    pub bond_order: u8,
    pub is_aromatic: bool,
}

/// Molecule in the shape expected by force-field parameterization: integer
/// bond orders, per-atom stereo, and exactly one conformer.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceFieldMolecule {
    pub name: String,
    pub atoms: Vec<ForceFieldAtom>,
    pub bonds: Vec<ForceFieldBond>,
    pub conformer: Vec<Point3<f64>>,
    pub properties: PropertyMap,
}

impl ForceFieldMolecule {
    /// Converts a structural molecule.
    ///
    /// Aromatic bonds are replaced by a Kekulé structure and aromaticity is
    /// perceived afresh, so Kekulé and aromatic drawings convert alike. With
    /// `allow_undefined_stereo` unset, any stereocentre or stereogenic double
    /// bond whose configuration the coordinates leave open is an error. The
    /// name starts out as the molecule's title.
    pub fn from_molecule(
        mol: &Molecule,
        allow_undefined_stereo: bool,
    ) -> Result<Self, ForceFieldError> {
        let kekule = aromaticity::kekulize(mol)?;
        let ranking = CanonicalRanking::from_form(AromaticForm::from_kekule(kekule));

        let mut undefined: Vec<usize> = ranking
            .stereocenters
            .iter()
            .filter(|c| !c.is_defined())
            .map(|c| c.center)
            .chain(
                ranking
                    .double_bonds
                    .iter()
                    .filter(|d| !d.is_defined())
                    .flat_map(|d| d.atoms),
            )
            .collect();
        undefined.sort_unstable();
        undefined.dedup();
        if !undefined.is_empty() {
            if !allow_undefined_stereo {
                return Err(ForceFieldError::UndefinedStereochemistry { atoms: undefined });
            }
            debug!(atoms = ?undefined, "Tolerating undefined stereochemistry");
        }

        let form = &ranking.form;
        let kekule = form.molecule();
        let atoms = kekule
            .atoms()
            .iter()
            .enumerate()
            .map(|(idx, atom)| ForceFieldAtom {
                atomic_number: atom.element.atomic_number(),
                formal_charge: atom.formal_charge,
                is_aromatic: form.is_aromatic_atom(idx),
                implicit_hydrogens: kekule.implicit_hydrogens(idx),
                chirality: ranking.stereocenter(idx).and_then(|c| c.chirality),
            })
            .collect();

        let bonds = kekule
            .bonds()
            .iter()
            .enumerate()
            .map(|(idx, bond)| ForceFieldBond {
                atom1: bond.atom1,
                atom2: bond.atom2,
                bond_order: bond.order.half_units() / 2,
                is_aromatic: form.is_aromatic_bond(idx),
            })
            .collect();

        Ok(Self {
            name: mol.title().to_string(),
            atoms,
            bonds,
            conformer: mol.atoms().iter().map(|a| a.position).collect(),
            properties: mol.properties().clone(),
        })
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}
