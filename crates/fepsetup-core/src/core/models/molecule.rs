use super::atom::Atom;
use super::properties::PropertyMap;
use super::topology::{Bond, BondOrder};

const PLANARITY_TOLERANCE: f64 = 1e-4;

/// An in-memory ligand structure: atoms, bonds, coordinates and property tags.
///
/// Atoms and bonds are addressed by their insertion index, which is also the
/// index used by atom mappings and by the molfile atom block (offset by one).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// Free-text title, stored on the first line of a molfile.
    title: String,
    /// Atoms in file order.
    atoms: Vec<Atom>,
    /// Bonds in file order.
    bonds: Vec<Bond>,
    /// Cached adjacency list of `(neighbor, bond index)` pairs, indexed by atom.
    bond_adjacency: Vec<Vec<(usize, usize)>>,
    /// Property tags written as SDF data items.
    properties: PropertyMap,
}

impl Molecule {
    /// Creates a new, empty molecule.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Retrieves an atom by its index.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the index is in range, otherwise `None`.
    pub fn atom(&self, idx: usize) -> Option<&Atom> {
        self.atoms.get(idx)
    }

    pub fn atom_mut(&mut self, idx: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(idx)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond(&self, idx: usize) -> Option<&Bond> {
        self.bonds.get(idx)
    }

    pub fn bond_mut(&mut self, idx: usize) -> Option<&mut Bond> {
        self.bonds.get_mut(idx)
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.bond_adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a bond between two atoms.
    ///
    /// Adding a bond that already exists is a no-op and returns the index of
    /// the existing bond; its order is left unchanged.
    ///
    /// # Arguments
    ///
    /// * `atom1` - Index of the first atom.
    /// * `atom2` - Index of the second atom.
    /// * `order` - The bond order.
    ///
    /// # Return
    ///
    /// Returns `Some(bond index)` on success, or `None` if either atom is out
    /// of range or both indices refer to the same atom.
    pub fn add_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> Option<usize> {
        if atom1 == atom2 || atom1 >= self.atoms.len() || atom2 >= self.atoms.len() {
            return None;
        }
        if let Some(existing) = self.bond_index_between(atom1, atom2) {
            return Some(existing);
        }
        let idx = self.bonds.len();
        self.bonds.push(Bond::new(atom1, atom2, order));
        self.bond_adjacency[atom1].push((atom2, idx));
        self.bond_adjacency[atom2].push((atom1, idx));
        Some(idx)
    }

    /// Returns the `(neighbor, bond index)` pairs of an atom.
    pub fn bonded(&self, idx: usize) -> &[(usize, usize)] {
        self.bond_adjacency.get(idx).map_or(&[], Vec::as_slice)
    }

    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonded(idx).iter().map(|&(nb, _)| nb)
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.bonded(idx).len()
    }

    pub fn bond_index_between(&self, atom1: usize, atom2: usize) -> Option<usize> {
        self.bonded(atom1)
            .iter()
            .find(|&&(nb, _)| nb == atom2)
            .map(|&(_, bond)| bond)
    }

    pub fn bond_between(&self, atom1: usize, atom2: usize) -> Option<&Bond> {
        self.bond_index_between(atom1, atom2)
            .and_then(|idx| self.bonds.get(idx))
    }

    /// Whether the atom takes part in at least one aromatic bond.
    pub fn is_aromatic_atom(&self, idx: usize) -> bool {
        self.bonded(idx)
            .iter()
            .any(|&(_, bond)| self.bonds[bond].order == BondOrder::Aromatic)
    }

    /// Number of hydrogens implied by the atom's default valence.
    ///
    /// Aromatic bonds count as one and a half, rounded up over the atom, and
    /// unpaired electrons occupy valence like bonds do. Atoms outside the
    /// organic subset have no implicit hydrogens.
    pub fn implicit_hydrogens(&self, idx: usize) -> u8 {
        let Some(atom) = self.atoms.get(idx) else {
            return 0;
        };
        let Some(valences) = atom.element.default_valences(atom.formal_charge) else {
            return 0;
        };
        let half_units: u32 = self
            .bonded(idx)
            .iter()
            .map(|&(_, bond)| self.bonds[bond].order.half_units() as u32)
            .sum();
        let used = half_units.div_ceil(2) + atom.radical_electrons as u32;
        valences
            .iter()
            .map(|&v| v as u32)
            .find(|&v| v >= used)
            .map_or(0, |v| (v - used) as u8)
    }

    /// Whether any atom lies off the `z = 0` plane.
    pub fn has_3d_coordinates(&self) -> bool {
        self.atoms
            .iter()
            .any(|a| a.position.z.abs() > PLANARITY_TOLERANCE)
    }
}
