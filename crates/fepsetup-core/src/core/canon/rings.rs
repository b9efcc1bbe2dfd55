use crate::core::models::molecule::Molecule;
use std::collections::{HashSet, VecDeque};

/// Upper bound on equally short paths followed per bond. Only highly
/// symmetric cages reach it.
const MAX_PATHS_PER_BOND: usize = 64;

/// A simple cycle, as sorted atom and bond indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<usize>,
    pub bonds: Vec<usize>,
}

impl Ring {
    fn from_bonds(mol: &Molecule, mut bonds: Vec<usize>) -> Self {
        bonds.sort_unstable();
        let mut atoms: Vec<usize> = bonds
            .iter()
            .flat_map(|&b| {
                let bond = &mol.bonds()[b];
                [bond.atom1, bond.atom2]
            })
            .collect();
        atoms.sort_unstable();
        atoms.dedup();
        Self { atoms, bonds }
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    pub fn contains_bond(&self, bond: usize) -> bool {
        self.bonds.binary_search(&bond).is_ok()
    }

    /// The outer cycle of two rings fused along a shared path, if the shared
    /// bonds leave exactly one simple cycle behind.
    pub fn envelope(&self, other: &Ring, mol: &Molecule) -> Option<Ring> {
        if !self.bonds.iter().any(|&b| other.contains_bond(b)) {
            return None;
        }
        let bonds: Vec<usize> = self
            .bonds
            .iter()
            .filter(|&&b| !other.contains_bond(b))
            .chain(other.bonds.iter().filter(|&&b| !self.contains_bond(b)))
            .copied()
            .collect();
        let ring = Self::from_bonds(mol, bonds);
        (ring.atoms.len() == ring.bonds.len() && is_single_cycle(mol, &ring)).then_some(ring)
    }
}

/// Whether the ring's bonds form one connected cycle through all its atoms.
fn is_single_cycle(mol: &Molecule, ring: &Ring) -> bool {
    let Some(&start) = ring.atoms.first() else {
        return false;
    };
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(atom) = queue.pop_front() {
        let ring_neighbors: Vec<usize> = mol
            .bonded(atom)
            .iter()
            .filter(|&&(_, bond)| ring.contains_bond(bond))
            .map(|&(nb, _)| nb)
            .collect();
        if ring_neighbors.len() != 2 {
            return false;
        }
        for nb in ring_neighbors {
            if visited.insert(nb) {
                queue.push_back(nb);
            }
        }
    }
    visited.len() == ring.atoms.len()
}

/// Breadth-first distances from `from`, never crossing `skip_bond`.
fn distances_without(mol: &Molecule, from: usize, skip_bond: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; mol.atom_count()];
    dist[from] = Some(0);
    let mut queue = VecDeque::from([from]);
    while let Some(atom) = queue.pop_front() {
        let next = dist[atom].map_or(0, |d| d + 1);
        for &(nb, bond) in mol.bonded(atom) {
            if bond != skip_bond && dist[nb].is_none() {
                dist[nb] = Some(next);
                queue.push_back(nb);
            }
        }
    }
    dist
}

/// Size of the smallest ring containing `bond`, or `None` for chain bonds.
pub fn smallest_ring_size(mol: &Molecule, bond: usize) -> Option<usize> {
    let bond_ref = mol.bond(bond)?;
    let dist = distances_without(mol, bond_ref.atom2, bond);
    dist[bond_ref.atom1].map(|d| d + 1)
}

/// Every shortest cycle through every ring bond, ties included.
///
/// This covers the smallest set of smallest rings and adds the equally small
/// alternatives, so the result does not depend on atom order. Rings are
/// returned smallest first.
pub fn smallest_cycles(mol: &Molecule) -> Vec<Ring> {
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut rings = Vec::new();
    for (idx, bond) in mol.bonds().iter().enumerate() {
        let dist = distances_without(mol, bond.atom2, idx);
        if dist[bond.atom1].is_none() {
            continue;
        }
        for mut path in shortest_paths(mol, &dist, bond.atom1, idx) {
            path.push(idx);
            let ring = Ring::from_bonds(mol, path);
            if seen.insert(ring.bonds.clone()) {
                rings.push(ring);
            }
        }
    }
    rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.bonds.cmp(&b.bonds)));
    rings
}

/// Bond paths from `start` down the distance gradient to its origin.
fn shortest_paths(
    mol: &Molecule,
    dist: &[Option<usize>],
    start: usize,
    skip_bond: usize,
) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    let mut stack: Vec<(usize, Vec<usize>)> = vec![(start, Vec::new())];
    while let Some((atom, bonds)) = stack.pop() {
        if paths.len() >= MAX_PATHS_PER_BOND {
            break;
        }
        let Some(d) = dist[atom] else {
            continue;
        };
        if d == 0 {
            paths.push(bonds);
            continue;
        }
        for &(nb, bond) in mol.bonded(atom) {
            if bond != skip_bond && dist[nb] == Some(d - 1) {
                let mut next = bonds.clone();
                next.push(bond);
                stack.push((nb, next));
            }
        }
    }
    paths
}
