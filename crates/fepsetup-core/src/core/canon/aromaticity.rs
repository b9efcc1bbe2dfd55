//! Kekulé normalization and aromaticity perception.
//!
//! A structure may arrive with molfile aromatic bonds (type 4) or with any of
//! its Kekulé structures. Both are brought to one Kekulé form, and aromatic
//! rings are then perceived from that form with Hückel's rule, so every
//! drawing of the same molecule yields the same flags.

use super::rings::{self, Ring};
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

/// Elements that can take part in an aromatic ring.
const SP2_CAPABLE: [u8; 9] = [
    5,  // B
    6,  // C
    7,  // N
    8,  // O
    15, // P
    16, // S
    33, // As
    34, // Se
    52, // Te
];

/// Largest fused envelope tested when neither of its rings is aromatic alone.
const MAX_ENVELOPE_SIZE: usize = 24;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot assign Kekulé bond orders to aromatic atoms {atoms:?}")]
pub struct KekulizationError {
    pub atoms: Vec<usize>,
}

/// A molecule in Kekulé form together with its perceived aromatic atoms and
/// bonds.
///
/// When the aromatic bonds of the input admit no Kekulé structure, the
/// molecule is kept as drawn and the drawn aromatic bonds are taken as given.
#[derive(Debug, Clone, PartialEq)]
pub struct AromaticForm {
    molecule: Molecule,
    atoms: Vec<bool>,
    bonds: Vec<bool>,
}

impl AromaticForm {
    pub fn perceive(mol: &Molecule) -> Self {
        if !mol.bonds().iter().any(|b| b.order == BondOrder::Aromatic) {
            return Self::from_kekule(mol.clone());
        }
        match kekulize(mol) {
            Ok(kekule) => Self::from_kekule(kekule),
            Err(e) => {
                debug!(atoms = ?e.atoms, "Keeping aromatic bonds as drawn");
                Self::as_drawn(mol.clone())
            }
        }
    }

    /// Perceives aromaticity on a molecule that has no aromatic bond orders.
    pub fn from_kekule(molecule: Molecule) -> Self {
        let rings = rings::smallest_cycles(&molecule);
        let mut in_any_ring = vec![false; molecule.bond_count()];
        for ring in &rings {
            for &bond in &ring.bonds {
                in_any_ring[bond] = true;
            }
        }

        let single: Vec<bool> = rings
            .iter()
            .map(|ring| is_aromatic_ring(&molecule, ring, &in_any_ring))
            .collect();
        let mut aromatic = single.clone();
        for i in 0..rings.len() {
            for j in (i + 1)..rings.len() {
                if single[i] && single[j] {
                    continue;
                }
                let fused = rings[i]
                    .envelope(&rings[j], &molecule)
                    .filter(|env| env.len() <= MAX_ENVELOPE_SIZE)
                    .is_some_and(|env| is_aromatic_ring(&molecule, &env, &in_any_ring));
                if fused {
                    aromatic[i] = true;
                    aromatic[j] = true;
                }
            }
        }

        let mut atoms = vec![false; molecule.atom_count()];
        let mut bonds = vec![false; molecule.bond_count()];
        for (ring, _) in rings.iter().zip(&aromatic).filter(|&(_, &a)| a) {
            for &atom in &ring.atoms {
                atoms[atom] = true;
            }
            for &bond in &ring.bonds {
                bonds[bond] = true;
            }
        }
        Self {
            molecule,
            atoms,
            bonds,
        }
    }

    fn as_drawn(molecule: Molecule) -> Self {
        let atoms = (0..molecule.atom_count())
            .map(|i| molecule.is_aromatic_atom(i))
            .collect();
        let bonds = molecule
            .bonds()
            .iter()
            .map(|b| b.order == BondOrder::Aromatic)
            .collect();
        Self {
            molecule,
            atoms,
            bonds,
        }
    }

    /// The normalized molecule, with Kekulé bond orders where they exist.
    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    pub fn is_aromatic_atom(&self, idx: usize) -> bool {
        self.atoms.get(idx).copied().unwrap_or(false)
    }

    pub fn is_aromatic_bond(&self, idx: usize) -> bool {
        self.bonds.get(idx).copied().unwrap_or(false)
    }

    /// Molfile bond code with perceived aromatic bonds reported as 4.
    pub fn bond_code(&self, idx: usize) -> u8 {
        if self.is_aromatic_bond(idx) {
            return BondOrder::Aromatic.molfile_code();
        }
        self.molecule
            .bond(idx)
            .map_or(0, |b| b.order.molfile_code())
    }
}

/// Pi electrons an atom gives to a ring it belongs to, or `None` if it
/// breaks aromaticity. Double bonds count as endocyclic when they lie in any
/// ring.
fn pi_electrons(mol: &Molecule, atom: usize, in_any_ring: &[bool]) -> Option<u32> {
    let element = mol.atoms()[atom].element;
    let charge = mol.atoms()[atom].formal_charge;
    if !SP2_CAPABLE.contains(&element.atomic_number()) {
        return None;
    }

    let mut ring_double = false;
    let mut exocyclic_double = None;
    for &(nb, bond) in mol.bonded(atom) {
        match mol.bonds()[bond].order {
            BondOrder::Triple => return None,
            BondOrder::Double if in_any_ring[bond] => ring_double = true,
            BondOrder::Double => exocyclic_double = Some(nb),
            _ => {}
        }
    }
    let has_double = ring_double || exocyclic_double.is_some();
    let exocyclic_to_heteroatom =
        exocyclic_double.is_some_and(|nb| mol.atoms()[nb].element != Element::CARBON);
    let connections = mol.degree(atom) + mol.implicit_hydrogens(atom) as usize;

    match (element.atomic_number(), charge) {
        (6, 0) if exocyclic_to_heteroatom => Some(0),
        (6, 0) if has_double => Some(1),
        (6, -1) if !has_double => Some(2),
        (6, 1) => Some(if has_double { 1 } else { 0 }),
        (7 | 15 | 33, 0) if has_double => Some(1),
        (7 | 15 | 33, 0) if connections <= 3 => Some(2),
        (7 | 15 | 33, 1) if ring_double => Some(1),
        (8 | 16 | 34 | 52, _) if exocyclic_double.is_some() => None,
        (8 | 16 | 34 | 52, 0) if !has_double && connections == 2 => Some(2),
        (8 | 16 | 34 | 52, 1) if ring_double => Some(1),
        (5, 0) => Some(if has_double { 1 } else { 0 }),
        _ => None,
    }
}

fn is_aromatic_ring(mol: &Molecule, ring: &Ring, in_any_ring: &[bool]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut total = 0;
    for &atom in &ring.atoms {
        match pi_electrons(mol, atom, in_any_ring) {
            Some(e) => total += e,
            None => return false,
        }
    }
    total >= 2 && (total - 2) % 4 == 0
}

/// Replaces aromatic bond orders with a Kekulé structure.
///
/// Aromatic atoms whose default valence leaves room for one more bond are
/// paired up over aromatic bonds by maximum matching; matched bonds become
/// double and the remaining aromatic bonds single. Atoms and bond indices are
/// unchanged.
pub fn kekulize(mol: &Molecule) -> Result<Molecule, KekulizationError> {
    let n = mol.atom_count();
    let needs: Vec<bool> = (0..n)
        .map(|i| mol.is_aromatic_atom(i) && needs_double_bond(mol, i))
        .collect();
    let mut matched: Vec<Option<usize>> = vec![None; n];

    for start in 0..n {
        if needs[start] && matched[start].is_none() {
            augment(mol, &needs, &mut matched, start);
        }
    }

    let unmatched: Vec<usize> = (0..n)
        .filter(|&i| needs[i] && matched[i].is_none())
        .collect();
    if !unmatched.is_empty() {
        return Err(KekulizationError { atoms: unmatched });
    }

    let mut double_bonds = vec![false; mol.bond_count()];
    for bond in matched.into_iter().flatten() {
        double_bonds[bond] = true;
    }
    let mut kekule = mol.clone();
    for (idx, &double) in double_bonds.iter().enumerate() {
        if let Some(bond) = kekule.bond_mut(idx) {
            if bond.order == BondOrder::Aromatic {
                bond.order = if double {
                    BondOrder::Double
                } else {
                    BondOrder::Single
                };
            }
        }
    }
    Ok(kekule)
}

/// Aromatic atoms whose valence leaves room for exactly one more bond.
fn needs_double_bond(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms()[idx];
    let Some(valences) = atom.element.default_valences(atom.formal_charge) else {
        return false;
    };
    let bonded: u32 = mol
        .bonded(idx)
        .iter()
        .map(|&(_, bond)| match mol.bonds()[bond].order {
            BondOrder::Aromatic => 1,
            order => order.half_units() as u32 / 2,
        })
        .sum();
    let used = bonded + mol.implicit_hydrogens(idx) as u32 + atom.radical_electrons as u32;
    valences
        .iter()
        .map(|&v| v as u32)
        .find(|&v| v >= used)
        .is_some_and(|v| v - used == 1)
}

fn augment(mol: &Molecule, needs: &[bool], matched: &mut [Option<usize>], start: usize) -> bool {
    let n = mol.atom_count();
    let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(u) = queue.pop_front() {
        for &(v, bond) in mol.bonded(u) {
            if mol.bonds()[bond].order != BondOrder::Aromatic || !needs[v] || visited[v] {
                continue;
            }
            if matched[u] == Some(bond) {
                continue;
            }
            visited[v] = true;
            prev[v] = Some((u, bond));

            let Some(partner_bond) = matched[v] else {
                flip_path(matched, &prev, start, v);
                return true;
            };
            let Some(w) = mol.bonds()[partner_bond].other(v) else {
                continue;
            };
            if !visited[w] {
                visited[w] = true;
                prev[w] = Some((v, partner_bond));
                queue.push_back(w);
            }
        }
    }
    false
}

/// Alternates matched and unmatched bonds along the path ending at `end`.
fn flip_path(matched: &mut [Option<usize>], prev: &[Option<(usize, usize)>], start: usize, end: usize) {
    let mut cur = end;
    let mut is_new_match = true;
    while cur != start {
        let Some((p, bond)) = prev[cur] else {
            return;
        };
        if is_new_match {
            matched[cur] = Some(bond);
            matched[p] = Some(bond);
        }
        is_new_match = !is_new_match;
        cur = p;
    }
}
