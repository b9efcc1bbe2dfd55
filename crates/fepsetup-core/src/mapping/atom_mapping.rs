use super::error::{InvalidMappingKind, MappingError};
use crate::ligand::LigandMolecule;
use indexmap::IndexMap;
use std::hash::{Hash, Hasher};

/// An injective correspondence from atom indices of one molecule to atom
/// indices of another.
///
/// Pairs keep the order in which they were added so strategies can rank
/// them. Equality ignores that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomMapping {
    forward: IndexMap<usize, usize>,
    backward: IndexMap<usize, usize>,
}

impl AtomMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(mol1, mol2)` index pairs.
    ///
    /// # Errors
    ///
    /// Fails on the first repeated source or target index.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut mapping = Self::new();
        for (a, b) in pairs {
            mapping.insert(a, b)?;
        }
        Ok(mapping)
    }

    pub fn insert(&mut self, mol1_index: usize, mol2_index: usize) -> Result<(), MappingError> {
        if self.forward.contains_key(&mol1_index) {
            return Err(InvalidMappingKind::DuplicateSource { index: mol1_index }.into());
        }
        if self.backward.contains_key(&mol2_index) {
            return Err(InvalidMappingKind::DuplicateTarget { index: mol2_index }.into());
        }
        self.forward.insert(mol1_index, mol2_index);
        self.backward.insert(mol2_index, mol1_index);
        Ok(())
    }

    pub fn get(&self, mol1_index: usize) -> Option<usize> {
        self.forward.get(&mol1_index).copied()
    }

    pub fn get_inverse(&self, mol2_index: usize) -> Option<usize> {
        self.backward.get(&mol2_index).copied()
    }

    /// The same correspondence read from molecule 2 to molecule 1.
    pub fn inverse(&self) -> Self {
        Self {
            forward: self.backward.clone(),
            backward: self.forward.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.forward.iter().map(|(&a, &b)| (a, b))
    }

    pub fn mol1_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.forward.keys().copied()
    }

    pub fn mol2_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.forward.values().copied()
    }
}

impl Hash for AtomMapping {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pairs: Vec<(usize, usize)> = self.iter().collect();
        pairs.sort_unstable();
        pairs.hash(state);
    }
}

/// A mapping together with the two ligands it relates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LigandAtomMapping {
    mol1: LigandMolecule,
    mol2: LigandMolecule,
    mapping: AtomMapping,
}

impl LigandAtomMapping {
    /// # Errors
    ///
    /// Returns [`MappingError::AtomOutOfRange`] if an index does not exist in
    /// its molecule.
    pub fn new(
        mol1: LigandMolecule,
        mol2: LigandMolecule,
        mapping: AtomMapping,
    ) -> Result<Self, MappingError> {
        for (a, b) in mapping.iter() {
            check_index(1, a, mol1.atom_count())?;
            check_index(2, b, mol2.atom_count())?;
        }
        Ok(Self {
            mol1,
            mol2,
            mapping,
        })
    }

    pub fn mol1(&self) -> &LigandMolecule {
        &self.mol1
    }

    pub fn mol2(&self) -> &LigandMolecule {
        &self.mol2
    }

    pub fn mol1_to_mol2(&self) -> &AtomMapping {
        &self.mapping
    }

    pub fn mol2_to_mol1(&self) -> AtomMapping {
        self.mapping.inverse()
    }

    /// Atoms of molecule 1 with no partner, in index order.
    pub fn unique_atoms_mol1(&self) -> Vec<usize> {
        (0..self.mol1.atom_count())
            .filter(|&i| self.mapping.get(i).is_none())
            .collect()
    }

    /// Atoms of molecule 2 with no partner, in index order.
    pub fn unique_atoms_mol2(&self) -> Vec<usize> {
        (0..self.mol2.atom_count())
            .filter(|&i| self.mapping.get_inverse(i).is_none())
            .collect()
    }
}

fn check_index(molecule: u8, index: usize, atom_count: usize) -> Result<(), MappingError> {
    if index < atom_count {
        Ok(())
    } else {
        Err(MappingError::AtomOutOfRange {
            molecule,
            index,
            atom_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::molfile::MolFile;
    use crate::fixtures;
    use std::collections::HashSet;

    fn ligand(block: &str) -> LigandMolecule {
        LigandMolecule::new(MolFile::from_block(block).unwrap(), "")
    }

    #[test]
    fn pairs_keep_insertion_order() {
        let mapping = AtomMapping::try_from_pairs([(2, 0), (0, 1), (1, 2)]).unwrap();
        assert_eq!(mapping.iter().collect::<Vec<_>>(), vec![(2, 0), (0, 1), (1, 2)]);
        assert_eq!(mapping.get(0), Some(1));
        assert_eq!(mapping.get(5), None);
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn duplicate_source_or_target_is_rejected() {
        assert!(matches!(
            AtomMapping::try_from_pairs([(0, 1), (0, 2)]),
            Err(MappingError::InvalidMapping(InvalidMappingKind::DuplicateSource { index: 0 }))
        ));
        assert!(matches!(
            AtomMapping::try_from_pairs([(0, 1), (2, 1)]),
            Err(MappingError::InvalidMapping(InvalidMappingKind::DuplicateTarget { index: 1 }))
        ));
    }

    #[test]
    fn inverse_swaps_direction() {
        let mapping = AtomMapping::try_from_pairs([(0, 3), (1, 4)]).unwrap();
        let inverse = mapping.inverse();
        assert_eq!(inverse.get(3), Some(0));
        assert_eq!(inverse.get(4), Some(1));
        assert_eq!(inverse.inverse(), mapping);
    }

    #[test]
    fn equality_and_hash_ignore_pair_order() {
        let a = AtomMapping::try_from_pairs([(0, 1), (1, 0)]).unwrap();
        let b = AtomMapping::try_from_pairs([(1, 0), (0, 1)]).unwrap();
        assert_eq!(a, b);
        let set: HashSet<AtomMapping> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ligand_mapping_validates_indices() {
        let ethanol = ligand(fixtures::ETHANOL_MOLBLOCK);
        let isobutanol = ligand(fixtures::ISOBUTANOL_MOLBLOCK);

        let ok = AtomMapping::try_from_pairs([(0, 3), (2, 4)]).unwrap();
        assert!(LigandAtomMapping::new(ethanol.clone(), isobutanol.clone(), ok).is_ok());

        let bad = AtomMapping::try_from_pairs([(0, 7)]).unwrap();
        assert!(matches!(
            LigandAtomMapping::new(ethanol, isobutanol, bad),
            Err(MappingError::AtomOutOfRange {
                molecule: 2,
                index: 7,
                atom_count: 5
            })
        ));
    }

    #[test]
    fn unique_atoms_are_those_left_unmapped() {
        let mapping = AtomMapping::try_from_pairs([(1, 3), (2, 4)]).unwrap();
        let pair = LigandAtomMapping::new(
            ligand(fixtures::ETHANOL_MOLBLOCK),
            ligand(fixtures::ISOBUTANOL_MOLBLOCK),
            mapping,
        )
        .unwrap();

        assert_eq!(pair.unique_atoms_mol1(), vec![0]);
        assert_eq!(pair.unique_atoms_mol2(), vec![0, 1, 2]);
        assert_eq!(pair.mol2_to_mol1().get(4), Some(2));
    }
}
