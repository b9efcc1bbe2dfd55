use super::aromaticity::AromaticForm;
use super::rings;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{BondOrder, BondStereo};
use nalgebra::Vector3;
use serde::Serialize;

const MIN_DIRECTION_NORM: f64 = 1e-6;
const CHIRAL_VOLUME_TOLERANCE: f64 = 1e-2;
/// Smallest |cos| between the two reference substituents, seen along the
/// double bond, that still counts as cis or trans.
const PLANAR_COSINE_TOLERANCE: f64 = 0.1;
/// Double bonds in smaller rings are always cis and carry no stereo.
const MIN_STEREO_RING_SIZE: usize = 8;

/// Tetrahedral handedness in SMILES terms: looking from the first neighbour
/// towards the centre, the remaining three run counter-clockwise (`@`) or
/// clockwise (`@@`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Chirality {
    CounterClockwise,
    Clockwise,
}

impl Chirality {
    pub fn inverted(self) -> Self {
        match self {
            Self::CounterClockwise => Self::Clockwise,
            Self::Clockwise => Self::CounterClockwise,
        }
    }

    pub fn smiles_symbol(self) -> &'static str {
        match self {
            Self::CounterClockwise => "@",
            Self::Clockwise => "@@",
        }
    }
}

/// One of the four substituents around a tetrahedral centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighbor {
    Atom(usize),
    ImplicitHydrogen,
}

/// A tetrahedral stereocentre candidate.
///
/// `chirality` is expressed relative to `neighbors`, which lists the bonded
/// atoms in adjacency order followed by the implicit hydrogen, if any. It is
/// `None` when the coordinates do not determine the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TetrahedralCenter {
    pub center: usize,
    pub neighbors: [Neighbor; 4],
    pub chirality: Option<Chirality>,
}

impl TetrahedralCenter {
    pub fn is_defined(&self) -> bool {
        self.chirality.is_some()
    }

    /// Re-expresses the chirality for the same neighbours listed in `order`.
    ///
    /// Returns `None` if the configuration is undefined or `order` is not a
    /// permutation of this centre's neighbours.
    pub fn chirality_in_order(&self, order: &[Neighbor]) -> Option<Chirality> {
        let chirality = self.chirality?;
        if order.len() != 4 {
            return None;
        }
        let perm = order
            .iter()
            .map(|n| self.neighbors.iter().position(|m| m == n))
            .collect::<Option<Vec<usize>>>()?;
        Some(if permutation_is_odd(&perm) {
            chirality.inverted()
        } else {
            chirality
        })
    }
}

/// Placement of two substituents on either end of a double bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BondConfiguration {
    Cis,
    Trans,
}

impl BondConfiguration {
    pub fn flipped(self) -> Self {
        match self {
            Self::Cis => Self::Trans,
            Self::Trans => Self::Cis,
        }
    }
}

/// A stereogenic double bond candidate.
///
/// `configuration` relates `references[0]`, a substituent of `atoms[0]`, to
/// `references[1]`, a substituent of `atoms[1]`. An end with two substituents
/// keeps the other one in `alternates`. The configuration is `None` when the
/// coordinates do not determine it.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleBondStereo {
    pub bond: usize,
    pub atoms: [usize; 2],
    pub references: [usize; 2],
    pub alternates: [Option<usize>; 2],
    pub configuration: Option<BondConfiguration>,
}

impl DoubleBondStereo {
    pub fn is_defined(&self) -> bool {
        self.configuration.is_some()
    }

    /// Substituents of `atom`, reference first. Empty if `atom` is not an end
    /// of this bond.
    pub fn substituents(&self, atom: usize) -> Vec<usize> {
        self.atoms
            .iter()
            .position(|&a| a == atom)
            .map(|end| {
                std::iter::once(self.references[end])
                    .chain(self.alternates[end])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Re-expresses the configuration between `first` and `second`, which
    /// must be substituents of opposite ends.
    pub fn configuration_for(&self, first: usize, second: usize) -> Option<BondConfiguration> {
        let configuration = self.configuration?;
        let swapped_at = |end: usize, atom: usize| {
            if atom == self.references[end] {
                Some(false)
            } else if Some(atom) == self.alternates[end] {
                Some(true)
            } else {
                None
            }
        };
        let flips = match (swapped_at(0, first), swapped_at(1, second)) {
            (Some(a), Some(b)) => a ^ b,
            _ => swapped_at(0, second)? ^ swapped_at(1, first)?,
        };
        Some(if flips {
            configuration.flipped()
        } else {
            configuration
        })
    }
}

/// Parity of a permutation of `0..perm.len()`, by cycle decomposition.
pub(crate) fn permutation_is_odd(perm: &[usize]) -> bool {
    let mut visited = vec![false; perm.len()];
    let mut swaps = 0;
    for i in 0..perm.len() {
        if visited[i] {
            continue;
        }
        let mut j = i;
        let mut cycle_len = 0;
        while !visited[j] {
            visited[j] = true;
            j = perm[j];
            cycle_len += 1;
        }
        swaps += cycle_len - 1;
    }
    swaps % 2 == 1
}

/// Finds tetrahedral stereocentre candidates and reads their configuration
/// from the coordinates.
///
/// A candidate has four single-bonded substituents (at most one of them an
/// implicit hydrogen) that fall into pairwise distinct symmetry classes. 3D
/// structures use the atom positions directly. 2D structures lift wedged and
/// hashed neighbours out of the plane; bonds only count when drawn from the
/// centre.
pub fn perceive(mol: &Molecule, symmetry_classes: &[usize]) -> Vec<TetrahedralCenter> {
    let three_d = mol.has_3d_coordinates();
    (0..mol.atom_count())
        .filter_map(|idx| candidate_neighbors(mol, symmetry_classes, idx))
        .map(|(center, neighbors)| TetrahedralCenter {
            center,
            neighbors,
            chirality: chirality_from_geometry(mol, center, &neighbors, three_d),
        })
        .collect()
}

/// Finds double bonds that can carry cis/trans stereo and reads their
/// configuration from the coordinates.
///
/// A candidate is a non-aromatic double bond outside rings of fewer than
/// eight atoms whose ends each carry one or two single-bonded substituents,
/// the two in distinct symmetry classes. A bond flagged `Either`, or a wavy
/// single bond drawn from one of its ends, leaves the configuration open.
pub fn perceive_double_bonds(
    form: &AromaticForm,
    symmetry_classes: &[usize],
) -> Vec<DoubleBondStereo> {
    let mol = form.molecule();
    mol.bonds()
        .iter()
        .enumerate()
        .filter(|&(idx, bond)| bond.order == BondOrder::Double && !form.is_aromatic_bond(idx))
        .filter(|&(idx, _)| {
            rings::smallest_ring_size(mol, idx).is_none_or(|size| size >= MIN_STEREO_RING_SIZE)
        })
        .filter_map(|(idx, bond)| {
            let atoms = [bond.atom1, bond.atom2];
            let (ref0, alt0) = substituents(form, symmetry_classes, atoms[0], atoms[1])?;
            let (ref1, alt1) = substituents(form, symmetry_classes, atoms[1], atoms[0])?;
            let references = [ref0, ref1];
            Some(DoubleBondStereo {
                bond: idx,
                atoms,
                references,
                alternates: [alt0, alt1],
                configuration: configuration_from_geometry(mol, idx, atoms, references),
            })
        })
        .collect()
}

fn substituents(
    form: &AromaticForm,
    symmetry_classes: &[usize],
    end: usize,
    partner: usize,
) -> Option<(usize, Option<usize>)> {
    let mol = form.molecule();
    if form.is_aromatic_atom(end) {
        return None;
    }
    let others: Vec<(usize, usize)> = mol
        .bonded(end)
        .iter()
        .copied()
        .filter(|&(nb, _)| nb != partner)
        .collect();
    if others
        .iter()
        .any(|&(_, bond)| mol.bonds()[bond].order != BondOrder::Single)
    {
        return None;
    }
    match others.as_slice() {
        [(only, _)] => Some((*only, None)),
        [(a, _), (b, _)] if symmetry_classes[*a] != symmetry_classes[*b] => Some((*a, Some(*b))),
        _ => None,
    }
}

fn configuration_from_geometry(
    mol: &Molecule,
    bond: usize,
    atoms: [usize; 2],
    references: [usize; 2],
) -> Option<BondConfiguration> {
    if mol.bonds()[bond].stereo == BondStereo::Either {
        return None;
    }
    let wavy_neighbor = atoms.iter().any(|&end| {
        mol.bonded(end).iter().any(|&(_, b)| {
            let other = &mol.bonds()[b];
            b != bond && other.atom1 == end && other.stereo == BondStereo::Either
        })
    });
    if wavy_neighbor {
        return None;
    }

    let position = |idx: usize| mol.atoms()[idx].position;
    let axis = (position(atoms[1]) - position(atoms[0])).try_normalize(MIN_DIRECTION_NORM)?;
    let across = |end: usize| {
        let offset = position(references[end]) - position(atoms[end]);
        (offset - axis * offset.dot(&axis)).try_normalize(MIN_DIRECTION_NORM)
    };
    let cosine = across(0)?.dot(&across(1)?);
    if cosine.abs() < PLANAR_COSINE_TOLERANCE {
        None
    } else if cosine > 0.0 {
        Some(BondConfiguration::Cis)
    } else {
        Some(BondConfiguration::Trans)
    }
}

fn is_plain_hydrogen(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms()[idx];
    atom.element.is_hydrogen() && atom.isotope == 0 && atom.formal_charge == 0 && mol.degree(idx) == 1
}

fn candidate_neighbors(
    mol: &Molecule,
    symmetry_classes: &[usize],
    idx: usize,
) -> Option<(usize, [Neighbor; 4])> {
    let bonded = mol.bonded(idx);
    let implicit = mol.implicit_hydrogens(idx) as usize;
    if implicit > 1 || bonded.len() + implicit != 4 {
        return None;
    }
    if bonded
        .iter()
        .any(|&(_, bond)| mol.bonds()[bond].order != BondOrder::Single)
    {
        return None;
    }

    let mut classes: Vec<usize> = bonded.iter().map(|&(nb, _)| symmetry_classes[nb]).collect();
    classes.sort_unstable();
    classes.dedup();
    if classes.len() != bonded.len() {
        return None;
    }
    if implicit == 1 && bonded.iter().any(|&(nb, _)| is_plain_hydrogen(mol, nb)) {
        return None;
    }

    let mut neighbors = [Neighbor::ImplicitHydrogen; 4];
    for (slot, &(nb, _)) in neighbors.iter_mut().zip(bonded) {
        *slot = Neighbor::Atom(nb);
    }
    Some((idx, neighbors))
}

/// Out-of-plane offset of a 2D neighbour implied by the bond's wedge.
fn wedge_lift(mol: &Molecule, center: usize, neighbor: usize) -> Option<f64> {
    let bond = mol.bond_between(center, neighbor)?;
    if bond.atom1 != center {
        return Some(0.0);
    }
    match bond.stereo {
        BondStereo::Wedge => Some(1.0),
        BondStereo::Hash => Some(-1.0),
        BondStereo::None => Some(0.0),
        BondStereo::Either => None,
    }
}

fn chirality_from_geometry(
    mol: &Molecule,
    center: usize,
    neighbors: &[Neighbor; 4],
    three_d: bool,
) -> Option<Chirality> {
    let origin = mol.atoms()[center].position;
    let mut directions: Vec<Vector3<f64>> = Vec::with_capacity(4);
    for neighbor in neighbors {
        let Neighbor::Atom(nb) = *neighbor else {
            continue;
        };
        let mut offset = mol.atoms()[nb].position - origin;
        if !three_d {
            offset.z = wedge_lift(mol, center, nb)?;
        }
        directions.push(offset.try_normalize(MIN_DIRECTION_NORM)?);
    }
    if directions.len() == 3 {
        let sum: Vector3<f64> = directions.iter().sum();
        directions.push((-sum).try_normalize(MIN_DIRECTION_NORM)?);
    }

    let [v0, v1, v2, v3] = [directions[0], directions[1], directions[2], directions[3]];
    let volume = (v1 - v0).dot(&(v2 - v0).cross(&(v3 - v0)));
    if volume.abs() < CHIRAL_VOLUME_TOLERANCE {
        None
    } else if volume < 0.0 {
        Some(Chirality::CounterClockwise)
    } else {
        Some(Chirality::Clockwise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::canon::ranking::CanonicalRanking;
    use crate::core::io::molfile::MolFile;
    use crate::fixtures;

    fn centers(block: &str) -> Vec<TetrahedralCenter> {
        CanonicalRanking::compute(&MolFile::from_block(block).unwrap()).stereocenters
    }

    #[test]
    fn permutation_parity_counts_transpositions() {
        assert!(!permutation_is_odd(&[0, 1, 2, 3]));
        assert!(permutation_is_odd(&[1, 0, 2, 3]));
        assert!(!permutation_is_odd(&[1, 2, 0, 3]));
        assert!(!permutation_is_odd(&[3, 2, 1, 0]));
    }

    #[test]
    fn chirality_flips_under_odd_reordering() {
        let center = TetrahedralCenter {
            center: 0,
            neighbors: [
                Neighbor::Atom(1),
                Neighbor::Atom(2),
                Neighbor::Atom(3),
                Neighbor::ImplicitHydrogen,
            ],
            chirality: Some(Chirality::Clockwise),
        };
        let swapped = [
            Neighbor::Atom(2),
            Neighbor::Atom(1),
            Neighbor::Atom(3),
            Neighbor::ImplicitHydrogen,
        ];
        let rotated = [
            Neighbor::Atom(2),
            Neighbor::Atom(3),
            Neighbor::Atom(1),
            Neighbor::ImplicitHydrogen,
        ];
        assert_eq!(center.chirality_in_order(&swapped), Some(Chirality::CounterClockwise));
        assert_eq!(center.chirality_in_order(&rotated), Some(Chirality::Clockwise));
        assert_eq!(center.chirality_in_order(&swapped[..3]), None);
    }

    #[test]
    fn regular_tetrahedron_viewed_from_apex_is_counter_clockwise() {
        let mut mol = fixtures::tetrahedral_center();
        let centers = CanonicalRanking::compute(&mol).stereocenters;
        assert_eq!(centers.len(), 1);
        let center = &centers[0];
        assert_eq!(center.center, 0);
        let apex_first = [
            Neighbor::Atom(1),
            Neighbor::Atom(2),
            Neighbor::Atom(3),
            Neighbor::Atom(4),
        ];
        assert_eq!(
            center.chirality_in_order(&apex_first),
            Some(Chirality::CounterClockwise)
        );

        for idx in 1..5 {
            mol.atom_mut(idx).unwrap().position.z *= -1.0;
        }
        let mirrored = CanonicalRanking::compute(&mol).stereocenters;
        assert_eq!(
            mirrored[0].chirality_in_order(&apex_first),
            Some(Chirality::Clockwise)
        );
    }

    #[test]
    fn chiral_center_with_implicit_hydrogen_is_perceived_in_3d() {
        let centers = centers(fixtures::CHBRCLF_MOLBLOCK);
        assert_eq!(centers.len(), 1);
        assert!(centers[0].is_defined());
        assert_eq!(centers[0].neighbors[3], Neighbor::ImplicitHydrogen);
    }

    #[test]
    fn flat_structure_without_wedges_is_undefined() {
        let mut mol = MolFile::from_block(fixtures::CHBRCLF_MOLBLOCK).unwrap();
        for idx in 0..mol.atom_count() {
            mol.atom_mut(idx).unwrap().position.z = 0.0;
        }
        let centers = CanonicalRanking::compute(&mol).stereocenters;
        assert_eq!(centers.len(), 1);
        assert!(!centers[0].is_defined());
    }

    #[test]
    fn wedge_bonds_define_2d_configuration() {
        let mut mol = MolFile::from_block(fixtures::CHBRCLF_MOLBLOCK).unwrap();
        for idx in 0..mol.atom_count() {
            mol.atom_mut(idx).unwrap().position.z = 0.0;
        }
        mol.bond_mut(0).unwrap().stereo = BondStereo::Wedge;
        let wedged = CanonicalRanking::compute(&mol).stereocenters[0].chirality;

        mol.bond_mut(0).unwrap().stereo = BondStereo::Hash;
        let hashed = CanonicalRanking::compute(&mol).stereocenters[0].chirality;

        assert!(wedged.is_some());
        assert_eq!(hashed, wedged.map(Chirality::inverted));
    }

    fn double_bonds(mol: &Molecule) -> Vec<DoubleBondStereo> {
        CanonicalRanking::compute(mol).double_bonds
    }

    #[test]
    fn butene_geometry_is_perceived() {
        let cis = double_bonds(&fixtures::butene(true));
        assert_eq!(cis.len(), 1);
        assert_eq!(cis[0].atoms, [1, 2]);
        assert_eq!(cis[0].references, [0, 3]);
        assert_eq!(cis[0].configuration, Some(BondConfiguration::Cis));

        let trans = double_bonds(&fixtures::butene(false));
        assert_eq!(trans[0].configuration, Some(BondConfiguration::Trans));
    }

    #[test]
    fn three_d_torsion_decides_configuration() {
        let mut mol = fixtures::butene(true);
        mol.atom_mut(3).unwrap().position.z = 0.5;
        assert_eq!(
            double_bonds(&mol)[0].configuration,
            Some(BondConfiguration::Cis)
        );

        // methyl rotated perpendicular to the plane
        mol.atom_mut(3).unwrap().position = nalgebra::Point3::new(1.8, 0.0, 0.87);
        assert!(!double_bonds(&mol)[0].is_defined());
    }

    #[test]
    fn degenerate_or_flagged_double_bonds_are_undefined() {
        let collapsed = fixtures::molecule(
            &["C", "C", "C", "C"],
            &[
                (0, 1, BondOrder::Single),
                (1, 2, BondOrder::Double),
                (2, 3, BondOrder::Single),
            ],
        );
        let dbs = double_bonds(&collapsed);
        assert_eq!(dbs.len(), 1);
        assert!(!dbs[0].is_defined());

        let mut either = fixtures::butene(true);
        either.bond_mut(1).unwrap().stereo = BondStereo::Either;
        assert!(!double_bonds(&either)[0].is_defined());

        let mut from_methyl = fixtures::butene(false);
        from_methyl.bond_mut(0).unwrap().stereo = BondStereo::Either;
        assert!(double_bonds(&from_methyl)[0].is_defined());

        let mut wavy = fixtures::molecule_2d(
            &[("C", [-0.5, 0.87]), ("C", [0.0, 0.0]), ("C", [1.3, 0.0]), ("C", [1.8, -0.87])],
            &[
                (1, 0, BondOrder::Single),
                (1, 2, BondOrder::Double),
                (2, 3, BondOrder::Single),
            ],
        );
        wavy.bond_mut(0).unwrap().stereo = BondStereo::Either;
        assert!(!double_bonds(&wavy)[0].is_defined());
    }

    #[test]
    fn symmetric_or_ring_double_bonds_are_not_stereogenic() {
        use BondOrder::{Double, Single};
        let isobutene = fixtures::molecule_2d(
            &[("C", [0.0, 0.0]), ("C", [1.3, 0.0]), ("C", [1.8, 0.87]), ("C", [1.8, -0.87])],
            &[(0, 1, Double), (1, 2, Single), (1, 3, Single)],
        );
        assert!(double_bonds(&isobutene).is_empty());

        let propene = fixtures::molecule_2d(
            &[("C", [0.0, 0.0]), ("C", [1.3, 0.0]), ("C", [1.8, 0.87])],
            &[(0, 1, Double), (1, 2, Single)],
        );
        assert_eq!(double_bonds(&propene).len(), 0);

        let ring_bonds: Vec<(usize, usize, BondOrder)> = (0..6)
            .map(|i| (i, (i + 1) % 6, if i == 0 { Double } else { Single }))
            .collect();
        let cyclohexene = fixtures::molecule(&["C"; 6], &ring_bonds);
        assert!(double_bonds(&cyclohexene).is_empty());

        assert!(double_bonds(&fixtures::benzene_kekule(false)).is_empty());
    }

    #[test]
    fn configuration_follows_reference_choice() {
        let stereo = DoubleBondStereo {
            bond: 1,
            atoms: [1, 2],
            references: [0, 3],
            alternates: [Some(4), None],
            configuration: Some(BondConfiguration::Cis),
        };
        assert_eq!(stereo.configuration_for(0, 3), Some(BondConfiguration::Cis));
        assert_eq!(stereo.configuration_for(3, 0), Some(BondConfiguration::Cis));
        assert_eq!(stereo.configuration_for(4, 3), Some(BondConfiguration::Trans));
        assert_eq!(stereo.configuration_for(3, 4), Some(BondConfiguration::Trans));
        assert_eq!(stereo.configuration_for(0, 4), None);
        assert_eq!(stereo.substituents(1), vec![0, 4]);
        assert_eq!(stereo.substituents(2), vec![3]);
        assert!(stereo.substituents(7).is_empty());
    }

    #[test]
    fn equivalent_substituents_are_not_stereocenters() {
        assert!(centers(fixtures::ETHANOL_MOLBLOCK).is_empty());
        assert!(centers(fixtures::ISOBUTANOL_MOLBLOCK).is_empty());
    }
}
