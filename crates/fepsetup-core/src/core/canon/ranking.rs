use super::aromaticity::AromaticForm;
use super::stereo::{
    self, BondConfiguration, Chirality, DoubleBondStereo, Neighbor, TetrahedralCenter,
};
use crate::core::models::molecule::Molecule;
use std::collections::HashMap;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a over explicit little-endian words, so values do not depend on the
/// platform or on the standard library's `Hash` implementations.
struct Fnv1a(u64);

impl Fnv1a {
    fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    fn write(&mut self, value: u64) -> &mut Self {
        for b in value.to_le_bytes() {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
        self
    }

    fn write_all(&mut self, values: impl IntoIterator<Item = u64>) -> &mut Self {
        let mut len = 0u64;
        for value in values {
            self.write(value);
            len += 1;
        }
        self.write(len)
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Graph-local invariant of one atom, hashed to seed the refinement.
fn atom_invariant(form: &AromaticForm, idx: usize) -> u64 {
    let mol = form.molecule();
    let atom = &mol.atoms()[idx];
    let mut bond_orders = [0u64; 4];
    for &(_, bond) in mol.bonded(idx) {
        bond_orders[(form.bond_code(bond) - 1) as usize] += 1;
    }
    let mut h = Fnv1a::new();
    h.write(atom.element.atomic_number() as u64)
        .write(mol.degree(idx) as u64)
        .write(mol.implicit_hydrogens(idx) as u64)
        .write(atom.formal_charge as i64 as u64)
        .write(atom.isotope as u64)
        .write(atom.radical_electrons as u64)
        .write(form.is_aromatic_atom(idx) as u64)
        .write_all(bond_orders);
    h.finish()
}

fn ranks_from_values(values: &[u64]) -> Vec<usize> {
    let n = values.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by_key(|&i| values[i]);
    let mut ranks = vec![0usize; n];
    for i in 1..n {
        ranks[indices[i]] = if values[indices[i]] == values[indices[i - 1]] {
            ranks[indices[i - 1]]
        } else {
            i
        };
    }
    ranks
}

fn count_distinct(ranks: &[usize]) -> usize {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

/// Neighbour ranks paired with bond codes, sorted.
fn neighborhood(form: &AromaticForm, ranks: &[usize], idx: usize) -> Vec<u64> {
    let mut pairs: Vec<(usize, u8)> = form
        .molecule()
        .bonded(idx)
        .iter()
        .map(|&(nb, bond)| (ranks[nb], form.bond_code(bond)))
        .collect();
    pairs.sort_unstable();
    pairs
        .into_iter()
        .flat_map(|(rank, code)| [rank as u64, code as u64])
        .collect()
}

fn morgan_refine(form: &AromaticForm, ranks: &mut Vec<usize>) {
    let mut prev_distinct = count_distinct(ranks);
    loop {
        let values: Vec<u64> = (0..ranks.len())
            .map(|i| {
                let mut h = Fnv1a::new();
                h.write(ranks[i] as u64)
                    .write_all(neighborhood(form, ranks, i));
                h.finish()
            })
            .collect();
        let new_ranks = ranks_from_values(&values);
        let distinct = count_distinct(&new_ranks);
        if distinct <= prev_distinct {
            return;
        }
        *ranks = new_ranks;
        prev_distinct = distinct;
    }
}

/// Handedness of a centre relative to its neighbours sorted by rank, or
/// `None` if the neighbours are not fully ordered yet.
fn ranked_handedness(center: &TetrahedralCenter, ranks: &[usize]) -> Option<Chirality> {
    let chirality = center.chirality?;
    let keys: Vec<usize> = center
        .neighbors
        .iter()
        .map(|n| match n {
            Neighbor::Atom(idx) => ranks[*idx],
            Neighbor::ImplicitHydrogen => usize::MAX,
        })
        .collect();
    let mut order: Vec<usize> = (0..4).collect();
    order.sort_by_key(|&i| keys[i]);
    if order.windows(2).any(|w| keys[w[0]] == keys[w[1]]) {
        return None;
    }
    Some(if stereo::permutation_is_odd(&order) {
        chirality.inverted()
    } else {
        chirality
    })
}

/// Lowest-ranked substituent of `atom` on a double bond, or `None` while its
/// two substituents are still tied.
fn ranked_reference(
    double_bond: &DoubleBondStereo,
    atom: usize,
    ranks: &[usize],
) -> Option<usize> {
    match double_bond.substituents(atom).as_slice() {
        [only] => Some(*only),
        [a, b] if ranks[*a] != ranks[*b] => Some(if ranks[*a] < ranks[*b] { *a } else { *b }),
        _ => None,
    }
}

/// Configuration of a double bond between the lowest-ranked substituents of
/// its ends, or `None` if those are not decided yet.
pub(crate) fn ranked_configuration(
    double_bond: &DoubleBondStereo,
    ranks: &[usize],
) -> Option<BondConfiguration> {
    let [a, b] = double_bond.atoms;
    double_bond.configuration_for(
        ranked_reference(double_bond, a, ranks)?,
        ranked_reference(double_bond, b, ranks)?,
    )
}

/// Tetrahedral centres and double bonds whose configurations refine ranks.
#[derive(Clone, Copy)]
struct StereoElements<'a> {
    centers: &'a [TetrahedralCenter],
    double_bonds: &'a [DoubleBondStereo],
}

impl StereoElements<'_> {
    /// Per-atom stereo codes under `ranks`: 1 and 2 for `@` and `@@` centres,
    /// 3 and 4 for both ends of cis and trans bonds, 0 otherwise.
    fn codes(&self, ranks: &[usize]) -> Vec<u64> {
        let mut codes = vec![0u64; ranks.len()];
        for center in self.centers {
            codes[center.center] = match ranked_handedness(center, ranks) {
                None => 0,
                Some(Chirality::CounterClockwise) => 1,
                Some(Chirality::Clockwise) => 2,
            };
        }
        for double_bond in self.double_bonds {
            let code = match ranked_configuration(double_bond, ranks) {
                None => 0,
                Some(BondConfiguration::Cis) => 3,
                Some(BondConfiguration::Trans) => 4,
            };
            for atom in double_bond.atoms {
                codes[atom] = code;
            }
        }
        codes
    }

    fn involves_rank(&self, ranks: &[usize], rank: usize) -> bool {
        self.centers.iter().any(|c| ranks[c.center] == rank)
            || self
                .double_bonds
                .iter()
                .any(|d| d.atoms.iter().any(|&a| ranks[a] == rank))
    }
}

fn stereo_refine(stereo: StereoElements<'_>, ranks: &mut Vec<usize>) {
    let codes = stereo.codes(ranks);
    if codes.iter().all(|&c| c == 0) {
        return;
    }
    let values: Vec<u64> = ranks
        .iter()
        .zip(&codes)
        .map(|(&rank, &code)| {
            let mut h = Fnv1a::new();
            h.write(rank as u64).write(code);
            h.finish()
        })
        .collect();
    *ranks = ranks_from_values(&values);
}

fn refine(form: &AromaticForm, stereo: StereoElements<'_>, ranks: &mut Vec<usize>) {
    morgan_refine(form, ranks);
    loop {
        let prev = count_distinct(ranks);
        stereo_refine(stereo, ranks);
        morgan_refine(form, ranks);
        if count_distinct(ranks) <= prev {
            break;
        }
    }
}

/// The smallest tied rank, preferring classes without stereo elements.
fn best_tied_rank(stereo: StereoElements<'_>, ranks: &[usize]) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &r in ranks {
        *counts.entry(r).or_default() += 1;
    }
    let tied: Vec<usize> = counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(rank, _)| rank)
        .collect();
    tied.iter()
        .copied()
        .filter(|&r| !stereo.involves_rank(ranks, r))
        .min()
        .or_else(|| tied.iter().copied().min())
}

fn break_ties(
    form: &AromaticForm,
    stereo: StereoElements<'_>,
    invariants: &[u64],
    ranks: &mut Vec<usize>,
) {
    let n = ranks.len();
    while count_distinct(ranks) < n {
        let Some(tied_rank) = best_tied_rank(stereo, ranks) else {
            return;
        };
        let max_rank = ranks.iter().copied().max().unwrap_or(0);
        let mut best: Option<(Vec<u64>, Vec<usize>)> = None;

        // Promote each tied atom in turn and keep the candidate whose atoms,
        // read in rank order, give the smallest invariant trace.
        for candidate in (0..n).filter(|&i| ranks[i] == tied_rank) {
            let mut trial = ranks.clone();
            trial[candidate] = max_rank + 1;
            refine(form, stereo, &mut trial);

            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by_key(|&i| trial[i]);
            let codes = stereo.codes(&trial);
            let trace: Vec<u64> = order
                .iter()
                .map(|&i| {
                    let mut h = Fnv1a::new();
                    h.write(invariants[i])
                        .write_all(neighborhood(form, &trial, i))
                        .write(codes[i]);
                    h.finish()
                })
                .collect();
            if best.as_ref().is_none_or(|(best_trace, _)| trace < *best_trace) {
                best = Some((trace, trial));
            }
        }

        match best {
            Some((_, trial)) if count_distinct(&trial) > count_distinct(ranks) => *ranks = trial,
            _ => return,
        }
    }
}

/// Canonical atom order of a molecule, together with the normalized form it
/// was computed on and the stereo elements that took part in producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRanking {
    /// Kekulé form with perceived aromaticity; atom and bond indices match
    /// the input molecule.
    pub form: AromaticForm,
    /// Atoms with equal values are topologically equivalent.
    pub symmetry_classes: Vec<usize>,
    /// A permutation of `0..atom_count`; lower ranks are written first.
    pub ranks: Vec<usize>,
    /// Every tetrahedral stereocentre candidate, defined or not.
    pub stereocenters: Vec<TetrahedralCenter>,
    /// Every stereogenic double bond candidate, defined or not.
    pub double_bonds: Vec<DoubleBondStereo>,
}

impl CanonicalRanking {
    pub fn compute(mol: &Molecule) -> Self {
        Self::from_form(AromaticForm::perceive(mol))
    }

    pub fn from_form(form: AromaticForm) -> Self {
        let n = form.molecule().atom_count();
        let invariants: Vec<u64> = (0..n).map(|i| atom_invariant(&form, i)).collect();

        let mut ranks = ranks_from_values(&invariants);
        morgan_refine(&form, &mut ranks);
        let symmetry_classes = ranks.clone();

        let stereocenters = stereo::perceive(form.molecule(), &symmetry_classes);
        let double_bonds = stereo::perceive_double_bonds(&form, &symmetry_classes);
        let elements = StereoElements {
            centers: &stereocenters,
            double_bonds: &double_bonds,
        };
        refine(&form, elements, &mut ranks);
        break_ties(&form, elements, &invariants, &mut ranks);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| (ranks[i], i));
        let mut dense = vec![0usize; n];
        for (rank, &atom) in order.iter().enumerate() {
            dense[atom] = rank;
        }

        Self {
            form,
            symmetry_classes,
            ranks: dense,
            stereocenters,
            double_bonds,
        }
    }

    pub fn stereocenter(&self, atom: usize) -> Option<&TetrahedralCenter> {
        self.stereocenters.iter().find(|c| c.center == atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::molfile::MolFile;
    use crate::fixtures;

    fn ranking(block: &str) -> CanonicalRanking {
        CanonicalRanking::compute(&MolFile::from_block(block).unwrap())
    }

    fn sorted(values: &[usize]) -> Vec<usize> {
        let mut v = values.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn empty_molecule_has_empty_ranking() {
        let canon = CanonicalRanking::compute(&Molecule::new());
        assert!(canon.ranks.is_empty());
        assert!(canon.stereocenters.is_empty());
        assert!(canon.double_bonds.is_empty());
    }

    #[test]
    fn ranks_form_a_permutation() {
        let canon = ranking(fixtures::BENZENE_MOLBLOCK);
        assert_eq!(sorted(&canon.ranks), (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn symmetric_atoms_share_a_class() {
        let benzene = ranking(fixtures::BENZENE_MOLBLOCK);
        assert_eq!(count_distinct(&benzene.symmetry_classes), 1);

        let ethanol = ranking(fixtures::ETHANOL_MOLBLOCK);
        assert_eq!(count_distinct(&ethanol.symmetry_classes), 3);
    }

    #[test]
    fn ranking_is_independent_of_input_order() {
        let mol = MolFile::from_block(fixtures::ISOBUTANOL_MOLBLOCK).unwrap();
        let canon = CanonicalRanking::compute(&mol);
        let n = mol.atom_count();

        for offset in 1..n {
            let perm: Vec<usize> = (0..n).map(|i| (i + offset) % n).collect();
            let renumbered = fixtures::renumbered(&mol, &perm);
            let other = CanonicalRanking::compute(&renumbered);
            let elements = |m: &Molecule, ranks: &[usize]| {
                let mut by_rank = vec![0u8; n];
                for (i, &r) in ranks.iter().enumerate() {
                    by_rank[r] = m.atoms()[i].element.atomic_number();
                }
                by_rank
            };
            assert_eq!(elements(&mol, &canon.ranks), elements(&renumbered, &other.ranks));
        }
    }

    #[test]
    fn kekule_and_aromatic_drawings_rank_alike() {
        let drawn = ranking(fixtures::BENZENE_MOLBLOCK);
        let kekule = CanonicalRanking::compute(&fixtures::benzene_kekule(true));
        assert_eq!(count_distinct(&kekule.symmetry_classes), 1);
        assert!((0..6).all(|i| kekule.form.is_aromatic_atom(i)));
        assert!((0..6).all(|b| drawn.form.bond_code(b) == kekule.form.bond_code(b)));
    }

    #[test]
    fn double_bond_geometry_splits_tied_ranks() {
        let cis = CanonicalRanking::compute(&fixtures::butene(true));
        let trans = CanonicalRanking::compute(&fixtures::butene(false));
        assert_eq!(cis.symmetry_classes, trans.symmetry_classes);
        assert_eq!(cis.double_bonds.len(), 1);
        assert_eq!(
            ranked_configuration(&cis.double_bonds[0], &cis.ranks),
            Some(BondConfiguration::Cis)
        );
        assert_eq!(
            ranked_configuration(&trans.double_bonds[0], &trans.ranks),
            Some(BondConfiguration::Trans)
        );
    }

    #[test]
    fn tied_substituents_leave_ranked_configuration_open() {
        let stereo = DoubleBondStereo {
            bond: 1,
            atoms: [1, 2],
            references: [0, 3],
            alternates: [Some(4), None],
            configuration: Some(BondConfiguration::Trans),
        };
        assert_eq!(ranked_configuration(&stereo, &[0, 5, 6, 1, 0]), None);
        assert_eq!(
            ranked_configuration(&stereo, &[0, 5, 6, 1, 2]),
            Some(BondConfiguration::Trans)
        );
        assert_eq!(
            ranked_configuration(&stereo, &[2, 5, 6, 1, 0]),
            Some(BondConfiguration::Cis)
        );
    }

    #[test]
    fn fnv_hash_matches_reference_vector() {
        let mut h = Fnv1a::new();
        for b in b"a" {
            h.0 ^= *b as u64;
            h.0 = h.0.wrapping_mul(FNV_PRIME);
        }
        assert_eq!(h.finish(), 0xaf63dc4c8601ec8c);
    }
}
