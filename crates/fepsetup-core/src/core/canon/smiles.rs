use super::ranking::{self, CanonicalRanking};
use super::stereo::{BondConfiguration, Chirality, DoubleBondStereo, Neighbor};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::fmt::Write as _;
use tracing::debug;

/// Writes the canonical SMILES of a molecule.
///
/// Two molecules with the same connectivity, charges, isotopes and defined
/// tetrahedral and double-bond configurations yield the same string
/// regardless of atom order, Kekulé structure, coordinates or property tags.
pub fn canonical_smiles(mol: &Molecule) -> String {
    write_smiles(&CanonicalRanking::compute(mol))
}

/// Writes SMILES for the normalized molecule of a precomputed ranking.
pub fn write_smiles(ranking: &CanonicalRanking) -> String {
    let mol = ranking.form.molecule();
    let mut order: Vec<usize> = (0..mol.atom_count()).collect();
    order.sort_by_key(|&i| ranking.ranks[i]);

    let mut tree = SpanningForest::new(mol, &ranking.ranks);
    let mut roots = Vec::new();
    for &start in &order {
        if !tree.visited[start] {
            tree.explore(start);
            roots.push(start);
        }
    }

    let mut writer = Writer {
        mol,
        ranking,
        directions: bond_directions(ranking, &tree),
        digits: Vec::new(),
        bond_digits: vec![None; mol.bond_count()],
        out: String::new(),
    };
    for (i, &root) in roots.iter().enumerate() {
        if i > 0 {
            writer.out.push('.');
        }
        writer.write_atom(root, &tree);
    }
    writer.out
}

/// DFS spanning forest with ring-closure bonds, visiting neighbours in rank order.
struct SpanningForest {
    visited: Vec<bool>,
    /// Position of each atom in the written string, counted over all atoms.
    preorder: Vec<usize>,
    visit_count: usize,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<(usize, usize)>>,
    /// Ring bonds opened at an atom, as `(partner, bond)`.
    ring_opens: Vec<Vec<(usize, usize)>>,
    /// Ring bonds closed at an atom, as `(partner, bond)`.
    ring_closes: Vec<Vec<(usize, usize)>>,
    sorted_neighbors: Vec<Vec<(usize, usize)>>,
    bond_used: Vec<bool>,
}

impl SpanningForest {
    fn new(mol: &Molecule, ranks: &[usize]) -> Self {
        let n = mol.atom_count();
        let sorted_neighbors = (0..n)
            .map(|i| {
                let mut bonded = mol.bonded(i).to_vec();
                bonded.sort_by_key(|&(nb, _)| ranks[nb]);
                bonded
            })
            .collect();
        Self {
            visited: vec![false; n],
            preorder: vec![0; n],
            visit_count: 0,
            parent: vec![None; n],
            children: vec![Vec::new(); n],
            ring_opens: vec![Vec::new(); n],
            ring_closes: vec![Vec::new(); n],
            sorted_neighbors,
            bond_used: vec![false; mol.bond_count()],
        }
    }

    fn visit(&mut self, atom: usize) {
        self.visited[atom] = true;
        self.preorder[atom] = self.visit_count;
        self.visit_count += 1;
    }

    fn explore(&mut self, start: usize) {
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        self.visit(start);
        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            let Some(&(neighbor, bond)) = self.sorted_neighbors[node].get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;
            if self.bond_used[bond] {
                continue;
            }
            self.bond_used[bond] = true;
            if self.visited[neighbor] {
                self.ring_opens[neighbor].push((node, bond));
                self.ring_closes[node].push((neighbor, bond));
            } else {
                self.visit(neighbor);
                self.parent[neighbor] = Some(node);
                self.children[node].push((neighbor, bond));
                stack.push((neighbor, 0));
            }
        }
    }

    /// Neighbours in the order they appear around `node` in the output.
    fn written_order(&self, node: usize, implicit_hydrogen: bool) -> Vec<Neighbor> {
        let mut order = Vec::with_capacity(4);
        if let Some(p) = self.parent[node] {
            order.push(Neighbor::Atom(p));
        }
        if implicit_hydrogen {
            order.push(Neighbor::ImplicitHydrogen);
        }
        let rings = self.ring_closes[node].iter().chain(&self.ring_opens[node]);
        let children = self.children[node].iter();
        order.extend(rings.chain(children).map(|&(nb, _)| Neighbor::Atom(nb)));
        order
    }
}

/// `/` or `\` for the bond from a double-bond end to one of its
/// substituents, given whether the substituent sits above the end atom.
/// The symbol reads from the atom written first.
fn direction_symbol(end_written_first: bool, substituent_up: bool) -> char {
    match (end_written_first, substituent_up) {
        (true, true) | (false, false) => '/',
        (true, false) | (false, true) => '\\',
    }
}

/// Assigns `/` and `\` to single bonds around defined stereo double bonds.
///
/// Double bonds are handled in rank order. At each end the lowest-ranked
/// substituent gets the symbol unless a neighbouring double bond already
/// fixed one there; conjugated systems whose symbols cannot all agree lose
/// the conflicting configuration.
fn bond_directions(ranking: &CanonicalRanking, tree: &SpanningForest) -> Vec<Option<char>> {
    let mol = ranking.form.molecule();
    let ranks = &ranking.ranks;
    let mut directions: Vec<Option<char>> = vec![None; mol.bond_count()];

    let mut stereo: Vec<(&DoubleBondStereo, [usize; 2], BondConfiguration)> = ranking
        .double_bonds
        .iter()
        .filter_map(|double_bond| {
            let mut ends = double_bond.atoms;
            ends.sort_by_key(|&a| ranks[a]);
            let configuration = ranking::ranked_configuration(double_bond, ranks)?;
            Some((double_bond, ends, configuration))
        })
        .collect();
    stereo.sort_by_key(|&(_, ends, _)| ranks[ends[0]]);

    for (double_bond, ends, configuration) in stereo {
        let sides: Vec<Vec<usize>> = ends
            .iter()
            .map(|&end| {
                let mut subs = double_bond.substituents(end);
                subs.sort_by_key(|&s| ranks[s]);
                subs
            })
            .collect();
        // Symbols wanted for each substituent bond when the first end's
        // lowest substituent sits up (`first_up`) or down.
        let plan = |first_up: bool| -> Vec<Vec<(usize, char)>> {
            let second_up = match configuration {
                BondConfiguration::Cis => first_up,
                BondConfiguration::Trans => !first_up,
            };
            ends.iter()
                .zip(&sides)
                .zip([first_up, second_up])
                .map(|((&end, subs), up)| {
                    subs.iter()
                        .enumerate()
                        .filter_map(|(k, &sub)| {
                            let bond = mol.bond_index_between(end, sub)?;
                            let sub_up = if k == 0 { up } else { !up };
                            let first = tree.preorder[end] < tree.preorder[sub];
                            Some((bond, direction_symbol(first, sub_up)))
                        })
                        .collect()
                })
                .collect()
        };
        let prefer_up = plan(true)
            .first()
            .and_then(|side| side.first())
            .is_some_and(|&(_, c)| c == '/');

        let mut placed = false;
        for first_up in [prefer_up, !prefer_up] {
            let wanted = plan(first_up);
            let consistent = wanted
                .iter()
                .flatten()
                .all(|&(bond, c)| directions[bond].is_none_or(|d| d == c));
            if !consistent {
                continue;
            }
            for side in &wanted {
                if side.iter().all(|&(bond, _)| directions[bond].is_none()) {
                    if let Some(&(bond, c)) = side.first() {
                        directions[bond] = Some(c);
                    }
                }
            }
            placed = true;
            break;
        }
        if !placed {
            debug!(
                bond = double_bond.bond,
                "Dropping double bond configuration that conflicts with its neighbours"
            );
        }
    }
    directions
}

struct Writer<'a> {
    mol: &'a Molecule,
    ranking: &'a CanonicalRanking,
    /// `/` or `\` per bond, for single bonds next to stereo double bonds.
    directions: Vec<Option<char>>,
    /// Ring-closure digits currently in use, indexed by digit.
    digits: Vec<bool>,
    bond_digits: Vec<Option<usize>>,
    out: String,
}

impl Writer<'_> {
    fn write_atom(&mut self, node: usize, tree: &SpanningForest) {
        let chirality = self.ranking.stereocenter(node).and_then(|center| {
            let has_h = center.neighbors.contains(&Neighbor::ImplicitHydrogen);
            center.chirality_in_order(&tree.written_order(node, has_h))
        });
        self.write_symbol(node, chirality);

        let mut released = Vec::new();
        for &(_, bond) in &tree.ring_closes[node] {
            if let Some(digit) = self.bond_digits[bond] {
                write_ring_digit(digit, &mut self.out);
                released.push(digit);
            }
        }
        for &(_, bond) in &tree.ring_opens[node] {
            let digit = self.allocate_digit();
            self.bond_digits[bond] = Some(digit);
            self.write_bond(bond);
            write_ring_digit(digit, &mut self.out);
        }
        for digit in released {
            self.digits[digit] = false;
        }

        let children = &tree.children[node];
        for (i, &(child, bond)) in children.iter().enumerate() {
            let is_branch = i + 1 < children.len();
            if is_branch {
                self.out.push('(');
            }
            self.write_bond(bond);
            self.write_atom(child, tree);
            if is_branch {
                self.out.push(')');
            }
        }
    }

    fn allocate_digit(&mut self) -> usize {
        let digit = (1..self.digits.len())
            .find(|&d| !self.digits[d])
            .unwrap_or(self.digits.len().max(1));
        if digit >= self.digits.len() {
            self.digits.resize(digit + 1, false);
        }
        self.digits[digit] = true;
        digit
    }

    fn write_bond(&mut self, bond: usize) {
        if let Some(symbol) = self.bond_symbol(bond) {
            self.out.push(symbol);
        }
    }

    fn bond_symbol(&self, idx: usize) -> Option<char> {
        if let Some(direction) = self.directions[idx] {
            return Some(direction);
        }
        let form = &self.ranking.form;
        if form.is_aromatic_bond(idx) {
            return None;
        }
        let bond = &self.mol.bonds()[idx];
        match bond.order {
            BondOrder::Aromatic => None,
            BondOrder::Double => Some('='),
            BondOrder::Triple => Some('#'),
            BondOrder::Single
                if form.is_aromatic_atom(bond.atom1) && form.is_aromatic_atom(bond.atom2) =>
            {
                Some('-')
            }
            BondOrder::Single => None,
        }
    }

    /// Hydrogens a SMILES reader would infer for the atom written bare.
    fn inferred_hydrogens(&self, node: usize) -> u8 {
        let form = &self.ranking.form;
        let Some(valences) = self.mol.atoms()[node].element.default_valences(0) else {
            return 0;
        };
        let used: u32 = self
            .mol
            .bonded(node)
            .iter()
            .map(|&(_, bond)| {
                if form.is_aromatic_bond(bond) {
                    1
                } else {
                    (self.mol.bonds()[bond].order.half_units() as u32).div_ceil(2)
                }
            })
            .sum();
        let hydrogens = valences
            .iter()
            .map(|&v| v as u32)
            .find(|&v| v >= used)
            .map_or(0, |v| v - used);
        let hydrogens = if form.is_aromatic_atom(node) {
            hydrogens.saturating_sub(1)
        } else {
            hydrogens
        };
        hydrogens as u8
    }

    fn write_symbol(&mut self, node: usize, chirality: Option<Chirality>) {
        let atom = &self.mol.atoms()[node];
        let element = atom.element;
        let aromatic = self.ranking.form.is_aromatic_atom(node);
        let lowercase = aromatic && element.has_aromatic_symbol();
        let hydrogens = self.mol.implicit_hydrogens(node);

        let bare = element.is_organic_subset()
            && (!aromatic || lowercase)
            && atom.isotope == 0
            && atom.formal_charge == 0
            && atom.radical_electrons == 0
            && chirality.is_none()
            && self.inferred_hydrogens(node) == hydrogens;
        let symbol = if lowercase {
            element.symbol().to_ascii_lowercase()
        } else {
            element.symbol().to_string()
        };
        if bare {
            self.out.push_str(&symbol);
            return;
        }

        self.out.push('[');
        if atom.isotope != 0 {
            let _ = write!(self.out, "{}", atom.isotope);
        }
        self.out.push_str(&symbol);
        if let Some(chirality) = chirality {
            self.out.push_str(chirality.smiles_symbol());
        }
        match hydrogens {
            0 => {}
            1 => self.out.push('H'),
            h => {
                let _ = write!(self.out, "H{}", h);
            }
        }
        match atom.formal_charge {
            0 => {}
            1 => self.out.push('+'),
            -1 => self.out.push('-'),
            c => {
                let _ = write!(self.out, "{:+}", c);
            }
        }
        self.out.push(']');
    }
}

fn write_ring_digit(digit: usize, out: &mut String) {
    let _ = match digit {
        0..=9 => write!(out, "{}", digit),
        10..=99 => write!(out, "%{}", digit),
        _ => write!(out, "%({})", digit),
    };
}
