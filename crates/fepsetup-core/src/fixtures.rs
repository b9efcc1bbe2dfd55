//! Shared molblocks and helpers for unit tests.

use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use std::fs::{self, File};
use std::sync::Mutex;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

pub const ETHANOL_MOLBLOCK: &str = r#"ethanol
     RDKit          3D

  3  2  0  0  0  0  0  0  0  0999 V2000
   -0.0134    1.0000    0.0021 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.5140    0.9950   -0.0012 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.0224    2.3214    0.0054 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
"#;

pub const BENZENE_MOLBLOCK: &str = r#"benzene
     RDKit          2D

  6  6  0  0  0  0  0  0  0  0999 V2000
    1.3960    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.6980    1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -0.6980    1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -1.3960    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -0.6980   -1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.6980   -1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  4  0
  2  3  4  0
  3  4  4  0
  4  5  4  0
  5  6  4  0
  6  1  4  0
M  END
"#;

pub const TOLUENE_MOLBLOCK: &str = r#"toluene
     RDKit          2D

  7  7  0  0  0  0  0  0  0  0999 V2000
    1.3960    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.6980    1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -0.6980    1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -1.3960    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -0.6980   -1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.6980   -1.2090    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.9060    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  4  0
  2  3  4  0
  3  4  4  0
  4  5  4  0
  5  6  4  0
  6  1  4  0
  1  7  1  0
M  END
"#;

pub const ISOBUTANOL_MOLBLOCK: &str = r#"isobutanol
     RDKit          3D

  5  4  0  0  0  0  0  0  0  0999 V2000
   -1.2670    0.7540    0.5120 C   0  0  0  0  0  0  0  0  0  0  0  0
   -0.0410   -0.0570    0.1070 C   0  0  0  0  0  0  0  0  0  0  0  0
   -0.1620   -1.4590    0.6940 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.2270    0.5930    0.6510 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.3690   -0.1410    0.2390 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
  2  4  1  0
  4  5  1  0
M  END
"#;

/// Bromochlorofluoromethane with one defined configuration; the hydrogen is
/// implicit and every bond starts at the carbon.
pub const CHBRCLF_MOLBLOCK: &str = r#"bromochlorofluoromethane
     RDKit          3D

  4  3  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000    0.0000    1.9400 Br  0  0  0  0  0  0  0  0  0  0  0  0
    1.6688    0.0000   -0.5900 Cl  0  0  0  0  0  0  0  0  0  0  0  0
   -0.6364    1.1023   -0.4500 F   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  1  3  1  0
  1  4  1  0
M  END
"#;

/// A carbon at the origin with F at the apex of a regular tetrahedron and
/// Cl, Br, I below it at 0, 120 and 240 degrees.
pub fn tetrahedral_center() -> Molecule {
    let mut mol = Molecule::new();
    let center = mol.add_atom(Atom::new(Element::CARBON, Point3::origin()));
    let base_radius = 8f64.sqrt() / 3.0;
    let positions = [
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(base_radius, 0.0, -1.0 / 3.0),
        Point3::new(
            base_radius * (2.0 * std::f64::consts::FRAC_PI_3).cos(),
            base_radius * (2.0 * std::f64::consts::FRAC_PI_3).sin(),
            -1.0 / 3.0,
        ),
        Point3::new(
            base_radius * (4.0 * std::f64::consts::FRAC_PI_3).cos(),
            base_radius * (4.0 * std::f64::consts::FRAC_PI_3).sin(),
            -1.0 / 3.0,
        ),
    ];
    for (symbol, position) in ["F", "Cl", "Br", "I"].into_iter().zip(positions) {
        let element = Element::from_symbol(symbol).unwrap();
        let idx = mol.add_atom(Atom::new(element, position));
        mol.add_bond(center, idx, BondOrder::Single).unwrap();
    }
    mol
}

/// Builds a molecule from element symbols and bonds, with every atom at the
/// origin.
pub fn molecule(symbols: &[&str], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
    let atoms: Vec<(&str, [f64; 2])> = symbols.iter().map(|&s| (s, [0.0, 0.0])).collect();
    molecule_2d(&atoms, bonds)
}

/// Builds a flat drawing from `(symbol, [x, y])` atoms and bonds.
pub fn molecule_2d(atoms: &[(&str, [f64; 2])], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
    let mut mol = Molecule::new();
    for &(symbol, [x, y]) in atoms {
        let element = Element::from_symbol(symbol).unwrap();
        mol.add_atom(Atom::new(element, Point3::new(x, y, 0.0)));
    }
    for &(a, b, order) in bonds {
        mol.add_bond(a, b, order).unwrap();
    }
    mol
}

/// A six-membered carbon ring with alternating single and double bonds.
/// `shift` moves the double bonds one position round the ring.
pub fn benzene_kekule(shift: bool) -> Molecule {
    let offset = usize::from(shift);
    let bonds: Vec<(usize, usize, BondOrder)> = (0..6)
        .map(|i| {
            let order = if (i + offset) % 2 == 0 {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
            (i, (i + 1) % 6, order)
        })
        .collect();
    molecule(&["C"; 6], &bonds)
}

/// Naphthalene with atoms 4 and 9 at the ring fusion.
pub fn naphthalene_kekule() -> Molecule {
    use BondOrder::{Double, Single};
    molecule(
        &["C"; 10],
        &[
            (0, 1, Double),
            (1, 2, Single),
            (2, 3, Double),
            (3, 4, Single),
            (4, 5, Single),
            (5, 6, Double),
            (6, 7, Single),
            (7, 8, Double),
            (8, 9, Single),
            (9, 0, Single),
            (4, 9, Double),
        ],
    )
}

/// 2-Butene drawn flat along the x axis, with the methyls on the same side
/// when `cis` holds.
pub fn butene(cis: bool) -> Molecule {
    use BondOrder::{Double, Single};
    let last_y = if cis { 0.87 } else { -0.87 };
    molecule_2d(
        &[
            ("C", [-0.5, 0.87]),
            ("C", [0.0, 0.0]),
            ("C", [1.3, 0.0]),
            ("C", [1.8, last_y]),
        ],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single)],
    )
}

/// Copies `mol` with atom `i` moved to index `perm[i]`. Bonds keep their
/// order, direction and stereo flags.
pub fn renumbered(mol: &Molecule, perm: &[usize]) -> Molecule {
    let mut slots: Vec<Option<Atom>> = vec![None; mol.atom_count()];
    for (old, atom) in mol.atoms().iter().enumerate() {
        slots[perm[old]] = Some(atom.clone());
    }
    let mut out = Molecule::new();
    out.set_title(mol.title());
    for (key, value) in mol.properties().iter() {
        out.properties_mut().set(key, value);
    }
    for atom in slots {
        out.add_atom(atom.unwrap());
    }
    for bond in mol.bonds() {
        let idx = out
            .add_bond(perm[bond.atom1], perm[bond.atom2], bond.order)
            .unwrap();
        out.bond_mut(idx).unwrap().stereo = bond.stereo;
    }
    out
}

/// Runs `f` with a warning-level subscriber writing to a temporary log file
/// and returns its result together with everything that was logged.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("warnings.log");
    let file = File::create(&log_path).unwrap();

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::WARN)
        .with(file_layer);

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, fs::read_to_string(log_path).unwrap())
}
