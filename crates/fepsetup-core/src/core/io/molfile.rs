use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{BondOrder, BondStereo};
use nalgebra::Point3;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::trace;

const PROGRAM_NAME: &str = "fepsetup";
const MAX_V2000_COUNT: usize = 999;
const MAX_ENTRIES_PER_PROPERTY_LINE: usize = 8;
const MAX_TITLE_WIDTH: usize = 80;

/// Header lines of a molfile that are not part of the molecule.
///
/// The title (line 1) is stored on the [`Molecule`] itself because it doubles
/// as the legacy name of the structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MolfileMetadata {
    /// Line 2: program, timestamp and dimensional code. Regenerated when empty.
    pub program_line: String,
    /// Line 3: free-text comment.
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum MolfileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: MolfileParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Unsupported structure: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum MolfileParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short (must be at least {min} chars)")]
    LineTooShort { min: usize },
    #[error("Unknown element symbol '{symbol}'")]
    UnknownElement { symbol: String },
    #[error("Unsupported bond type {code}")]
    InvalidBondType { code: u8 },
    #[error("Atom number {index} is outside 1..={atom_count}")]
    AtomOutOfRange { index: usize, atom_count: usize },
    #[error("Unsupported connection table version '{version}'")]
    UnsupportedVersion { version: String },
    #[error("Malformed '{tag}' property line")]
    InvalidPropertyLine { tag: String },
    #[error("Unexpected end of block, expected {expected}")]
    UnexpectedEnd { expected: String },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn columns_label(start: usize, end: usize) -> String {
    format!("{}-{}", start + 1, end)
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    line_num: usize,
) -> Result<T, MolfileError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| MolfileError::Parse {
        line: line_num,
        kind: MolfileParseErrorKind::InvalidInt {
            columns: columns_label(start, end),
            value: value.into(),
        },
    })
}

/// Like [`parse_int`], but a blank field reads as zero.
fn parse_optional_int<T: std::str::FromStr + Default>(
    line: &str,
    start: usize,
    end: usize,
    line_num: usize,
) -> Result<T, MolfileError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(T::default())
    } else {
        parse_int(line, start, end, line_num)
    }
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, MolfileError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| MolfileError::Parse {
        line: line_num,
        kind: MolfileParseErrorKind::InvalidFloat {
            columns: columns_label(start, end),
            value: value.into(),
        },
    })
}

fn parse_element(symbol: &str, line_num: usize) -> Result<(Element, u16), MolfileError> {
    match symbol {
        "D" => Ok((Element::HYDROGEN, 2)),
        "T" => Ok((Element::HYDROGEN, 3)),
        _ => Element::from_symbol(symbol)
            .map(|element| (element, 0))
            .ok_or_else(|| MolfileError::Parse {
                line: line_num,
                kind: MolfileParseErrorKind::UnknownElement {
                    symbol: symbol.into(),
                },
            }),
    }
}

/// Maps the atom-block charge code to `(formal charge, radical electrons)`.
fn decode_charge_code(code: u8) -> (i8, u8) {
    match code {
        1 => (3, 0),
        2 => (2, 0),
        3 => (1, 0),
        4 => (0, 1),
        5 => (-1, 0),
        6 => (-2, 0),
        7 => (-3, 0),
        _ => (0, 0),
    }
}

fn encode_charge_code(formal_charge: i8) -> u8 {
    match formal_charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}

/// `M  RAD` multiplicity codes: singlet and triplet carry two unpaired electrons.
fn decode_radical(code: u8) -> u8 {
    match code {
        2 => 1,
        1 | 3 => 2,
        _ => 0,
    }
}

fn encode_radical(electrons: u8) -> u8 {
    match electrons {
        0 => 0,
        1 => 2,
        _ => 3,
    }
}

/// Cursor over the lines of one connection table.
struct BlockCursor<'a> {
    lines: &'a [String],
    first_line: usize,
    position: usize,
}

impl<'a> BlockCursor<'a> {
    fn next_line(&mut self, expected: &str) -> Result<(usize, &'a str), MolfileError> {
        let line_num = self.first_line + self.position;
        match self.lines.get(self.position) {
            Some(line) => {
                self.position += 1;
                Ok((line_num, line.as_str()))
            }
            None => Err(MolfileError::Parse {
                line: line_num,
                kind: MolfileParseErrorKind::UnexpectedEnd {
                    expected: expected.into(),
                },
            }),
        }
    }
}

/// Parses one V2000 connection table from pre-split lines.
///
/// `first_line` is the 1-based line number of `lines[0]` in the enclosing
/// stream and is used for error reporting only.
///
/// # Return
///
/// Returns the molecule, the header metadata and the number of lines consumed
/// up to and including `M  END`.
pub(crate) fn parse_block(
    lines: &[String],
    first_line: usize,
) -> Result<(Molecule, MolfileMetadata, usize), MolfileError> {
    let mut cursor = BlockCursor {
        lines,
        first_line,
        position: 0,
    };
    let mut molecule = Molecule::new();

    let (_, title) = cursor.next_line("title line")?;
    molecule.set_title(title.trim_end());
    let (_, program_line) = cursor.next_line("program line")?;
    let (_, comment) = cursor.next_line("comment line")?;
    let metadata = MolfileMetadata {
        program_line: program_line.trim_end().to_string(),
        comment: comment.trim_end().to_string(),
    };

    let (counts_num, counts) = cursor.next_line("counts line")?;
    let version = slice_and_trim(counts, 33, 39);
    if !version.is_empty() && version != "V2000" {
        return Err(MolfileError::Parse {
            line: counts_num,
            kind: MolfileParseErrorKind::UnsupportedVersion {
                version: version.into(),
            },
        });
    }
    let atom_count: usize = parse_int(counts, 0, 3, counts_num)?;
    let bond_count: usize = parse_optional_int(counts, 3, 6, counts_num)?;
    trace!(atom_count, bond_count, "Parsing V2000 connection table");

    for i in 0..atom_count {
        let (line_num, line) = cursor.next_line(&format!("atom {} of {}", i + 1, atom_count))?;
        if line.len() < 34 {
            return Err(MolfileError::Parse {
                line: line_num,
                kind: MolfileParseErrorKind::LineTooShort { min: 34 },
            });
        }
        let x = parse_float(line, 0, 10, line_num)?;
        let y = parse_float(line, 10, 20, line_num)?;
        let z = parse_float(line, 20, 30, line_num)?;
        let (element, isotope) = parse_element(slice_and_trim(line, 31, 34), line_num)?;
        let charge_code: u8 = parse_optional_int(line, 36, 39, line_num)?;
        let (formal_charge, radical_electrons) = decode_charge_code(charge_code);

        let mut atom = Atom::new(element, Point3::new(x, y, z))
            .with_charge(formal_charge)
            .with_isotope(isotope);
        atom.radical_electrons = radical_electrons;
        molecule.add_atom(atom);
    }

    let check_atom = |index: usize, line_num: usize| {
        if index == 0 || index > atom_count {
            Err(MolfileError::Parse {
                line: line_num,
                kind: MolfileParseErrorKind::AtomOutOfRange { index, atom_count },
            })
        } else {
            Ok(index - 1)
        }
    };

    for i in 0..bond_count {
        let (line_num, line) = cursor.next_line(&format!("bond {} of {}", i + 1, bond_count))?;
        if line.len() < 9 {
            return Err(MolfileError::Parse {
                line: line_num,
                kind: MolfileParseErrorKind::LineTooShort { min: 9 },
            });
        }
        let a1 = check_atom(parse_int(line, 0, 3, line_num)?, line_num)?;
        let a2 = check_atom(parse_int(line, 3, 6, line_num)?, line_num)?;
        let code: u8 = parse_int(line, 6, 9, line_num)?;
        let order = BondOrder::from_molfile_code(code).ok_or(MolfileError::Parse {
            line: line_num,
            kind: MolfileParseErrorKind::InvalidBondType { code },
        })?;
        let stereo_code: u8 = parse_optional_int(line, 9, 12, line_num)?;

        let existing = molecule.bond_count();
        let bond_idx = molecule.add_bond(a1, a2, order).ok_or_else(|| {
            MolfileError::Inconsistency(format!(
                "Bond on line {} joins atom {} to itself",
                line_num,
                a1 + 1
            ))
        })?;
        if bond_idx < existing {
            return Err(MolfileError::Inconsistency(format!(
                "Duplicate bond between atoms {} and {} on line {}",
                a1 + 1,
                a2 + 1,
                line_num
            )));
        }
        if let Some(bond) = molecule.bond_mut(bond_idx) {
            bond.stereo = BondStereo::from_molfile_code(stereo_code);
        }
    }

    let mut charges_reset = false;
    loop {
        let (line_num, line) = cursor.next_line("'M  END'")?;
        if line.starts_with("M  END") {
            break;
        }
        let tag = slice_and_trim(line, 3, 6);
        if !line.starts_with("M  ") || !matches!(tag, "CHG" | "ISO" | "RAD") {
            trace!(line = line_num, "Skipping unsupported property line");
            continue;
        }
        if tag != "ISO" && !charges_reset {
            for idx in 0..molecule.atom_count() {
                if let Some(atom) = molecule.atom_mut(idx) {
                    atom.formal_charge = 0;
                    atom.radical_electrons = 0;
                }
            }
            charges_reset = true;
        }
        for (index, value) in parse_property_entries(line, tag, line_num)? {
            let idx = check_atom(index, line_num)?;
            let invalid = || MolfileError::Parse {
                line: line_num,
                kind: MolfileParseErrorKind::InvalidPropertyLine { tag: tag.into() },
            };
            let Some(atom) = molecule.atom_mut(idx) else {
                continue;
            };
            match tag {
                "CHG" => atom.formal_charge = i8::try_from(value).map_err(|_| invalid())?,
                "ISO" => atom.isotope = u16::try_from(value).map_err(|_| invalid())?,
                _ => atom.radical_electrons = decode_radical(u8::try_from(value).map_err(|_| invalid())?),
            }
        }
    }

    Ok((molecule, metadata, cursor.position))
}

fn parse_property_entries(
    line: &str,
    tag: &str,
    line_num: usize,
) -> Result<Vec<(usize, i32)>, MolfileError> {
    let invalid = || MolfileError::Parse {
        line: line_num,
        kind: MolfileParseErrorKind::InvalidPropertyLine { tag: tag.into() },
    };
    let mut tokens = line.get(6..).unwrap_or("").split_whitespace();
    let count: usize = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(invalid)?;
    if count == 0 || count > MAX_ENTRIES_PER_PROPERTY_LINE {
        return Err(invalid());
    }
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let index = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(invalid)?;
        let value = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(invalid)?;
        entries.push((index, value));
    }
    Ok(entries)
}

fn push_property_lines(out: &mut String, tag: &str, entries: &[(usize, i32)]) {
    for chunk in entries.chunks(MAX_ENTRIES_PER_PROPERTY_LINE) {
        let _ = write!(out, "M  {}{:>3}", tag, chunk.len());
        for (index, value) in chunk {
            let _ = write!(out, " {:>3} {:>3}", index, value);
        }
        out.push('\n');
    }
}

/// Renders a molecule as a V2000 connection table, ending with `M  END\n`.
///
/// # Errors
///
/// Returns [`MolfileError::Unsupported`] if the molecule has more atoms or
/// bonds than the fixed-width counts line can hold.
pub fn render_block(molecule: &Molecule, metadata: &MolfileMetadata) -> Result<String, MolfileError> {
    if molecule.atom_count() > MAX_V2000_COUNT || molecule.bond_count() > MAX_V2000_COUNT {
        return Err(MolfileError::Unsupported(format!(
            "{} atoms and {} bonds exceed the V2000 limit of {}",
            molecule.atom_count(),
            molecule.bond_count(),
            MAX_V2000_COUNT
        )));
    }

    let mut out = String::new();
    let title: String = molecule
        .title()
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(MAX_TITLE_WIDTH)
        .collect();
    out.push_str(&title);
    out.push('\n');
    if metadata.program_line.is_empty() {
        let dimension = if molecule.has_3d_coordinates() { "3D" } else { "2D" };
        let _ = writeln!(out, "  {:<8}{:10}{}", PROGRAM_NAME, "", dimension);
    } else {
        let _ = writeln!(out, "{}", metadata.program_line);
    }
    let _ = writeln!(out, "{}", metadata.comment);
    let _ = writeln!(
        out,
        "{:>3}{:>3}{}999 V2000",
        molecule.atom_count(),
        molecule.bond_count(),
        "  0".repeat(8)
    );

    let mut charges = Vec::new();
    let mut isotopes = Vec::new();
    let mut radicals = Vec::new();
    for (idx, atom) in molecule.atoms().iter().enumerate() {
        let serial = idx + 1;
        let _ = writeln!(
            out,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{:>3}{}",
            atom.position.x,
            atom.position.y,
            atom.position.z,
            atom.element.symbol(),
            encode_charge_code(atom.formal_charge),
            "  0".repeat(10)
        );
        if atom.formal_charge != 0 {
            charges.push((serial, atom.formal_charge as i32));
        }
        if atom.isotope != 0 {
            isotopes.push((serial, atom.isotope as i32));
        }
        if atom.radical_electrons != 0 {
            radicals.push((serial, encode_radical(atom.radical_electrons) as i32));
        }
    }

    for bond in molecule.bonds() {
        let _ = writeln!(
            out,
            "{:>3}{:>3}{:>3}{:>3}",
            bond.atom1 + 1,
            bond.atom2 + 1,
            bond.order.molfile_code(),
            bond.stereo.molfile_code(bond.order)
        );
    }

    push_property_lines(&mut out, "CHG", &charges);
    push_property_lines(&mut out, "RAD", &radicals);
    push_property_lines(&mut out, "ISO", &isotopes);
    out.push_str("M  END\n");
    Ok(out)
}

/// The MDL V2000 molfile format.
pub struct MolFile;

impl MolFile {
    /// Parses a single molfile held in memory.
    pub fn from_block(text: &str) -> Result<Molecule, MolfileError> {
        let lines: Vec<String> = text.lines().map(|l| l.trim_end_matches('\r').to_string()).collect();
        parse_block(&lines, 1).map(|(molecule, _, _)| molecule)
    }
}

impl MolecularFile for MolFile {
    type Metadata = MolfileMetadata;
    type Error = MolfileError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Molecule, Self::Metadata), Self::Error> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let is_end = line.starts_with("M  END");
            lines.push(line.trim_end_matches('\r').to_string());
            if is_end {
                break;
            }
        }
        parse_block(&lines, 1).map(|(molecule, metadata, _)| (molecule, metadata))
    }

    fn write_to(
        molecule: &Molecule,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writer.write_all(render_block(molecule, metadata)?.as_bytes())?;
        Ok(())
    }

    fn write_molecule_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_to(molecule, &MolfileMetadata::default(), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use std::io::Cursor;

    fn read(text: &str) -> Result<(Molecule, MolfileMetadata), MolfileError> {
        MolFile::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn reads_atoms_bonds_and_header() {
        let (mol, metadata) = read(fixtures::ETHANOL_MOLBLOCK).unwrap();

        assert_eq!(mol.title(), "ethanol");
        assert!(metadata.program_line.contains("3D"));
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atom(2).unwrap().element, Element::OXYGEN);
        assert!((mol.atom(1).unwrap().position.x - 1.5140).abs() < 1e-9);
        assert_eq!(mol.bond_between(1, 2).unwrap().order, BondOrder::Single);
    }

    #[test]
    fn atom_block_charge_codes_are_decoded() {
        let block = "\
charged
  fepsetup          2D

  2  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 N   0  3  0  0  0  0  0  0  0  0  0  0
    1.0000    0.0000    0.0000 C   0  4  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
M  END
";
        let (mol, _) = read(block).unwrap();
        assert_eq!(mol.atom(0).unwrap().formal_charge, 1);
        assert_eq!(mol.atom(1).unwrap().radical_electrons, 1);
        assert_eq!(mol.atom(1).unwrap().formal_charge, 0);
    }

    #[test]
    fn property_lines_supersede_atom_block_values() {
        let block = "\
acetate


  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  3  0  0  0  0  0  0  0  0  0  0
    1.2000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
   -0.6000    1.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  2  0
  1  3  1  0
M  CHG  1   3  -1
M  ISO  1   1  13
M  END
";
        let (mol, _) = read(block).unwrap();
        assert_eq!(mol.atom(0).unwrap().formal_charge, 0);
        assert_eq!(mol.atom(0).unwrap().isotope, 13);
        assert_eq!(mol.atom(2).unwrap().formal_charge, -1);
    }

    #[test]
    fn deuterium_symbol_maps_to_hydrogen_isotope() {
        let block = "\
heavy water


  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
    0.9600    0.0000    0.0000 D   0  0  0  0  0  0  0  0  0  0  0  0
   -0.2400    0.9300    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  1  3  1  0
M  END
";
        let (mol, _) = read(block).unwrap();
        let deuterium = mol.atom(1).unwrap();
        assert_eq!(deuterium.element, Element::HYDROGEN);
        assert_eq!(deuterium.isotope, 2);
        assert_eq!(mol.atom(2).unwrap().isotope, 0);
    }

    #[test]
    fn v3000_blocks_are_rejected_with_line_number() {
        let block = "\
title


  0  0  0     0  0            999 V3000
M  END
";
        match read(block) {
            Err(MolfileError::Parse {
                line: 4,
                kind: MolfileParseErrorKind::UnsupportedVersion { version },
            }) => assert_eq!(version, "V3000"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn truncated_block_reports_missing_end() {
        let truncated = fixtures::ETHANOL_MOLBLOCK.replace("M  END\n", "");
        match read(&truncated) {
            Err(MolfileError::Parse {
                line,
                kind: MolfileParseErrorKind::UnexpectedEnd { .. },
            }) => assert_eq!(line, 10),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_coordinate_reports_columns_and_line() {
        let broken = fixtures::ETHANOL_MOLBLOCK.replacen("-0.0134", "  abc  ", 1);
        let err = read(&broken).unwrap_err();
        assert!(matches!(
            err,
            MolfileError::Parse {
                line: 5,
                kind: MolfileParseErrorKind::InvalidFloat { .. }
            }
        ));
        assert!(err.to_string().contains("columns 1-10"));
    }

    #[test]
    fn bond_to_missing_atom_is_rejected() {
        let broken = fixtures::ETHANOL_MOLBLOCK.replace("  2  3  1  0", "  2  7  1  0");
        assert!(matches!(
            read(&broken),
            Err(MolfileError::Parse {
                kind: MolfileParseErrorKind::AtomOutOfRange { index: 7, atom_count: 3 },
                ..
            })
        ));
    }

    #[test]
    fn duplicate_bond_is_an_inconsistency() {
        let broken = fixtures::ETHANOL_MOLBLOCK.replace("  2  3  1  0", "  2  1  1  0");
        assert!(matches!(read(&broken), Err(MolfileError::Inconsistency(_))));
    }

    #[test]
    fn written_block_uses_fixed_columns() {
        let (mol, _) = read(fixtures::ETHANOL_MOLBLOCK).unwrap();
        let text = render_block(&mol, &MolfileMetadata::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ethanol");
        assert_eq!(lines[1], "  fepsetup          3D");
        assert_eq!(lines[3], "  3  2  0  0  0  0  0  0  0  0999 V2000");
        assert_eq!(
            lines[4],
            "   -0.0134    1.0000    0.0021 C   0  0  0  0  0  0  0  0  0  0  0  0"
        );
        assert_eq!(lines[7], "  1  2  1  0");
        assert_eq!(*lines.last().unwrap(), "M  END");
    }

    #[test]
    fn written_block_reads_back_identically() {
        let mut mol = Molecule::new();
        mol.set_title("radical cation");
        let c = mol.add_atom(Atom::new(Element::CARBON, Point3::new(0.0, 0.0, 0.0)).with_isotope(13));
        let n = mol.add_atom(Atom::new(Element::NITROGEN, Point3::new(1.4, 0.0, 0.0)).with_charge(1));
        mol.atom_mut(c).unwrap().radical_electrons = 1;
        mol.add_bond(c, n, BondOrder::Double);

        let mut buffer = Vec::new();
        MolFile::write_molecule_to(&mol, &mut buffer).unwrap();
        let (back, metadata) = MolFile::read_from(&mut Cursor::new(buffer)).unwrap();

        assert_eq!(back, mol);
        assert!(metadata.program_line.ends_with("2D"));
    }

    #[test]
    fn property_lines_are_split_after_eight_entries() {
        let mut mol = Molecule::new();
        for _ in 0..10 {
            mol.add_atom(Atom::new(Element::CARBON, Point3::origin()).with_charge(-1));
        }
        let text = render_block(&mol, &MolfileMetadata::default()).unwrap();
        let chg_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("M  CHG")).collect();

        assert_eq!(chg_lines.len(), 2);
        assert!(chg_lines[0].starts_with("M  CHG  8"));
        assert!(chg_lines[1].starts_with("M  CHG  2"));
        assert_eq!(MolFile::from_block(&text).unwrap(), mol);
    }

    #[test]
    fn write_and_read_through_file_path() {
        let (mol, _) = read(fixtures::ETHANOL_MOLBLOCK).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ethanol.mol");

        MolFile::write_molecule_to_path(&mol, &path).unwrap();
        let (back, _) = MolFile::read_from_path(&path).unwrap();
        assert_eq!(back.atom_count(), 3);
        assert_eq!(back.title(), "ethanol");
    }
}
