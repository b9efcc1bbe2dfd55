use crate::core::io::molfile::{self, MolfileError, MolfileMetadata};
use crate::core::models::molecule::Molecule;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::trace;

pub const RECORD_DELIMITER: &str = "$$$$";

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid connection table: {0}")]
    Molfile(#[from] MolfileError),
    #[error("Malformed data item header on line {line}")]
    DataHeader { line: usize },
    #[error("Empty record ending on line {line}")]
    EmptyRecord { line: usize },
    #[error("Cannot write {field} so that it reads back unchanged: {reason}")]
    Unrepresentable { field: String, reason: &'static str },
}

/// Streams molecules out of a structure-data file, one record at a time.
///
/// Records are separated by `$$$$`. A missing delimiter after the last record
/// is tolerated, as is trailing whitespace at the end of the stream. Data items
/// are stored in each molecule's [`PropertyMap`](crate::core::models::properties::PropertyMap).
pub struct SdfReader<R> {
    reader: R,
    lines_read: usize,
    finished: bool,
}

impl<R: BufRead> SdfReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lines_read: 0,
            finished: false,
        }
    }

    /// Collects the lines of the next record without its delimiter.
    ///
    /// # Return
    ///
    /// Returns the lines, the 1-based number of the first line, and whether a
    /// delimiter closed the record.
    fn next_raw_record(&mut self) -> io::Result<(Vec<String>, usize, bool)> {
        let first_line = self.lines_read + 1;
        let mut lines = Vec::new();
        let mut buffer = String::new();
        loop {
            buffer.clear();
            if self.reader.read_line(&mut buffer)? == 0 {
                return Ok((lines, first_line, false));
            }
            self.lines_read += 1;
            let line = buffer.trim_end_matches(['\n', '\r']);
            if line.trim_end() == RECORD_DELIMITER {
                return Ok((lines, first_line, true));
            }
            lines.push(line.to_string());
        }
    }

    /// Steps over the next record without parsing it.
    ///
    /// # Return
    ///
    /// Returns `true` if there was a record to skip, counting empty records
    /// closed by a delimiter, under the same rules as [`Iterator::next`].
    pub fn skip_record(&mut self) -> io::Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let (lines, first_line, delimited) = match self.next_raw_record() {
            Ok(record) => record,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };
        if !delimited {
            self.finished = true;
        }
        trace!(first_line, lines = lines.len(), "Skipping SDF record");
        Ok(delimited || lines.iter().any(|l| !l.trim().is_empty()))
    }
}

impl<R: BufRead> Iterator for SdfReader<R> {
    type Item = Result<Molecule, SdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let (lines, first_line, delimited) = match self.next_raw_record() {
            Ok(record) => record,
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        };
        if !delimited {
            self.finished = true;
        }
        if lines.iter().all(|l| l.trim().is_empty()) {
            return if delimited {
                Some(Err(SdfError::EmptyRecord {
                    line: self.lines_read,
                }))
            } else {
                None
            };
        }
        trace!(first_line, lines = lines.len(), "Parsing SDF record");
        Some(parse_record(&lines, first_line))
    }
}

fn parse_record(lines: &[String], first_line: usize) -> Result<Molecule, SdfError> {
    let (mut molecule, _, consumed) = molfile::parse_block(lines, first_line)?;

    let mut rest = lines.iter().enumerate().skip(consumed).peekable();
    while let Some((idx, line)) = rest.next() {
        if line.trim().is_empty() {
            continue;
        }
        let line_num = first_line + idx;
        if !line.starts_with('>') {
            trace!(line = line_num, "Skipping stray line between data items");
            continue;
        }
        let key = parse_data_header(line).ok_or(SdfError::DataHeader { line: line_num })?;

        let mut value_lines: Vec<&str> = Vec::new();
        while let Some((_, value)) = rest.next_if(|(_, l)| !l.trim().is_empty()) {
            value_lines.push(value);
        }
        molecule.properties_mut().set(key, &value_lines.join("\n"));
    }
    Ok(molecule)
}

/// Extracts `key` from a data header such as `>  <key>` or `> 12 <key> (3)`.
fn parse_data_header(line: &str) -> Option<&str> {
    let start = line.find('<')? + 1;
    let len = line[start..].find('>')?;
    Some(&line[start..start + len])
}

/// Renders a molecule as one SDF record: connection table, one data item per
/// property tag in insertion order, then the `$$$$` delimiter.
///
/// # Errors
///
/// Besides connection-table limits, fails with [`SdfError::Unrepresentable`]
/// when a title, key or value would not read back as written.
pub fn render_record(molecule: &Molecule) -> Result<String, SdfError> {
    check_title(molecule.title())?;
    for (key, value) in molecule.properties().iter() {
        check_data_item(key, value)?;
    }

    let mut out = molfile::render_block(molecule, &MolfileMetadata::default())?;
    for (key, value) in molecule.properties().iter() {
        out.push_str(">  <");
        out.push_str(key);
        out.push_str(">\n");
        out.push_str(value);
        out.push_str("\n\n");
    }
    out.push_str(RECORD_DELIMITER);
    out.push('\n');
    Ok(out)
}

fn check_title(title: &str) -> Result<(), SdfError> {
    let first_line = title.lines().next().unwrap_or("");
    if first_line.trim_end() == RECORD_DELIMITER {
        return Err(SdfError::Unrepresentable {
            field: "title".to_string(),
            reason: "the title line is a record delimiter",
        });
    }
    Ok(())
}

/// A value reads back unchanged when it is empty or every one of its lines
/// is non-blank, free of carriage returns, and not a record delimiter.
fn check_data_item(key: &str, value: &str) -> Result<(), SdfError> {
    let unrepresentable = |reason| SdfError::Unrepresentable {
        field: format!("data item '{key}'"),
        reason,
    };
    if key.contains(['>', '\n', '\r']) {
        return Err(unrepresentable("keys cannot contain '>' or line breaks"));
    }
    if value.is_empty() {
        return Ok(());
    }
    for line in value.split('\n') {
        if line.trim().is_empty() {
            return Err(unrepresentable("values cannot contain blank lines"));
        }
        if line.ends_with('\r') {
            return Err(unrepresentable("values cannot contain carriage returns"));
        }
        if line.trim_end() == RECORD_DELIMITER {
            return Err(unrepresentable("a value line is a record delimiter"));
        }
    }
    Ok(())
}

pub fn write_record(molecule: &Molecule, writer: &mut impl Write) -> Result<(), SdfError> {
    writer.write_all(render_record(molecule)?.as_bytes())?;
    Ok(())
}
