use super::config::IdentityConfig;
use super::error::LigandError;
use super::forcefield::ForceFieldMolecule;
use super::hashing::LigandHash;
use crate::core::canon::smiles::canonical_smiles;
use crate::core::io::sdf::{self, SdfError, SdfReader};
use crate::core::models::molecule::Molecule;
use crate::core::utils::identifiers::short_type_name;
use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader, Cursor, Write};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Raised when an explicit name replaces a different name already recorded
/// on the structure. Construction continues with the explicit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflictWarning {
    pub previous: String,
    pub name: String,
}

impl fmt::Display for NameConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LigandMolecule being renamed from {} to {}",
            self.previous, self.name
        )
    }
}

/// A small molecule with a content-derived identity.
///
/// The wrapped structure is owned and never changes after construction. Two
/// ligands are equal, hash alike, and sort together exactly when their
/// canonical SMILES and resolved names agree, no matter how they were built.
#[derive(Debug, Clone)]
pub struct LigandMolecule {
    molecule: Molecule,
    hash: LigandHash,
}

impl LigandMolecule {
    /// Wraps `molecule` using the default identity tags.
    ///
    /// An empty `name` falls back to the name tag, then to the title line.
    pub fn new(molecule: Molecule, name: &str) -> Self {
        Self::construct(molecule, name, &IdentityConfig::default())
    }

    /// Like [`LigandMolecule::new`], but leaves the caller's molecule untouched.
    pub fn from_molecule(molecule: &Molecule, name: &str) -> Self {
        Self::new(molecule.clone(), name)
    }

    pub fn builder(molecule: Molecule) -> LigandMoleculeBuilder {
        LigandMoleculeBuilder::new(molecule)
    }

    fn construct(mut molecule: Molecule, name: &str, config: &IdentityConfig) -> Self {
        let name = resolve_name(&molecule, name, config);
        let properties = molecule.properties_mut();
        properties.set(&config.name_tag, &name);
        properties.set(&config.version_tag, &config.version);

        let smiles = canonical_smiles(&molecule);
        debug!(name = %name, smiles = %smiles, "Constructed ligand");
        Self {
            hash: LigandHash::new(&smiles, &name),
            molecule,
        }
    }

    pub fn smiles(&self) -> &str {
        self.hash.smiles()
    }

    pub fn name(&self) -> &str {
        self.hash.name()
    }

    pub fn content_hash(&self) -> &LigandHash {
        &self.hash
    }

    pub fn atom_count(&self) -> usize {
        self.molecule.atom_count()
    }

    /// An independent copy of the wrapped structure, tags included.
    pub fn to_molecule(&self) -> Molecule {
        self.molecule.clone()
    }

    /// Converts to the force-field representation. Undefined stereocentres
    /// are tolerated and the ligand's name is carried over.
    pub fn to_force_field(&self) -> Result<ForceFieldMolecule, LigandError> {
        let mut ff = ForceFieldMolecule::from_molecule(&self.molecule, true)?;
        ff.name = self.name().to_string();
        Ok(ff)
    }

    /// Converts to any toolkit type that can be built from the force-field
    /// representation.
    pub fn to_alternate<T>(&self) -> Result<T, LigandError>
    where
        T: TryFrom<ForceFieldMolecule>,
        T::Error: std::error::Error + Send + Sync + 'static,
    {
        T::try_from(self.to_force_field()?).map_err(|e| LigandError::Toolkit(Box::new(e)))
    }

    pub fn from_force_field(_molecule: &ForceFieldMolecule, _name: &str) -> Result<Self, LigandError> {
        Err(LigandError::UnsupportedConversion {
            representation: "ForceFieldMolecule",
        })
    }

    pub fn from_alternate<T>(_molecule: &T, _name: &str) -> Result<Self, LigandError> {
        Err(LigandError::UnsupportedConversion {
            representation: short_type_name::<T>(),
        })
    }

    /// Serializes to a single SDF record: the connection table, one data item
    /// per property tag, and the `$$$$` delimiter.
    pub fn to_sdf(&self) -> Result<String, LigandError> {
        sdf::render_record(&self.molecule).map_err(LigandError::Serialization)
    }

    pub fn write_sdf(&self, writer: &mut impl Write) -> Result<(), LigandError> {
        sdf::write_record(&self.molecule, writer).map_err(|e| match e {
            SdfError::Io(io) => LigandError::Io(io),
            other => LigandError::Serialization(other),
        })
    }

    pub fn from_sdf_str(text: &str) -> Result<Self, LigandError> {
        Self::from_sdf_str_with_config(text, &IdentityConfig::default())
    }

    pub fn from_sdf_str_with_config(text: &str, config: &IdentityConfig) -> Result<Self, LigandError> {
        Self::from_sdf_reader_with_config(Cursor::new(text), config)
    }

    pub fn from_sdf_file<P: AsRef<Path>>(path: P) -> Result<Self, LigandError> {
        Self::from_sdf_file_with_config(path, &IdentityConfig::default())
    }

    #[instrument(skip_all, name = "ligand_from_sdf_file", fields(path = %path.as_ref().display()))]
    pub fn from_sdf_file_with_config<P: AsRef<Path>>(
        path: P,
        config: &IdentityConfig,
    ) -> Result<Self, LigandError> {
        let file = File::open(path.as_ref())?;
        Self::from_sdf_reader_with_config(BufReader::new(file), config)
    }

    pub fn from_sdf_reader(reader: impl BufRead) -> Result<Self, LigandError> {
        Self::from_sdf_reader_with_config(reader, &IdentityConfig::default())
    }

    /// Reads exactly one ligand from an SDF stream.
    ///
    /// # Errors
    ///
    /// A stream with no records, or whose first record does not parse, gives
    /// [`LigandError::MalformedInput`]. A second record, even an unreadable
    /// one, gives [`LigandError::Multiplicity`]; reading stops there, so the
    /// reported count is a lower bound.
    pub fn from_sdf_reader_with_config(
        reader: impl BufRead,
        config: &IdentityConfig,
    ) -> Result<Self, LigandError> {
        config.validate()?;
        let mut records = SdfReader::new(reader);
        let molecule = match records.next() {
            None => {
                return Err(LigandError::MalformedInput {
                    reason: "no molecule found".to_string(),
                    source: None,
                });
            }
            Some(Err(SdfError::Io(e))) => return Err(LigandError::Io(e)),
            Some(Err(e)) => {
                return Err(LigandError::MalformedInput {
                    reason: "first record could not be parsed".to_string(),
                    source: Some(e),
                });
            }
            Some(Ok(molecule)) => molecule,
        };

        if records.skip_record()? {
            return Err(LigandError::Multiplicity { count: 2 });
        }
        Ok(Self::construct(molecule, "", config))
    }
}

/// Explicit name first, then the name tag (even when empty), then the title.
fn resolve_name(molecule: &Molecule, name: &str, config: &IdentityConfig) -> String {
    let recorded = molecule
        .properties()
        .get(&config.name_tag)
        .unwrap_or(molecule.title());
    if name.is_empty() {
        return recorded.to_string();
    }
    if !recorded.is_empty() && recorded != name {
        let warning = NameConflictWarning {
            previous: recorded.to_string(),
            name: name.to_string(),
        };
        warn!("{}", warning);
    }
    name.to_string()
}

impl PartialEq for LigandMolecule {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for LigandMolecule {}

impl Hash for LigandMolecule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl PartialOrd for LigandMolecule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LigandMolecule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl fmt::Display for LigandMolecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name().is_empty() {
            write!(f, "LigandMolecule({})", self.smiles())
        } else {
            write!(f, "LigandMolecule({}, {})", self.name(), self.smiles())
        }
    }
}

pub struct LigandMoleculeBuilder {
    molecule: Molecule,
    name: String,
    config: Option<IdentityConfig>,
}

impl LigandMoleculeBuilder {
    pub fn new(molecule: Molecule) -> Self {
        Self {
            molecule,
            name: String::new(),
            config: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn config(mut self, config: IdentityConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<LigandMolecule, LigandError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(LigandMolecule::construct(self.molecule, &self.name, &config))
    }
}
