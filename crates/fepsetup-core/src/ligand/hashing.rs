use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Content identity of a ligand: its canonical SMILES and resolved name.
///
/// Equality, ordering, and hashing consider only these two strings. The
/// SHA-256 `digest` is derived from them and gives a fixed-width key that is
/// stable across processes and platforms, unlike `std::hash::Hash` output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LigandHash {
    smiles: String,
    name: String,
    digest: String,
}

impl LigandHash {
    pub fn new(smiles: &str, name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(smiles.as_bytes());
        hasher.update([0u8]);
        hasher.update(name.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Self {
            smiles: smiles.to_string(),
            name: name.to_string(),
            digest,
        }
    }

    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase hex SHA-256 of the SMILES and name, separated by a NUL byte.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for LigandHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.digest[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_reference_value() {
        // sha256 of "CCO\0ethanol"
        let hash = LigandHash::new("CCO", "ethanol");
        assert_eq!(
            hash.digest(),
            "c0c0a2b1669f2c9921db30b2d8f427820fc6220b1bc776c6a966bdc8c6116560"
        );
        assert_eq!(hash, LigandHash::new("CCO", "ethanol"));
    }

    #[test]
    fn digest_is_lowercase_hex_of_full_width() {
        // sha256 of "O\0" starts with a zero nibble
        let digest = LigandHash::new("O", "").digest().to_string();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert!(digest.starts_with("09d8a554"));
    }

    #[test]
    fn separator_keeps_fields_apart() {
        assert_ne!(
            LigandHash::new("CC", "Oethanol").digest(),
            LigandHash::new("CCO", "ethanol").digest()
        );
    }

    #[test]
    fn name_participates_in_identity() {
        assert_ne!(LigandHash::new("CCO", ""), LigandHash::new("CCO", "ethanol"));
    }

    #[test]
    fn display_shows_digest_prefix() {
        let hash = LigandHash::new("c1ccccc1", "benzene");
        assert_eq!(hash.to_string(), hash.digest()[..12]);
    }

    #[test]
    fn serializes_all_fields() {
        let value = toml::Value::try_from(LigandHash::new("CCO", "ethanol")).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table["smiles"].as_str(), Some("CCO"));
        assert_eq!(table["name"].as_str(), Some("ethanol"));
        assert_eq!(table["digest"].as_str().map(str::len), Some(64));
    }
}
