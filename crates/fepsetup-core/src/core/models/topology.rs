use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
    Aromatic = 4,
}

impl BondOrder {
    /// Parses the molfile bond type code (1-4).
    pub fn from_molfile_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            4 => Some(Self::Aromatic),
            _ => None,
        }
    }

    pub fn molfile_code(self) -> u8 {
        self as u8
    }

    /// Bond order in half-bond units, so aromatic bonds count as 3.
    pub fn half_units(self) -> u8 {
        match self {
            Self::Single => 2,
            Self::Double => 4,
            Self::Triple => 6,
            Self::Aromatic => 3,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "4" | "ar" | "aromatic" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

/// Wedge annotation of a bond as drawn from its first atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    Wedge,  // molfile code 1, second atom above the plane
    Hash,   // molfile code 6, second atom below the plane
    Either, // molfile code 4 (single) or 3 (double)
}

impl BondStereo {
    pub fn from_molfile_code(code: u8) -> Self {
        match code {
            1 => Self::Wedge,
            6 => Self::Hash,
            3 | 4 => Self::Either,
            _ => Self::None,
        }
    }

    pub fn molfile_code(self, order: BondOrder) -> u8 {
        match (self, order) {
            (Self::None, _) => 0,
            (Self::Wedge, _) => 1,
            (Self::Hash, _) => 6,
            (Self::Either, BondOrder::Double) => 3,
            (Self::Either, _) => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,      // Index of the first atom
    pub atom2: usize,      // Index of the second atom
    pub order: BondOrder,  // Bond order (e.g., single, double, etc.)
    pub stereo: BondStereo, // Wedge annotation, relative to atom1
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
            stereo: BondStereo::None,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// Returns the partner of `atom` in this bond, if `atom` is an endpoint.
    pub fn other(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }
}
