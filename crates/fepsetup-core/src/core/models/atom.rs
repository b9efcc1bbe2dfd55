use super::element::Element;
use nalgebra::Point3;

/// Represents an atom in a ligand with its identity and coordinates.
///
/// Only intrinsic, file-level properties live here. Derived quantities such as
/// implicit hydrogen counts or aromaticity depend on the surrounding bonds and
/// are computed by [`Molecule`](super::molecule::Molecule).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// The coordinates of the atom in Angstroms. 2D structures keep `z == 0`.
    pub position: Point3<f64>,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
    /// The mass number; `0` means natural isotopic abundance.
    pub isotope: u16,
    /// The number of unpaired electrons.
    pub radical_electrons: u8,
}

impl Atom {
    /// Creates a neutral, natural-abundance atom at the given position.
    ///
    /// # Arguments
    ///
    /// * `element` - The chemical element of the atom.
    /// * `position` - The coordinates of the atom.
    pub fn new(element: Element, position: Point3<f64>) -> Self {
        Self {
            element,
            position,
            formal_charge: 0,
            isotope: 0,
            radical_electrons: 0,
        }
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn with_isotope(mut self, isotope: u16) -> Self {
        self.isotope = isotope;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_is_neutral_and_natural_abundance() {
        let atom = Atom::new(Element::CARBON, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.element, Element::CARBON);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.formal_charge, 0);
        assert_eq!(atom.isotope, 0);
        assert_eq!(atom.radical_electrons, 0);
    }

    #[test]
    fn builder_style_setters_override_defaults() {
        let atom = Atom::new(Element::OXYGEN, Point3::origin())
            .with_charge(-1)
            .with_isotope(18);

        assert_eq!(atom.formal_charge, -1);
        assert_eq!(atom.isotope, 18);
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let atom1 = Atom::new(Element::NITROGEN, Point3::new(0.5, 0.0, -0.5)).with_charge(1);
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
