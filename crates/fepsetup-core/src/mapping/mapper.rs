use super::atom_mapping::{AtomMapping, LigandAtomMapping};
use super::error::{self, MappingError};
use crate::ligand::LigandMolecule;
use std::iter::FusedIterator;
use tracing::debug;

/// Lazily produced candidate mappings, as yielded by a strategy.
pub type MappingStream<'a> = Box<dyn Iterator<Item = Result<AtomMapping, MappingError>> + 'a>;

/// A strategy that proposes atom mappings between two molecules.
///
/// Implementors supply [`mappings_generator`](AtomMapper::mappings_generator);
/// callers go through [`suggest_mappings`](AtomMapper::suggest_mappings),
/// which defers to the generator on first use and stops after the first
/// error. `M` is the molecule handle the strategy works on.
pub trait AtomMapper<M: ?Sized = LigandMolecule> {
    /// Produces candidate mappings from `mol1` to `mol2`, best first.
    fn mappings_generator<'a>(&'a self, mol1: &'a M, mol2: &'a M) -> MappingStream<'a>;

    fn suggest_mappings<'a>(&'a self, mol1: &'a M, mol2: &'a M) -> Suggestions<'a> {
        Suggestions::new(move || self.mappings_generator(mol1, mol2))
    }
}

/// Wraps each suggested mapping together with the two ligands it relates.
///
/// Mappings that reference atoms outside either ligand are reported as
/// [`MappingError::AtomOutOfRange`] and end the sequence.
pub fn suggest_ligand_mappings<'a, A>(
    mapper: &'a A,
    mol1: &'a LigandMolecule,
    mol2: &'a LigandMolecule,
) -> impl Iterator<Item = Result<LigandAtomMapping, MappingError>> + 'a
where
    A: AtomMapper<LigandMolecule> + ?Sized,
{
    let mut failed = false;
    mapper.suggest_mappings(mol1, mol2).map_while(move |result| {
        if failed {
            return None;
        }
        let wrapped = result
            .and_then(|mapping| LigandAtomMapping::new(mol1.clone(), mol2.clone(), mapping));
        failed = wrapped.is_err();
        Some(wrapped)
    })
}

/// Where a [`Suggestions`] sequence is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPhase {
    /// Nothing has been requested yet and the generator has not been called.
    Pending,
    /// The generator has been called and is being drained.
    Delegated,
    /// The generator was exhausted or reported an error.
    Finished,
}

enum State<'a> {
    Pending(Box<dyn FnOnce() -> MappingStream<'a> + 'a>),
    Delegated(MappingStream<'a>),
    Finished,
}

/// One pass over a strategy's suggestions. Cannot be restarted.
pub struct Suggestions<'a> {
    state: State<'a>,
}

impl<'a> Suggestions<'a> {
    fn new(start: impl FnOnce() -> MappingStream<'a> + 'a) -> Self {
        Self {
            state: State::Pending(Box::new(start)),
        }
    }

    pub fn phase(&self) -> SuggestionPhase {
        match self.state {
            State::Pending(_) => SuggestionPhase::Pending,
            State::Delegated(_) => SuggestionPhase::Delegated,
            State::Finished => SuggestionPhase::Finished,
        }
    }
}

impl Iterator for Suggestions<'_> {
    type Item = Result<AtomMapping, MappingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let State::Pending(_) = self.state {
            if let State::Pending(start) = std::mem::replace(&mut self.state, State::Finished) {
                debug!("Delegating to mappings generator");
                self.state = State::Delegated(start());
            }
        }
        let State::Delegated(stream) = &mut self.state else {
            return None;
        };
        match stream.next() {
            Some(Ok(mapping)) => Some(Ok(mapping)),
            Some(Err(e)) => {
                debug!(error = %e, "Mappings generator failed");
                self.state = State::Finished;
                Some(Err(e))
            }
            None => {
                self.state = State::Finished;
                None
            }
        }
    }
}

impl FusedIterator for Suggestions<'_> {}

/// Base mapper with no generation step of its own.
///
/// Every call to [`suggest_mappings`](AtomMapper::suggest_mappings) yields a
/// single [`MappingError::AbstractMethod`] naming this type.
#[derive(Debug, Clone, Copy, Default)]
pub struct LigandAtomMapper;

impl<M: ?Sized> AtomMapper<M> for LigandAtomMapper {
    fn mappings_generator<'a>(&'a self, _mol1: &'a M, _mol2: &'a M) -> MappingStream<'a> {
        Box::new(std::iter::once(Err(error::abstract_method::<Self>(
            "mappings_generator",
        ))))
    }
}
