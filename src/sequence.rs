//! The immutable unit the whole search moves: a gene-string together with
//! its cached fitness and the provenance that produced it.

use crate::domain::SequenceId;

/// How a [`Sequence`] came to exist. `Seeded` covers every pool-initialization
/// entry (the caller's initial parent, random fill, and single-gene variants
/// of the initial parent all share this provenance — they aren't
/// distinguished past pool-seeding). `Strategy` names the operator and links
/// back to the parent it was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    Seeded,
    Strategy {
        strategy: StrategyId,
        parent: SequenceId,
    },
}

impl Provenance {
    pub fn parent(&self) -> Option<SequenceId> {
        match self {
            Provenance::Seeded => None,
            Provenance::Strategy { parent, .. } => Some(*parent),
        }
    }

    pub fn strategy(&self) -> Option<StrategyId> {
        match self {
            Provenance::Seeded => None,
            Provenance::Strategy { strategy, .. } => Some(*strategy),
        }
    }
}

/// A strategy's position in the solver's strategy list, also its identity
/// for success-count bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrategyId(pub usize);

/// An immutable candidate: a gene-string, its fitness once known, and how it
/// was produced. Equality and the uniqueness set both key on `genes` alone —
/// two sequences with identical genes are the same entry even if one
/// happens to carry a different cached fitness.
#[derive(Clone, Debug)]
pub struct Sequence {
    genes: String,
    fitness: i64,
    provenance: Provenance,
}

impl Sequence {
    pub fn new(genes: impl Into<String>, fitness: i64, provenance: Provenance) -> Self {
        Sequence {
            genes: genes.into(),
            fitness,
            provenance,
        }
    }

    pub fn seeded(genes: impl Into<String>, fitness: i64) -> Self {
        Sequence::new(genes, fitness, Provenance::Seeded)
    }

    pub fn genes(&self) -> &str {
        &self.genes
    }

    pub fn fitness(&self) -> i64 {
        self.fitness
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn parent(&self) -> Option<SequenceId> {
        self.provenance.parent()
    }

    pub fn strategy(&self) -> Option<StrategyId> {
        self.provenance.strategy()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl Eq for Sequence {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_fitness_and_provenance() {
        let a = Sequence::seeded("abc", 1);
        let b = Sequence::seeded("abc", 99);
        assert_eq!(a, b);
    }

    #[test]
    fn inequality_on_different_genes() {
        let a = Sequence::seeded("abc", 1);
        let b = Sequence::seeded("abd", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_has_no_parent_or_strategy() {
        let s = Sequence::seeded("abc", 1);
        assert_eq!(s.parent(), None);
        assert_eq!(s.strategy(), None);
    }

    #[test]
    fn strategy_provenance_carries_parent_and_strategy() {
        let mut arena = crate::domain::Arena::new();
        let parent_id = arena.add(Sequence::seeded("abc", 1));
        let child = Sequence::new(
            "abd",
            2,
            Provenance::Strategy {
                strategy: StrategyId(0),
                parent: parent_id,
            },
        );
        assert_eq!(child.parent(), Some(parent_id));
        assert_eq!(child.strategy(), Some(StrategyId(0)));
    }
}
