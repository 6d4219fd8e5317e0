//! Direction of improvement for a fitness score, and the handful of
//! comparisons the coordinator needs that depend on it.

use std::cmp::Ordering;

/// Whether a lower or higher fitness value represents a better sequence.
/// The solver is configured with exactly one of these for its lifetime;
/// every comparison in the pool, the coordinator, and the diagnostic
/// summary routes through it rather than assuming a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparator {
    LowerIsBetter,
    HigherIsBetter,
}

impl Comparator {
    /// Orders two fitness values so that `Ordering::Less` means `a` is
    /// better than `b`, regardless of direction. This is the ordering the
    /// pool keeps its members sorted by.
    pub fn rank(&self, a: i64, b: i64) -> Ordering {
        match self {
            Comparator::LowerIsBetter => a.cmp(&b),
            Comparator::HigherIsBetter => b.cmp(&a),
        }
    }

    /// True if `candidate` is strictly better than `incumbent`.
    pub fn is_better(&self, candidate: i64, incumbent: i64) -> bool {
        self.rank(candidate, incumbent) == Ordering::Less
    }

    /// True if `candidate` is strictly better than, or exactly ties,
    /// `incumbent` — the admission rule's "same-or-better" predicate.
    pub fn is_same_or_better(&self, candidate: i64, incumbent: i64) -> bool {
        self.rank(candidate, incumbent) != Ordering::Greater
    }

    /// True if `fitness` has reached or surpassed `target`, used to decide
    /// whether the search can stop early on `bestPossibleFitness`.
    pub fn has_reached(&self, fitness: i64, target: i64) -> bool {
        match self {
            Comparator::LowerIsBetter => fitness <= target,
            Comparator::HigherIsBetter => fitness >= target,
        }
    }
}
