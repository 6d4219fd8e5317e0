//! The bounded, fitness-sorted, unique collection of candidate sequences,
//! and the shared handle the coordinator and the parent sampler both hold
//! onto it.
//!
//! The pool's member list and its uniqueness set must always move together:
//! a single solver has exactly one coordinator thread writing to the pool,
//! so two separately-locked structures would buy nothing but the chance to
//! update one and forget the other in exactly the call that needs both.
//! Collapsing pool, uniqueness set, and the sequence arena behind one mutex
//! makes "locked together" the only possible way to use them and removes
//! that hazard entirely.
//!
//! Each live member is tracked alongside the [`SequenceId`] it was recorded
//! under in the arena, so a sample drawn for a strategy to use as a parent
//! carries the id the resulting child's `Provenance::Strategy::parent`
//! should point at.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::comparator::Comparator;
use crate::domain::{Arena, SequenceId};
use crate::error::{SolverError, SolverResult};
use crate::sequence::Sequence;

/// The pool's capacity bound: `max(|geneSet|, 3 * numberOfChromosomes * L)`.
pub fn max_pool_size(gene_set_len: usize, chromosome_count: usize, length: usize) -> usize {
    gene_set_len.max(3 * chromosome_count * length)
}

/// A pool member together with the arena id it was stored under.
#[derive(Clone, Debug)]
pub struct Member {
    pub id: SequenceId,
    pub sequence: Sequence,
}

/// The pool's live state: a best-first sorted member list, its uniqueness
/// set, and the append-only arena every admitted sequence is also recorded
/// into (so parent back-references outlive eviction from `members`).
pub struct PoolState {
    members: Vec<Member>,
    distinct: HashSet<String>,
    arena: Arena<Sequence>,
    capacity: usize,
    comparator: Comparator,
}

impl PoolState {
    fn new(capacity: usize, comparator: Comparator) -> Self {
        PoolState {
            members: Vec::new(),
            distinct: HashSet::new(),
            arena: Arena::new(),
            capacity,
            comparator,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, genes: &str) -> bool {
        self.distinct.contains(genes)
    }

    pub fn best(&self) -> &Member {
        &self.members[0]
    }

    pub fn weakest(&self) -> &Member {
        &self.members[self.members.len() - 1]
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn arena(&self) -> &Arena<Sequence> {
        &self.arena
    }

    /// Unconditionally inserts `candidate`, recording it in the arena and
    /// the uniqueness set, then re-sorts by walking the new entry left while
    /// it compares same-or-better than its neighbor: O(pool size) worst
    /// case, O(1) expected when the candidate lands near the bottom.
    fn insert_sorted(&mut self, candidate: Sequence) -> SequenceId {
        self.distinct.insert(candidate.genes().to_string());
        let id = self.arena.add(candidate.clone());
        self.members.push(Member {
            id,
            sequence: candidate,
        });
        self.sift_up_from(self.members.len() - 1);
        id
    }

    /// Overwrites the current weakest slot with `candidate` and re-sorts.
    fn replace_weakest(&mut self, candidate: Sequence) -> SequenceId {
        let last = self.members.len() - 1;
        self.distinct.remove(self.members[last].sequence.genes());
        self.distinct.insert(candidate.genes().to_string());
        let id = self.arena.add(candidate.clone());
        self.members[last] = Member {
            id,
            sequence: candidate,
        };
        self.sift_up_from(last);
        id
    }

    fn sift_up_from(&mut self, mut i: usize) {
        while i > 0
            && self.comparator.is_same_or_better(
                self.members[i].sequence.fitness(),
                self.members[i - 1].sequence.fitness(),
            )
        {
            self.members.swap(i, i - 1);
            i -= 1;
        }
    }

    /// Admission rule:
    ///   1. reject if genes already present;
    ///   2. reject if worse than the weakest entry;
    ///   3. a tie with the weakest entry is appended while there is room,
    ///      otherwise it overwrites the weakest slot — neither counts as an
    ///      improvement;
    ///   4. otherwise it overwrites the weakest slot and is re-sorted.
    pub fn admit(&mut self, candidate: Sequence) -> bool {
        if self.distinct.contains(candidate.genes()) {
            return false;
        }
        if self.is_empty() {
            self.insert_sorted(candidate);
            return true;
        }
        let weakest_fitness = self.weakest().sequence.fitness();
        if !self
            .comparator
            .is_same_or_better(candidate.fitness(), weakest_fitness)
        {
            return false;
        }
        if self.members.len() < self.capacity {
            self.insert_sorted(candidate);
        } else {
            self.replace_weakest(candidate);
        }
        true
    }

    /// Overwrites the weakest slot with `candidate` regardless of the
    /// ordinary admission predicate — used by the coordinator once it has
    /// already decided `candidate` is a strict improvement, and by
    /// hill-climbing's pool swap.
    pub fn force_replace_weakest(&mut self, candidate: Sequence) -> SequenceId {
        if self.members.len() < self.capacity {
            self.insert_sorted(candidate)
        } else {
            self.replace_weakest(candidate)
        }
    }

    /// Replaces the entire live member set with `sequences`, rebuilding the
    /// uniqueness set and re-sorting; used by challenger-pool promotion and
    /// by hill-climbing's end-of-stage pool swap. Each sequence is recorded
    /// fresh into the arena so its `Member::id` stays valid going forward.
    pub fn replace_all(&mut self, sequences: Vec<Sequence>) {
        self.distinct = sequences.iter().map(|s| s.genes().to_string()).collect();
        self.members = sequences
            .into_iter()
            .map(|sequence| {
                let id = self.arena.add(sequence.clone());
                Member { id, sequence }
            })
            .collect();
        self.members.sort_by(|a, b| {
            self.comparator
                .rank(a.sequence.fitness(), b.sequence.fitness())
        });
        if self.members.len() > self.capacity {
            self.members.truncate(self.capacity);
        }
    }
}

/// A cloneable handle shared between the coordinator (sole writer) and the
/// parent sampler (reader). Shared mutable state is restricted to the pool
/// and its uniqueness set; bundling them with the arena behind one mutex
/// keeps that restriction structurally true rather than convention.
#[derive(Clone)]
pub struct SharedPool(Arc<Mutex<PoolState>>);

impl SharedPool {
    pub fn new(capacity: usize, comparator: Comparator) -> Self {
        SharedPool(Arc::new(Mutex::new(PoolState::new(capacity, comparator))))
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut PoolState) -> R) -> R {
        let mut state = self.0.lock().unwrap();
        f(&mut state)
    }

    pub fn len(&self) -> usize {
        self.with_state(|s| s.len())
    }

    pub fn best(&self) -> Member {
        self.with_state(|s| s.best().clone())
    }

    pub fn contains(&self, genes: &str) -> bool {
        self.with_state(|s| s.contains(genes))
    }

    pub fn admit(&self, candidate: Sequence) -> bool {
        self.with_state(|s| s.admit(candidate))
    }

    pub fn snapshot(&self) -> Vec<Member> {
        self.with_state(|s| s.members().to_vec())
    }

    /// Populates the pool from a mix of the initial parent, random
    /// full-length sequences drawn chromosome-at-a-time from `chromosome_source`,
    /// and single-gene-substituted variants of the initial parent, stopping
    /// once full or once the uniqueness set blocks further additions after
    /// `max_attempts` tries. Returns
    /// [`SolverError::InitialSeedingExhausted`] if not even the initial
    /// parent could be admitted.
    pub fn seed(
        &self,
        initial_parent: Sequence,
        gene_set: &[String],
        chromosome_count: usize,
        random: &crate::domain::Random,
        mut chromosome_source: impl FnMut() -> String,
        mut fitness: impl FnMut(&str) -> i64,
        max_attempts: usize,
    ) -> SolverResult<()> {
        let admitted_initial = self.admit(initial_parent.clone());
        if !admitted_initial && self.len() == 0 {
            return Err(SolverError::seeding_exhausted(
                "initial parent could not be admitted and pool is empty",
            ));
        }

        let capacity = self.with_state(|s| s.capacity());
        let mut attempts = 0usize;
        while self.len() < capacity && attempts < max_attempts {
            attempts += 1;
            let variant = if random.bool(0.5) {
                (0..chromosome_count)
                    .map(|_| chromosome_source())
                    .collect::<String>()
            } else {
                single_gene_substitution(initial_parent.genes(), gene_set, random)
            };
            if self.contains(&variant) {
                continue;
            }
            let score = fitness(&variant);
            self.admit(Sequence::seeded(variant, score));
        }

        if self.len() == 0 {
            return Err(SolverError::seeding_exhausted(
                "pool remained empty after bounded seeding attempts",
            ));
        }
        Ok(())
    }
}

fn single_gene_substitution(genes: &str, gene_set: &[String], random: &crate::domain::Random) -> String {
    let mut chars: Vec<char> = genes.chars().collect();
    if chars.is_empty() {
        return genes.to_string();
    }
    let position = random.draw(chars.len());
    let replacement = random.choose(gene_set);
    if let Some(ch) = replacement.chars().next() {
        chars[position] = ch;
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Random;

    fn pool(capacity: usize) -> SharedPool {
        SharedPool::new(capacity, Comparator::HigherIsBetter)
    }

    #[test]
    fn admit_rejects_duplicate_genes() {
        let p = pool(3);
        assert!(p.admit(Sequence::seeded("aaa", 1)));
        assert!(!p.admit(Sequence::seeded("aaa", 5)));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn admit_fills_then_replaces_weakest() {
        let p = pool(2);
        assert!(p.admit(Sequence::seeded("aaa", 1)));
        assert!(p.admit(Sequence::seeded("bbb", 2)));
        assert!(p.admit(Sequence::seeded("ccc", 3)));
        assert_eq!(p.len(), 2);
        let snap = p.snapshot();
        assert_eq!(snap[0].sequence.genes(), "ccc");
        assert_eq!(snap[1].sequence.genes(), "bbb");
    }

    #[test]
    fn admit_rejects_worse_than_weakest_when_full() {
        let p = pool(2);
        p.admit(Sequence::seeded("aaa", 5));
        p.admit(Sequence::seeded("bbb", 4));
        assert!(!p.admit(Sequence::seeded("ccc", 1)));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn admit_tie_with_weakest_appends_when_room() {
        let p = pool(3);
        p.admit(Sequence::seeded("aaa", 5));
        p.admit(Sequence::seeded("bbb", 4));
        assert!(p.admit(Sequence::seeded("ccc", 4)));
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn distinct_member_ids_survive_replace_weakest() {
        let p = pool(2);
        p.admit(Sequence::seeded("aaa", 1));
        p.admit(Sequence::seeded("bbb", 2));
        p.admit(Sequence::seeded("ccc", 3));
        let snap = p.snapshot();
        assert_ne!(snap[0].id, snap[1].id);
    }

    #[test]
    fn sorted_best_first_under_lower_is_better() {
        let p = SharedPool::new(3, Comparator::LowerIsBetter);
        p.admit(Sequence::seeded("aaa", 5));
        p.admit(Sequence::seeded("bbb", 1));
        p.admit(Sequence::seeded("ccc", 3));
        let snap = p.snapshot();
        assert_eq!(snap[0].sequence.genes(), "bbb");
        assert_eq!(snap[1].sequence.genes(), "ccc");
        assert_eq!(snap[2].sequence.genes(), "aaa");
    }

    #[test]
    fn seed_admits_initial_parent_even_with_pathological_gene_set() {
        let p = pool(3);
        let gene_set = vec!["a".to_string()];
        let random = Random::new(1);
        let result = p.seed(
            Sequence::seeded("aaa", 0),
            &gene_set,
            1,
            &random,
            || "a".to_string(),
            |_| 0,
            10,
        );
        assert!(result.is_ok());
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn replace_all_rebuilds_uniqueness_and_truncates_to_capacity() {
        let p = pool(2);
        p.with_state(|s| {
            s.replace_all(vec![
                Sequence::seeded("aaa", 3),
                Sequence::seeded("bbb", 1),
                Sequence::seeded("ccc", 2),
            ]);
        });
        assert_eq!(p.len(), 2);
        assert!(p.contains("aaa"));
        assert!(p.contains("ccc"));
        assert!(!p.contains("bbb"));
    }

    #[test]
    fn max_pool_size_uses_the_larger_bound() {
        assert_eq!(max_pool_size(26, 1, 3), 26);
        assert_eq!(max_pool_size(2, 2, 5), 30);
    }
}
