//! Single-gene substitution: takes one parent and replaces one randomly
//! chosen position with a fresh symbol.

use std::sync::mpsc::Receiver;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::Random;
use crate::parent_sampler::ParentSampler;
use crate::sequence::StrategyId;
use crate::strategy::{Propose, Proposal};

const SAMPLE_POLL: Duration = Duration::from_millis(1);

pub struct Substitution {
    gene_set: Vec<String>,
}

impl Substitution {
    pub fn new(gene_set: Vec<String>) -> Self {
        Substitution { gene_set }
    }
}

impl Propose for Substitution {
    fn name(&self) -> &'static str {
        "substitution"
    }

    fn propose(
        &self,
        sampler: &ParentSampler,
        _chromosome_receiver: &Mutex<Receiver<String>>,
        random: &Random,
    ) -> Option<Proposal> {
        let parent = sampler.sample(SAMPLE_POLL)?;
        let mut chars: Vec<char> = parent.sequence.genes().chars().collect();
        if chars.is_empty() {
            return None;
        }
        let position = random.draw(chars.len());
        if let Some(replacement) = random.choose(&self.gene_set).chars().next() {
            chars[position] = replacement;
        }
        Some(Proposal {
            genes: chars.into_iter().collect(),
            parent: parent.id,
            strategy: StrategyId(0),
        })
    }
}
