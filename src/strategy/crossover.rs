//! Two-parent crossover: combines two parents by splicing a random prefix
//! of one with the remaining suffix of the other.

use std::sync::mpsc::Receiver;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::Random;
use crate::parent_sampler::ParentSampler;
use crate::sequence::StrategyId;
use crate::strategy::{Propose, Proposal};

const SAMPLE_POLL: Duration = Duration::from_millis(1);

pub struct Crossover;

impl Propose for Crossover {
    fn name(&self) -> &'static str {
        "crossover"
    }

    fn propose(
        &self,
        sampler: &ParentSampler,
        _chromosome_receiver: &Mutex<Receiver<String>>,
        random: &Random,
    ) -> Option<Proposal> {
        let first = sampler.sample(SAMPLE_POLL)?;
        let second = sampler.sample(SAMPLE_POLL)?;

        let first_genes: Vec<char> = first.sequence.genes().chars().collect();
        let second_genes: Vec<char> = second.sequence.genes().chars().collect();
        let length = first_genes.len().min(second_genes.len());
        if length == 0 {
            return Some(Proposal {
                genes: first.sequence.genes().to_string(),
                parent: first.id,
                strategy: StrategyId(0),
            });
        }
        let split = random.draw(length);
        let mut genes: String = first_genes[..split].iter().collect();
        genes.extend(&second_genes[split..]);

        Some(Proposal {
            genes,
            parent: first.id,
            strategy: StrategyId(0),
        })
    }
}
