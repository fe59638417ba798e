//! Tiered points for a candidate run, compared against an optional reference run.
//!
//! Tiers are gated in order, each one requiring the previous:
//!
//! | Tier | Requirement |
//! |---|---|
//! | [`Tier::Basic`] | no failure, goal reached, outcome beats or ties the reference |
//! | [`Tier::Intermediate`] | memory under the configured threshold (1MB by default) |
//! | [`Tier::Advanced`] | time beats or ties the reference |
//! | [`Tier::Challenge`] | memory beats or ties the reference |
//!
//! Without a reference every comparison with it holds. The final point is `1 + tiers reached`.

use crate::performance::Performance;

/// Scoring gate reached by a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Valid solution reaching the goal, at least as short as the reference's.
    Basic,
    /// Basic, within the memory threshold.
    Intermediate,
    /// Intermediate, at least as fast as the reference.
    Advanced,
    /// Advanced, using no more memory than the reference.
    Challenge,
}

impl Tier {
    /// Points given when this is the highest tier reached.
    pub fn points(self) -> u8 {
        self as u8 + 2
    }
}

/// Turns run measurements into points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    intermediate_memory_mb: f64,
}

impl Scorer {
    /// Scorer allowing `intermediate_memory_mb` megabytes for the intermediate tier.
    pub fn new(intermediate_memory_mb: f64) -> Scorer {
        Scorer {
            intermediate_memory_mb,
        }
    }

    /// Highest tier `candidate` reaches, `None` if not even [`Tier::Basic`].
    pub fn highest_tier(
        &self,
        candidate: &Performance,
        reference: Option<&Performance>,
    ) -> Option<Tier> {
        let beats_outcome =
            reference.map_or(true, |r| beats_outcome(r.outcome, candidate.outcome));
        let beats_time = reference.map_or(true, |r| r.time >= candidate.time);
        let beats_memory = reference.map_or(true, |r| r.memory >= candidate.memory);

        let basic = candidate.failure.is_none() && candidate.point > 1 && beats_outcome;
        let intermediate = basic && candidate.memory <= self.intermediate_memory_mb;
        let advanced = intermediate && beats_time;
        let challenge = advanced && beats_memory;

        [
            (challenge, Tier::Challenge),
            (advanced, Tier::Advanced),
            (intermediate, Tier::Intermediate),
            (basic, Tier::Basic),
        ]
        .into_iter()
        .find_map(|(reached, tier)| reached.then_some(tier))
    }

    /// Final record: `candidate`'s measurements with the tiered point.
    pub fn score(&self, candidate: &Performance, reference: Option<&Performance>) -> Performance {
        let point = self
            .highest_tier(candidate, reference)
            .map(Tier::points)
            .unwrap_or(1);
        candidate.with_point(point)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer::new(1.0)
    }
}

/// Zero ties with zero, otherwise the candidate must be positive and no longer than the reference.
fn beats_outcome(reference: f64, candidate: f64) -> bool {
    (reference == 0.0 && candidate == 0.0) || (reference >= candidate && candidate > 0.0)
}
