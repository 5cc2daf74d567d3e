//! Signal fusion: weighted category composites and vote-counting
//! indicator composites.

pub mod summary;
pub mod votes;
pub mod weighted;

pub use votes::{VoteSignal, VoteTally};
pub use weighted::{assess, CompositeAssessment, WeightingPolicy};
