//! Poll state and decision logic
//!
//! The poll is the single unit of coordination: a snapshot electorate, a
//! ballot box, and a pass rule. This module owns all three.

pub mod ballot;
pub mod rule;
pub mod state;
pub mod tally;

pub use ballot::Ballot;
pub use rule::PassThreshold;
pub use state::Poll;
pub use tally::Tally;
