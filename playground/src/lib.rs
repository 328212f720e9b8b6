//! Interactive session state on top of the `merklelab` engine.
//!
//! A [`Playground`] owns an editable list of items and the tree most
//! recently built from it, tracks which nodes are highlighted and which leaf
//! was tampered with, and hands out [`BuildTicket`]s so rebuilds can run off
//! the caller's thread without a stale result ever replacing a newer one.
//! [`TamperChallenge`] is the shard-hunting game.

pub mod challenge;
pub mod config;
pub mod context;
mod error;
pub mod session;

pub use challenge::{ChallengeState, InspectOutcome, TamperChallenge};
pub use config::PlaygroundConfig;
pub use context::ContextMode;
pub use error::PlaygroundError;
pub use session::{BuildTicket, BuiltTree, NodeSelection, Playground};
