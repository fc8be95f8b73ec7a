//! Insight domain module.
//!
//! Builds the deterministic plain-text digest of inventory state and recent
//! ledger activity, and defines the boundary to the external summarization
//! collaborator that turns the digest into prose. Read-only by construction:
//! nothing in this crate mutates inventory state.

pub mod digest;
pub mod summarizer;

pub use digest::{InsightReport, InventoryDigest};
pub use summarizer::{Summarizer, SummaryError};
