//! # resumerank Session
//!
//! Orchestrates intake, anonymization and ranking into one call and keeps
//! the full ranked tables for later download.
//!
//! Each ranking call returns a [`ResultHandle`]; retrieving by handle always
//! yields that call's table. [`RankingSession::latest`] is a last-write-wins
//! convenience with no consistency guarantee across concurrent callers.

pub mod session;
pub mod store;

pub use session::{Candidates, RankOutcome, RankRequest, RankedEntry, RankedResult, RankingSession};
pub use store::{ResultHandle, ResultStore, StoredResult};
