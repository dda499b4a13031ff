//! # resumerank Similarity
//!
//! Embedding-based ranking of candidate texts against one reference text.
//!
//! ## Example
//!
//! ```rust
//! use resumerank_similarity::{HashingEmbedder, SimilarityRanker};
//! use std::sync::Arc;
//!
//! let ranker = SimilarityRanker::new(Arc::new(HashingEmbedder::default()));
//! let scores = ranker
//!     .score(
//!         "Looking for a Python backend engineer",
//!         &["Python backend developer".to_string(), "Watercolor painter".to_string()],
//!     )
//!     .unwrap();
//! assert!(scores[0] > scores[1]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Reference  │────>│  Embedder   │────>│   Cosine    │
//! │ + candidates│     │ (texts→v)   │     │  per cand.  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌──────┴──────┐
//!                                         │ Sort: score │
//!                                         │ desc, index │
//!                                         └─────────────┘
//! ```

pub mod distance;
pub mod embedder;
pub mod rank;

pub use distance::{hash_text_to_vector, tokenize};
pub use embedder::{Embedder, HashingEmbedder, HttpEmbedder};
pub use rank::{compare_ranked, ranking_order, sort_scored, SimilarityRanker};
