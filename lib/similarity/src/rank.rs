//! Similarity ranking
//!
//! Scores candidates by cosine similarity to a reference text and orders
//! them by score descending, then by original index ascending.

use crate::embedder::Embedder;
use ordered_float::OrderedFloat;
use resumerank_core::{Document, Error, Result, ScoredDocument, Vector};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Ranks candidate texts against a reference text
#[derive(Clone)]
pub struct SimilarityRanker {
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for SimilarityRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityRanker")
            .field("embedder", &self.embedder.name())
            .field("dim", &self.embedder.dim())
            .finish()
    }
}

impl SimilarityRanker {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// One score per candidate, in candidate order
    ///
    /// The reference and all candidates are embedded in a single batch.
    pub fn score(&self, reference: &str, candidates: &[String]) -> Result<Vec<f32>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut texts = Vec::with_capacity(candidates.len() + 1);
        texts.push(reference.to_string());
        texts.extend(candidates.iter().cloned());

        let vectors = self.embedder.embed(&texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let (reference_vector, candidate_vectors) = vectors
            .split_first()
            .ok_or(Error::EmbeddingCountMismatch { expected: texts.len(), actual: 0 })?;

        let scores = candidate_vectors
            .iter()
            .map(|v| similarity(reference_vector, v))
            .collect::<Result<Vec<f32>>>()?;

        debug!(
            "Scored {} candidates with the {} embedder",
            scores.len(),
            self.embedder.name()
        );
        Ok(scores)
    }

    /// Score and order documents
    pub fn rank(&self, reference: &str, documents: Vec<Document>) -> Result<Vec<ScoredDocument>> {
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let scores = self.score(reference, &texts)?;

        let mut scored: Vec<ScoredDocument> = documents
            .into_iter()
            .zip(scores)
            .map(|(document, score)| ScoredDocument::new(document, score))
            .collect();
        sort_scored(&mut scored);
        Ok(scored)
    }
}

fn similarity(reference: &Vector, candidate: &Vector) -> Result<f32> {
    if reference.dim() != candidate.dim() {
        return Err(Error::Embedding(format!(
            "vector dimensions differ: {} and {}",
            reference.dim(),
            candidate.dim()
        )));
    }
    Ok(reference.cosine_similarity(candidate))
}

/// Ranking order: higher score first, lower original index on ties
pub fn compare_ranked(a: (f32, usize), b: (f32, usize)) -> Ordering {
    OrderedFloat(b.0)
        .cmp(&OrderedFloat(a.0))
        .then_with(|| a.1.cmp(&b.1))
}

/// Sort scored documents into ranking order
pub fn sort_scored(scored: &mut [ScoredDocument]) {
    scored.sort_by(|a, b| compare_ranked((a.score, a.index()), (b.score, b.index())));
}

/// Permutation of `0..scores.len()` in ranking order
pub fn ranking_order(scores: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| compare_ranked((scores[a], a), (scores[b], b)));
    order
}
