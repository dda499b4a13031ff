//! Embedding collaborators
//!
//! An [`Embedder`] turns a batch of texts into unit vectors of a fixed
//! dimension, one per text, in input order.

use crate::distance::hash_text_to_vector;
use resumerank_core::{Error, Result, Vector, DEFAULT_EMBEDDING_DIM};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Text → vector function used for ranking
pub trait Embedder: Send + Sync {
    /// Dimension of every returned vector
    fn dim(&self) -> usize;

    /// Embed a batch of texts, one unit vector per text, order preserved
    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Short name for logs
    fn name(&self) -> &str {
        "embedder"
    }

    /// Embed a single text
    fn embed_one(&self, text: &str) -> Result<Vector> {
        let mut vectors = self.embed(&[text.to_string()])?;
        match vectors.len() {
            1 => Ok(vectors.remove(0)),
            actual => Err(Error::EmbeddingCountMismatch { expected: 1, actual }),
        }
    }
}

/// Deterministic feature-hashing embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if self.dim == 0 {
            return Err(Error::Embedding("embedding dimension must be positive".into()));
        }
        Ok(texts
            .iter()
            .map(|text| Vector::new(hash_text_to_vector(text, self.dim)))
            .collect())
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    normalize: bool,
}

/// Remote embedder speaking the text-embeddings-inference `/embed` protocol
///
/// Blocking; call it off the async executor.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::blocking::Client,
    endpoint: String,
    dim: usize,
}

impl HttpEmbedder {
    pub fn new(base_url: &str, dim: usize) -> Result<Self> {
        Self::with_timeout(base_url, dim, Duration::from_secs(60))
    }

    pub fn with_timeout(base_url: &str, dim: usize, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::InvalidConfig("embedding URL must not be empty".into()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Embedding(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/embed", base_url),
            dim,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Embedder for HttpEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Requesting {} embeddings from {}", texts.len(), self.endpoint);
        let rows: Vec<Vec<f32>> = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { inputs: texts, normalize: true })
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<Vec<Vec<f32>>>())
            .map_err(|e| Error::Embedding(e.to_string()))?;

        vectors_from_rows(rows, texts.len(), self.dim)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Check a server response against the request and normalize it
fn vectors_from_rows(rows: Vec<Vec<f32>>, expected: usize, dim: usize) -> Result<Vec<Vector>> {
    if rows.len() != expected {
        return Err(Error::EmbeddingCountMismatch {
            expected,
            actual: rows.len(),
        });
    }

    rows.into_iter()
        .map(|row| {
            if row.len() != dim {
                return Err(Error::Embedding(format!(
                    "server returned a {}-dimensional vector, expected {}",
                    row.len(),
                    dim
                )));
            }
            Ok(Vector::new(row).normalized())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_embedder_shapes() {
        let embedder = HashingEmbedder::new(32);
        let texts = vec!["Rust engineer".to_string(), String::new()];
        let vectors = embedder.embed(&texts).unwrap();

        assert_eq!(vectors.len(), 2);
        assert!(vectors.iter().all(|v| v.dim() == 32));
        assert!((vectors[0].norm() - 1.0).abs() < 1e-4);
        // Empty text embeds to the zero vector
        assert_eq!(vectors[1].norm(), 0.0);
    }

    #[test]
    fn test_hashing_embedder_is_deterministic() {
        let embedder = HashingEmbedder::default();
        assert_eq!(embedder.dim(), DEFAULT_EMBEDDING_DIM);
        let a = embedder.embed_one("Backend developer").unwrap();
        let b = embedder.embed_one("Backend developer").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_dimension_fails() {
        let embedder = HashingEmbedder::new(0);
        assert!(matches!(embedder.embed_one("x"), Err(Error::Embedding(_))));
    }

    #[test]
    fn test_http_embedder_endpoint() {
        let embedder = HttpEmbedder::new("http://localhost:8080/", 384).unwrap();
        assert_eq!(embedder.endpoint(), "http://localhost:8080/embed");
        // Nothing to send, no request made
        assert!(embedder.embed(&[]).unwrap().is_empty());
        assert!(HttpEmbedder::new("  ", 384).is_err());
    }

    #[test]
    fn test_server_response_validation() {
        let vectors = vectors_from_rows(vec![vec![3.0, 4.0], vec![0.0, 2.0]], 2, 2).unwrap();
        assert!((vectors[0].as_slice()[0] - 0.6).abs() < 1e-6);
        assert!((vectors[0].as_slice()[1] - 0.8).abs() < 1e-6);
        assert!((vectors[1].norm() - 1.0).abs() < 1e-6);

        assert!(matches!(
            vectors_from_rows(vec![vec![1.0, 0.0]], 2, 2),
            Err(Error::EmbeddingCountMismatch { expected: 2, actual: 1 })
        ));

        let err = vectors_from_rows(vec![vec![1.0, 0.0, 0.0]], 1, 2).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
        assert_eq!(err.kind(), "embedding_failure");
    }
}
