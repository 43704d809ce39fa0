//! Deterministic offline embedding provider.
//!
//! [`HashEmbedding`] derives a vector from a hash of the input bytes, so
//! identical text always embeds identically and nothing touches the
//! network. It exists for tests, demos, and local smoke runs; retrieval
//! quality is not a goal.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// A deterministic hash-based [`EmbeddingProvider`].
///
/// The vector direction depends only on the text content, and vectors are
/// L2-normalized so cosine similarity reduces to a dot product. Two
/// instances with the same dimensionality produce identical embeddings
/// for identical input.
///
/// # Example
///
/// ```rust,ignore
/// use rma_rag::HashEmbedding;
///
/// let provider = HashEmbedding::new(64);
/// let a = provider.embed("return policy").await?;
/// let b = provider.embed("return policy").await?;
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimensions: usize,
    model: String,
}

impl HashEmbedding {
    /// Create a provider producing vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, model: format!("hash-embedding-{dimensions}") }
    }

    /// Override the reported model identity.
    ///
    /// Useful for exercising the model-identity check against a stored
    /// collection without changing the vectors themselves.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        // L2-normalize so cosine similarity is just the dot product.
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
