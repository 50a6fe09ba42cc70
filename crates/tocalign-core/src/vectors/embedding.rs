//! Dense embedding vectorization.

use super::extract::TextExtractor;
use super::{tokenize, Vector, VectorMap, VectorProvider};
use crate::error::{EmbeddingError, VectorizeError};
use crate::textbook::Section;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;
use xxhash_rust::xxh64::xxh64;

/// Trait for text embedding models.
///
/// Allows a learned document-embedding model to be plugged in without changing
/// the pipeline. Implementations must be `Send + Sync` so one model can be
/// shared across integration sessions.
///
/// # Examples
///
/// ```ignore
/// let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(256)?);
/// let embedding = embedder.embed_text("conservation of energy")?;
/// assert_eq!(embedding.len(), embedder.embedding_dim());
/// ```
pub trait Embedder: Send + Sync {
    /// Returns the embedding dimension (vector size).
    ///
    /// All embeddings from this model will have this length.
    fn embedding_dim(&self) -> usize;

    /// Generates an embedding for one text.
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Generates embeddings for several texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

/// Deterministic, model-free embedder based on signed feature hashing.
///
/// Each token is hashed (xxh64, seed 0) into one of `dimension` buckets; a second hash
/// bit chooses the sign. The bucket counts are L2-normalized, so texts sharing
/// vocabulary land close together under cosine similarity.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Creates an embedder producing `dimension`-sized vectors.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::InvalidConfig` for a zero dimension.
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dimension })
    }
}

impl Embedder for HashingEmbedder {
    fn embedding_dim(&self) -> usize {
        self.dimension
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embedding = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let hash = xxh64(token.as_bytes(), 0);
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        Ok(embedding)
    }
}

/// Embedding provider: one text extractor feeding one embedder.
#[derive(Clone)]
pub struct EmbeddingVectorizer {
    embedder: Arc<dyn Embedder>,
    extractor: TextExtractor,
}

impl fmt::Debug for EmbeddingVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingVectorizer")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .finish()
    }
}

impl EmbeddingVectorizer {
    /// Creates a provider.
    pub fn new(embedder: Arc<dyn Embedder>, extractor: TextExtractor) -> Self {
        Self {
            embedder,
            extractor,
        }
    }
}

impl VectorProvider for EmbeddingVectorizer {
    #[instrument(skip_all, fields(corpus = corpus.len(), dim = self.embedder.embedding_dim()))]
    fn vectorize(&self, corpus: &[&Section]) -> Result<VectorMap, VectorizeError> {
        let texts: Vec<String> = corpus.iter().map(|&s| (self.extractor)(s)).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;

        let expected = self.embedder.embedding_dim();
        if embeddings.len() != corpus.len() {
            return Err(EmbeddingError::InferenceFailed(format!(
                "expected {} embeddings, got {}",
                corpus.len(),
                embeddings.len()
            ))
            .into());
        }

        corpus
            .iter()
            .zip(embeddings)
            .map(|(section, embedding)| {
                if embedding.len() != expected {
                    return Err(VectorizeError::Embedding(
                        EmbeddingError::DimensionMismatch {
                            expected,
                            actual: embedding.len(),
                        },
                    ));
                }
                Ok((section.id(), Vector::Dense(embedding)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textbook::{SectionSource, Textbook, TextbookSource};
    use crate::vectors::extract;

    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn embedding_dim(&self) -> usize {
            4
        }

        fn embed_text(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![1.0, 0.0])
        }
    }

    #[test]
    fn test_hashing_embedder_dimension_and_norm() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let v = embedder.embed_text("kinetic energy of a moving body").unwrap();
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_embedder_deterministic() {
        let embedder = HashingEmbedder::new(32).unwrap();
        assert_eq!(
            embedder.embed_text("heat engines").unwrap(),
            embedder.embed_text("heat engines").unwrap()
        );
    }

    #[test]
    fn test_hashing_embedder_empty_text() {
        let embedder = HashingEmbedder::new(8).unwrap();
        assert_eq!(embedder.embed_text("").unwrap(), vec![0.0; 8]);
    }

    #[test]
    fn test_hashing_embedder_zero_dimension() {
        assert!(matches!(
            HashingEmbedder::new(0),
            Err(EmbeddingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_vectorizer_produces_dense_vectors() {
        let book = Textbook::from_source(TextbookSource::new(
            "T",
            vec![SectionSource::new("Heat", "temperature"), SectionSource::new("Light", "waves")],
        ));
        let corpus: Vec<&Section> = book.all_subsections().iter().collect();
        let provider = EmbeddingVectorizer::new(
            Arc::new(HashingEmbedder::new(16).unwrap()),
            extract::header_and_content(),
        );

        let vectors = provider.vectorize(&corpus).unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors
            .values()
            .all(|v| matches!(v, Vector::Dense(d) if d.len() == 16)));
    }

    #[test]
    fn test_vectorizer_rejects_wrong_dimension() {
        let book = Textbook::from_source(TextbookSource::new(
            "T",
            vec![SectionSource::new("Heat", "temperature")],
        ));
        let corpus: Vec<&Section> = book.all_subsections().iter().collect();
        let provider = EmbeddingVectorizer::new(Arc::new(BrokenEmbedder), extract::content());

        assert!(matches!(
            provider.vectorize(&corpus),
            Err(VectorizeError::Embedding(EmbeddingError::DimensionMismatch {
                expected: 4,
                actual: 2
            }))
        ));
    }
}
