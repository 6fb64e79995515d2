//! Embedding-based nearest-document retriever.

use crate::knowledge::{Document, KnowledgeBase};
use crate::openai_compat::{EmbeddingRequest, OpenAICompatClient};
use async_trait::async_trait;
use learner_core::{Query, RetrievalResult};
use learner_error::{RetrievalError, RetrievalErrorKind};
use learner_interface::Retriever;
use tracing::{debug, info, instrument};

/// Scale `vector` to unit length. Zero vectors are returned unchanged.
pub fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

/// Euclidean distance between two vectors of equal length.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[derive(Debug, Clone)]
struct IndexedDocument {
    document: Document,
    vector: Vec<f32>,
}

/// Retriever over an embedded [`KnowledgeBase`].
///
/// Documents are embedded once in [`build`](Self::build). Distances are
/// Euclidean distances between unit vectors, so they range from 0 (same
/// direction) to 2 (opposite).
#[derive(Debug, Clone)]
pub struct EmbeddingRetriever {
    client: OpenAICompatClient,
    model: String,
    index: Vec<IndexedDocument>,
}

impl EmbeddingRetriever {
    /// Embed every document in `knowledge` with `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base is empty or embedding fails.
    #[instrument(skip(client, knowledge), fields(documents = knowledge.len()))]
    pub async fn build(
        client: OpenAICompatClient,
        model: impl Into<String> + std::fmt::Debug,
        knowledge: KnowledgeBase,
    ) -> Result<Self, RetrievalError> {
        if knowledge.is_empty() {
            return Err(RetrievalError::new(RetrievalErrorKind::EmptyKnowledgeBase));
        }
        let model = model.into();

        let request = EmbeddingRequest::builder()
            .model(model.as_str())
            .input(
                knowledge
                    .documents()
                    .iter()
                    .map(|d| d.text().clone())
                    .collect(),
            )
            .build();
        let vectors = client
            .embed(&request)
            .await
            .map_err(|e| RetrievalError::new(RetrievalErrorKind::Embedding(e.to_string())))?;

        let index = knowledge
            .documents()
            .iter()
            .cloned()
            .zip(vectors)
            .map(|(document, vector)| IndexedDocument {
                document,
                vector: normalize(vector),
            })
            .collect::<Vec<_>>();

        info!(documents = index.len(), model = %model, "Knowledge base embedded");
        Ok(Self {
            client,
            model,
            index,
        })
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn nearest(&self, query_vector: &[f32]) -> Result<RetrievalResult, RetrievalError> {
        let (best, distance) = self
            .index
            .iter()
            .map(|entry| {
                if entry.vector.len() != query_vector.len() {
                    return Err(RetrievalError::new(RetrievalErrorKind::Malformed(format!(
                        "embedding dimension mismatch: document {} has {}, query has {}",
                        entry.document.source(),
                        entry.vector.len(),
                        query_vector.len()
                    ))));
                }
                Ok((entry, euclidean_distance(&entry.vector, query_vector)))
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| RetrievalError::new(RetrievalErrorKind::EmptyKnowledgeBase))?;

        Ok(RetrievalResult::new(
            best.document.text().clone(),
            best.document.source().clone(),
            distance,
        ))
    }
}

#[async_trait]
impl Retriever for EmbeddingRetriever {
    #[instrument(skip(self, query))]
    async fn retrieve(&self, query: &Query) -> Result<RetrievalResult, RetrievalError> {
        let request = EmbeddingRequest::builder()
            .model(self.model.as_str())
            .input(vec![query.as_str().to_string()])
            .build();
        let vector = self
            .client
            .embed(&request)
            .await
            .map_err(|e| RetrievalError::new(RetrievalErrorKind::Embedding(e.to_string())))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                RetrievalError::new(RetrievalErrorKind::Embedding("no query embedding".into()))
            })?;

        let result = self.nearest(&normalize(vector))?;
        debug!(source = %result.source(), distance = result.distance(), "Nearest document");
        Ok(result)
    }
}
