//! Relevance retrieval over chunked text.
//!
//! [`Retriever`] scores chunks against a query with cosine similarity over
//! embeddings from any [`EmbeddingProvider`], then keeps the best matches.
//! [`Retriever::relevant_context`] composes chunking and retrieval into the
//! "give me the part of this source that matters for this claim" operation
//! used when a source is too large to hand to a model whole.

use std::sync::Arc;

use serde::Serialize;

use crate::chunker::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP, TextChunk, chunk_text, floor_char_boundary};
use crate::embeddings::EmbeddingProvider;
use crate::types::RagError;

/// Default number of passages kept by [`Retriever::find_relevant_passages`].
pub const DEFAULT_TOP_K: usize = 3;
/// Default minimum cosine similarity for a passage to be considered relevant.
pub const DEFAULT_MIN_SCORE: f32 = 0.3;
/// Default byte budget for [`Retriever::relevant_context`] output.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 4_000;

/// Passages considered when assembling context, before the byte budget cuts in.
const CONTEXT_TOP_K: usize = 5;

/// A chunk paired with its similarity score against a query.
#[derive(Debug, Clone, Serialize)]
pub struct RelevantPassage {
    pub chunk: TextChunk,
    pub score: f32,
}

/// Ranks text chunks by embedding similarity to a query.
///
/// The provider is shared, so one retriever can serve many lookups without
/// re-initialising the embedding backend.
#[derive(Clone)]
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    min_score: f32,
}

impl Retriever {
    /// Creates a retriever with the default `top_k` and `min_score`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    /// Sets how many passages [`Self::find_relevant_passages`] keeps.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the similarity floor below which passages are discarded.
    #[must_use]
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Returns the chunks most similar to `query`, best first.
    ///
    /// The `top_k` cut is applied to the ranking first and the `min_score`
    /// floor second, so fewer than `top_k` passages may come back. Empty
    /// input returns an empty ranking without touching the provider.
    ///
    /// # Errors
    ///
    /// Propagates any [`RagError`] from the embedding provider.
    pub async fn find_relevant_passages(
        &self,
        query: &str,
        chunks: &[TextChunk],
    ) -> Result<Vec<RelevantPassage>, RagError> {
        self.rank(query, chunks, self.top_k, self.min_score).await
    }

    /// Extracts the portion of `source_text` most relevant to `claim`.
    ///
    /// The source is chunked with the default chunk geometry, the best
    /// passages are selected, and their texts are joined with blank lines
    /// until `max_context_chars` bytes would be exceeded. When nothing
    /// clears the similarity floor the head of the raw source is returned
    /// instead, truncated at a character boundary.
    ///
    /// # Errors
    ///
    /// Propagates any [`RagError`] from the embedding provider.
    pub async fn relevant_context(
        &self,
        claim: &str,
        source_text: &str,
        max_context_chars: usize,
    ) -> Result<String, RagError> {
        let chunks = chunk_text(source_text, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP);
        let passages = self
            .rank(claim, &chunks, CONTEXT_TOP_K, self.min_score)
            .await?;

        if passages.is_empty() {
            return Ok(truncate_to_boundary(source_text, max_context_chars).to_string());
        }

        let mut parts: Vec<&str> = Vec::new();
        let mut total = 0usize;
        for passage in &passages {
            let len = passage.chunk.text.len();
            if total + len > max_context_chars {
                break;
            }
            parts.push(passage.chunk.text.as_str());
            total += len + 2;
        }

        if parts.is_empty() {
            return Ok(truncate_to_boundary(source_text, max_context_chars).to_string());
        }

        let context = parts.join("\n\n");
        tracing::debug!(
            passages = parts.len(),
            context_bytes = context.len(),
            "assembled relevant context"
        );
        Ok(context)
    }

    async fn rank(
        &self,
        query: &str,
        chunks: &[TextChunk],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<RelevantPassage>, RagError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let chunk_vectors = self.provider.embed_batch(&texts).await?;
        let query_vector = self.provider.embed_query(query).await?;

        let mut scored: Vec<(usize, f32)> = chunk_vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(&query_vector, v)))
            .collect();
        // Stable descending sort keeps document order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(top_k)
            .filter(|(_, score)| *score >= min_score)
            .map(|(i, score)| RelevantPassage {
                chunk: chunks[i].clone(),
                score,
            })
            .collect())
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `0.0` for mismatched lengths or when either vector has zero norm,
/// so degenerate embeddings rank last instead of poisoning the sort.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn truncate_to_boundary(text: &str, max_bytes: usize) -> &str {
    &text[..floor_char_boundary(text, max_bytes.min(text.len()))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps any text containing a key substring to a fixed vector, so tests
    /// control similarity scores exactly.
    struct StubProvider {
        table: Vec<(&'static str, Vec<f32>)>,
        fallback: Vec<f32>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(table: Vec<(&'static str, Vec<f32>)>, fallback: Vec<f32>) -> Self {
            Self {
                table,
                fallback,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    self.table
                        .iter()
                        .find(|(key, _)| t.contains(key))
                        .map(|(_, v)| v.clone())
                        .unwrap_or_else(|| self.fallback.clone())
                })
                .collect())
        }

        fn dimension(&self) -> usize {
            self.fallback.len()
        }
    }

    fn chunk(text: &str, id: usize) -> TextChunk {
        TextChunk {
            text: text.to_string(),
            chunk_id: id,
            start_char: 0,
            end_char: text.len(),
        }
    }

    #[tokio::test]
    async fn ranks_passages_by_descending_similarity() {
        let provider = Arc::new(StubProvider::new(
            vec![
                ("apples", vec![1.0, 0.0]),
                ("bricks", vec![0.0, 1.0]),
                ("query", vec![1.0, 0.0]),
            ],
            vec![0.0, 0.0],
        ));
        let retriever = Retriever::new(provider);

        let chunks = vec![
            chunk("bricks and mortar", 0),
            chunk("apples in autumn", 1),
        ];
        let passages = retriever
            .find_relevant_passages("query about apples", &chunks)
            .await
            .unwrap();

        assert_eq!(passages.len(), 1, "orthogonal chunk must be filtered out");
        assert_eq!(passages[0].chunk.chunk_id, 1);
        assert!((passages[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn top_k_cut_happens_before_min_score_filter() {
        let provider = Arc::new(StubProvider::new(
            vec![
                ("strong", vec![1.0, 0.0]),
                ("good", vec![0.8, 0.6]),
                ("decent", vec![0.6, 0.8]),
                ("query", vec![1.0, 0.0]),
            ],
            vec![0.0, 0.0],
        ));
        let retriever = Retriever::new(provider).with_top_k(2);

        let chunks = vec![chunk("decent", 0), chunk("strong", 1), chunk("good", 2)];
        let passages = retriever
            .find_relevant_passages("query", &chunks)
            .await
            .unwrap();

        // "decent" scores 0.6, above the floor, but falls outside the top two.
        let ids: Vec<usize> = passages.iter().map(|p| p.chunk.chunk_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn min_score_filters_after_the_cut() {
        let provider = Arc::new(StubProvider::new(
            vec![
                ("strong", vec![1.0, 0.0]),
                ("weak", vec![0.1, 0.99]),
                ("query", vec![1.0, 0.0]),
            ],
            vec![0.0, 0.0],
        ));
        let retriever = Retriever::new(provider).with_top_k(3);

        let chunks = vec![chunk("strong match", 0), chunk("weak aside", 1)];
        let passages = retriever
            .find_relevant_passages("query", &chunks)
            .await
            .unwrap();

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].chunk.chunk_id, 0);
    }

    #[tokio::test]
    async fn empty_chunk_list_skips_the_provider() {
        let provider = Arc::new(StubProvider::new(vec![], vec![0.0, 0.0]));
        let calls = Arc::clone(&provider);
        let retriever = Retriever::new(provider);

        let passages = retriever.find_relevant_passages("query", &[]).await.unwrap();

        assert!(passages.is_empty());
        assert_eq!(calls.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn relevant_context_joins_passages_with_blank_lines() {
        let source = format!("{}. {}.", "a".repeat(300), "b".repeat(300));
        let chunks = chunk_text(&source, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP);
        assert_eq!(chunks.len(), 2, "fixture must produce two chunks");

        // Both chunks score equally against the query, so document order holds.
        let provider = Arc::new(StubProvider::new(
            vec![("query", vec![1.0, 1.0])],
            vec![1.0, 1.0],
        ));
        let retriever = Retriever::new(provider);

        let context = retriever
            .relevant_context("query", &source, DEFAULT_MAX_CONTEXT_CHARS)
            .await
            .unwrap();

        assert_eq!(context, format!("{}\n\n{}", chunks[0].text, chunks[1].text));
    }

    #[tokio::test]
    async fn relevant_context_stops_at_the_byte_budget() {
        let source = format!("{}. {}.", "a".repeat(300), "b".repeat(300));
        let chunks = chunk_text(&source, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP);
        let provider = Arc::new(StubProvider::new(
            vec![("query", vec![1.0, 1.0])],
            vec![1.0, 1.0],
        ));
        let retriever = Retriever::new(provider);

        let budget = chunks[0].text.len() + 1;
        let context = retriever
            .relevant_context("query", &source, budget)
            .await
            .unwrap();

        assert_eq!(context, chunks[0].text);
    }

    #[tokio::test]
    async fn relevant_context_falls_back_to_raw_head_when_nothing_scores() {
        let provider = Arc::new(StubProvider::new(
            vec![("query", vec![1.0, 0.0])],
            vec![0.0, 1.0],
        ));
        let retriever = Retriever::new(provider);

        let context = retriever
            .relevant_context("query", "alpha beta gamma", 5)
            .await
            .unwrap();

        assert_eq!(context, "alpha");
    }

    #[tokio::test]
    async fn fallback_truncation_respects_char_boundaries() {
        let provider = Arc::new(StubProvider::new(
            vec![("query", vec![1.0, 0.0])],
            vec![0.0, 1.0],
        ));
        let retriever = Retriever::new(provider);

        // "héllo" puts a two-byte char at index 1; budget 2 lands mid-char.
        let context = retriever
            .relevant_context("query", "héllo", 2)
            .await
            .unwrap();

        assert_eq!(context, "h");
    }

    #[test]
    fn cosine_similarity_handles_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
