//! Embedding-based passage ranking.

use tracing::debug;

use crate::error::Result;
use crate::traits::embedder::Embedder;
use crate::types::Passage;

/// Guards the denominator against a degenerate zero vector.
const COSINE_EPSILON: f32 = 1e-10;

/// Cosine similarity between two vectors.
///
/// Mismatched or empty vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    dot / (norm_a * norm_b + COSINE_EPSILON)
}

/// Rank passages by cosine similarity to the query.
///
/// Embeds the query once and all passages in one batch, then returns at
/// most `top_k` `(pool index, score)` pairs sorted by descending score.
/// The sort is stable: exact ties keep original insertion order. An
/// empty passage list returns empty without invoking the embedder.
pub async fn rank_passages<E: Embedder>(
    embedder: &E,
    query: &str,
    passages: &[Passage],
    top_k: usize,
) -> Result<Vec<(usize, f32)>> {
    if passages.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
    let passage_vectors = embedder.embed_batch(&texts).await?;
    let query_vector = embedder.embed(query).await?;

    let mut scored: Vec<(usize, f32)> = passage_vectors
        .iter()
        .enumerate()
        .map(|(i, vector)| (i, cosine_similarity(&query_vector, vector)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    debug!(
        pool = passages.len(),
        kept = scored.len(),
        top_score = scored.first().map(|(_, s)| *s).unwrap_or(0.0),
        "passages ranked"
    );

    Ok(scored)
}
