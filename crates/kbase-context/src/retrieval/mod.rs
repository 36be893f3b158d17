//! Exhaustive top-k ranking by cosine similarity.
//!
//! Ranking is a linear scan over every candidate; there is no index.
//! Ties are broken by ascending candidate position, so the output is fully
//! deterministic for a given input.

mod similarity;

use core::cmp::Ordering;

use kbase_core::Result;

pub use similarity::cosine_similarity;
use similarity::{ensure_dimensions, ensure_finite};

/// A candidate position paired with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIndex {
    /// Position of the candidate in the input sequence
    pub index: usize,
    /// Cosine similarity to the query, in `[-1, 1]`
    pub score: f32,
}

/// Ranks `candidates` against `query` and returns the positions of the best `top_k`.
///
/// See [`rank_scored`] for the ordering and validation rules.
///
/// # Errors
/// Same as [`rank_scored`].
pub fn rank<C: AsRef<[f32]>>(query: &[f32], candidates: &[C], top_k: usize) -> Result<Vec<usize>> {
    Ok(rank_scored(query, candidates, top_k)?
        .into_iter()
        .map(|scored| scored.index)
        .collect())
}

/// Ranks `candidates` against `query`, keeping the scores.
///
/// Results are sorted by descending similarity, then ascending position,
/// and truncated to `min(top_k, candidates.len())`. An empty candidate set
/// or `top_k == 0` yields an empty result.
///
/// # Errors
/// Returns [`kbase_core::Error::DimensionMismatch`] if a candidate's length
/// differs from the query's, and [`kbase_core::Error::NonFiniteVector`] if
/// any vector holds NaN or an infinity.
pub fn rank_scored<C: AsRef<[f32]>>(
    query: &[f32],
    candidates: &[C],
    top_k: usize,
) -> Result<Vec<ScoredIndex>> {
    if candidates.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }

    ensure_finite(query, None)?;

    let mut scored = Vec::with_capacity(candidates.len());
    for (index, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        ensure_dimensions(query.len(), candidate, index)?;
        ensure_finite(candidate, Some(index))?;
        scored.push(ScoredIndex {
            index,
            score: cosine_similarity(query, candidate),
        });
    }

    scored.sort_by(compare_ranked);
    scored.truncate(top_k);

    tracing::debug!(
        "Ranked {} candidates, kept {} (best score {:?})",
        candidates.len(),
        scored.len(),
        scored.first().map(|best| best.score)
    );

    Ok(scored)
}

/// Descending score, then ascending index. Scores are finite here, and
/// `0.0` and `-0.0` compare equal so they fall back to position.
fn compare_ranked(first: &ScoredIndex, second: &ScoredIndex) -> Ordering {
    second
        .score
        .partial_cmp(&first.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| first.index.cmp(&second.index))
}
