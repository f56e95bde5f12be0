//! Similarity ranking: cosine similarity of one query vector against a pool.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Embedding dimension mismatch for {id}: expected {expected}, got {actual}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },
}

/// A pool entry that survived the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub id: String,
    pub similarity: f64,
}

/// Cosine similarity computed in f64. Zero-norm vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Ranks `pool` against `query`.
///
/// Drops every entry with similarity `<= min_similarity`, sorts the rest in
/// descending order (ties keep pool order) and keeps at most `count`.
pub fn rank<'a, I>(
    query: &[f32],
    pool: I,
    min_similarity: f64,
    count: usize,
) -> Result<Vec<RankedMatch>, RankingError>
where
    I: IntoIterator<Item = (&'a str, &'a [f32])>,
{
    let mut matches = Vec::new();
    for (id, embedding) in pool {
        if embedding.len() != query.len() {
            return Err(RankingError::DimensionMismatch {
                id: id.to_string(),
                expected: query.len(),
                actual: embedding.len(),
            });
        }
        let similarity = cosine_similarity(query, embedding);
        if similarity > min_similarity {
            matches.push(RankedMatch {
                id: id.to_string(),
                similarity,
            });
        }
    }

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches.truncate(count);
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<(String, Vec<f32>)> {
        vec![
            ("orthogonal".to_string(), vec![0.0, 1.0, 0.0]),
            ("close".to_string(), vec![0.9, 0.1, 0.0]),
            ("opposite".to_string(), vec![-1.0, 0.0, 0.0]),
            ("exact".to_string(), vec![2.0, 0.0, 0.0]),
            ("partial".to_string(), vec![0.5, 0.5, 0.5]),
        ]
    }

    fn rank_pool(pool: &[(String, Vec<f32>)], count: usize) -> Vec<RankedMatch> {
        let query = [1.0_f32, 0.0, 0.0];
        rank(
            &query,
            pool.iter().map(|(id, e)| (id.as_str(), e.as_slice())),
            0.0,
            count,
        )
        .unwrap()
    }

    #[test]
    fn test_cosine_of_parallel_vectors_is_one() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_with_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_results_are_sorted_descending() {
        let results = rank_pool(&pool(), 10);
        let ids: Vec<&str> = results.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "close", "partial"]);
        assert!(results
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn test_non_positive_similarities_are_dropped() {
        let results = rank_pool(&pool(), 10);
        assert!(results.iter().all(|m| m.similarity > 0.0));
        assert!(!results.iter().any(|m| m.id == "orthogonal" || m.id == "opposite"));
    }

    #[test]
    fn test_count_truncates() {
        let results = rank_pool(&pool(), 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "exact");
    }

    #[test]
    fn test_count_larger_than_pool_returns_everything_retained() {
        let results = rank_pool(&pool(), 500);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_empty_pool_returns_empty() {
        let results = rank_pool(&[], 5);
        assert!(results.is_empty());
    }

    #[test]
    fn test_ties_keep_pool_order() {
        let pool = vec![
            ("first".to_string(), vec![1.0, 0.0]),
            ("second".to_string(), vec![3.0, 0.0]),
        ];
        let results = rank(
            &[1.0, 0.0],
            pool.iter().map(|(id, e)| (id.as_str(), e.as_slice())),
            0.0,
            5,
        )
        .unwrap();
        assert_eq!(results[0].id, "first");
        assert_eq!(results[1].id, "second");
    }

    #[test]
    fn test_custom_cutoff_filters_weak_matches() {
        let pool = pool();
        let results = rank(
            &[1.0, 0.0, 0.0],
            pool.iter().map(|(id, e)| (id.as_str(), e.as_slice())),
            0.9,
            10,
        )
        .unwrap();
        let ids: Vec<&str> = results.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "close"]);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let pool = vec![("short".to_string(), vec![1.0_f32])];
        let err = rank(
            &[1.0, 0.0],
            pool.iter().map(|(id, e)| (id.as_str(), e.as_slice())),
            0.0,
            5,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RankingError::DimensionMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }
}
