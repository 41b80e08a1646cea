//! Cosine similarity and deterministic top-k ranking for memory retrieval.

use bytebond_types::memory::{MemoryRecord, RetrievalResult};

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-norm inputs.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank records against a query by the similarity of their input embedding.
///
/// Ordering is total: descending similarity, then newer `created_at`,
/// then larger id. Records scoring below `min_similarity` are dropped.
pub fn rank_records<'a, I>(
    query: &[f32],
    records: I,
    top_k: usize,
    min_similarity: f32,
) -> Vec<RetrievalResult>
where
    I: IntoIterator<Item = &'a MemoryRecord>,
{
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f32, &MemoryRecord)> = records
        .into_iter()
        .map(|record| (cosine_similarity(query, &record.input_embedding), record))
        .filter(|(score, _)| *score >= min_similarity)
        .collect();

    scored.sort_by(|(sa, ra), (sb, rb)| {
        sb.total_cmp(sa)
            .then_with(|| rb.created_at.cmp(&ra.created_at))
            .then_with(|| rb.id.cmp(&ra.id))
    });

    scored
        .into_iter()
        .take(top_k)
        .map(|(similarity, record)| RetrievalResult {
            record: record.clone(),
            similarity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};

    fn record(text: &str, embedding: Vec<f32>, age_secs: i64) -> MemoryRecord {
        let mut r = MemoryRecord::new("u", text, "reply", embedding.clone(), embedding, "test");
        r.created_at = Utc::now() - Duration::seconds(age_secs);
        r
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert!((cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let records = vec![
            record("far", vec![0.0, 1.0], 10),
            record("near", vec![1.0, 0.1], 10),
            record("mid", vec![1.0, 1.0], 10),
        ];
        let ranked = rank_records(&[1.0, 0.0], &records, 3, -1.0);
        let texts: Vec<&str> = ranked.iter().map(|r| r.record.user_text.as_str()).collect();
        assert_eq!(texts, vec!["near", "mid", "far"]);
        assert!(ranked[0].similarity >= ranked[1].similarity);
    }

    #[test]
    fn test_rank_breaks_ties_by_recency() {
        let records = vec![
            record("older", vec![1.0, 0.0], 100),
            record("newer", vec![1.0, 0.0], 1),
        ];
        let ranked = rank_records(&[1.0, 0.0], &records, 1, 0.0);
        assert_eq!(ranked[0].record.user_text, "newer");
    }

    #[test]
    fn test_rank_applies_floor_and_limit() {
        let records = vec![
            record("a", vec![1.0, 0.0], 1),
            record("b", vec![0.0, 1.0], 1),
        ];
        assert_eq!(rank_records(&[1.0, 0.0], &records, 5, 0.5).len(), 1);
        assert!(rank_records(&[1.0, 0.0], &records, 0, 0.0).is_empty());
    }

    #[test]
    fn test_rank_is_idempotent() {
        let records: Vec<MemoryRecord> = (0..5)
            .map(|i| record(&format!("r{i}"), vec![1.0, i as f32 * 0.1], 5))
            .collect();
        let first = rank_records(&[1.0, 0.2], &records, 3, 0.0);
        let second = rank_records(&[1.0, 0.2], &records, 3, 0.0);
        assert_eq!(first, second);
    }
}
