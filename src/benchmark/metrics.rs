//! Recall metrics.

use std::collections::HashSet;

/// recall@k = |retrieved ∩ ground_truth| / k, both truncated to `k`.
///
/// Returns a value in `[0.0, 1.0]`; `0.0` when `k` is zero or there is no
/// ground truth.
pub fn recall_at_k(ground_truth: &[u32], retrieved: &[u32], k: usize) -> f32 {
    if k == 0 || ground_truth.is_empty() {
        return 0.0;
    }

    let truth: HashSet<u32> = ground_truth.iter().take(k).copied().collect();
    let hits = retrieved
        .iter()
        .take(k)
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|id| truth.contains(id))
        .count();
    hits as f32 / truth.len().min(k) as f32
}

/// Mean recall@k over paired ground-truth and retrieval lists.
pub fn mean_recall(ground_truths: &[Vec<u32>], retrievals: &[Vec<u32>], k: usize) -> f32 {
    if ground_truths.is_empty() {
        return 0.0;
    }

    let total: f32 = ground_truths
        .iter()
        .zip(retrievals.iter())
        .map(|(gt, ret)| recall_at_k(gt, ret, k))
        .sum();

    total / ground_truths.len() as f32
}
