use crate::model::DisplayProduct;

/// Normalizes a raw query: surrounding whitespace removed, lower-cased.
pub(crate) fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Indices of the products whose title contains `query`, case-insensitively.
/// An empty (or whitespace-only) query matches everything, in order.
pub fn matching_indices(items: &[DisplayProduct], query: &str) -> Vec<usize> {
    let pattern = normalize_query(query);
    if pattern.is_empty() {
        return (0..items.len()).collect();
    }
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.title.to_lowercase().contains(&pattern))
        .map(|(idx, _)| idx)
        .collect()
}

/// Ordered subsequence of `items` whose titles match `query`.
pub fn filter(items: &[DisplayProduct], query: &str) -> Vec<DisplayProduct> {
    matching_indices(items, query)
        .into_iter()
        .map(|idx| items[idx].clone())
        .collect()
}
