use crate::functions;
use crate::table::ExampleTable;
use std::hash::Hash;

/// Entropy contribution of a subset of `k` items out of `n`.
///
/// `k == 0` contributes exactly `0.0` rather than `NaN`.
pub fn entropy(k: usize, n: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let p = k as f64 / n as f64;
    -p * p.log2()
}

/// Shannon entropy of the distribution described by `counts` over `total` items.
pub fn weighted_entropy_sum(counts: impl Iterator<Item = usize>, total: usize) -> f64 {
    counts.map(|k| entropy(k, total)).sum()
}

/// Information gain of splitting the table on the given column: the action
/// entropy of the whole table minus the count-weighted action entropy of
/// each distinct-value partition.
pub fn information_gain<A: Eq + Hash>(table: &ExampleTable<A>, column: usize) -> f64 {
    let rows = table.rows_len();
    let parent = weighted_entropy_sum(
        functions::frequency(table.actions().iter()).values().copied(),
        rows,
    );

    let mut children = 0.0;
    for value in functions::distinct(table.column(column)) {
        let actions = table
            .actions()
            .iter()
            .zip(table.column(column))
            .filter(|(_, v)| *v == value)
            .map(|(action, _)| action)
            .collect::<Vec<_>>();
        let count = actions.len();
        let value_entropy = weighted_entropy_sum(
            functions::frequency(actions.into_iter()).values().copied(),
            count,
        );
        children += count as f64 / rows as f64 * value_entropy;
    }

    parent - children
}
