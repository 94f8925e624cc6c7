use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub fn frequency<'a, T: Eq + Hash>(items: impl Iterator<Item = &'a T>) -> HashMap<&'a T, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Distinct items in first-occurrence order.
pub fn distinct<'a, T: Eq + Hash>(items: impl Iterator<Item = &'a T>) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for item in items {
        if seen.insert(item) {
            values.push(item);
        }
    }
    values
}

/// The item with the highest count; ties go to the earliest first occurrence.
pub fn most_frequent<'a, T: Eq + Hash>(
    items: impl Iterator<Item = &'a T> + Clone,
) -> Option<&'a T> {
    let counts = frequency(items.clone());
    let mut best = None;
    let mut best_count = 0;
    for item in distinct(items) {
        let count = counts[item];
        if count > best_count {
            best = Some(item);
            best_count = count;
        }
    }
    best
}
