//! Signal-coverage evaluation.

use std::collections::{BTreeMap, BTreeSet};

use premortem_core::{Coverage, SignalThread, SignalType};

/// Count signals by category and identify gaps.
///
/// Pure and idempotent: the same thread collection always produces the same
/// `Coverage`. `irrelevant` threads stay in the collection but do not count
/// toward any category. A category is a gap when its count is below
/// `min_per_type`.
#[must_use]
pub fn evaluate_coverage(signals: &[SignalThread], min_per_type: usize) -> Coverage {
    let mut counts: BTreeMap<String, usize> = SignalType::MEANINGFUL
        .iter()
        .map(|st| (st.label().to_owned(), 0))
        .collect();
    let mut competitors: BTreeSet<String> = BTreeSet::new();

    for signal in signals {
        if signal.signal_type != SignalType::Irrelevant {
            if let Some(count) = counts.get_mut(signal.signal_type.label()) {
                *count += 1;
            }
        }
        for product in &signal.competing_products {
            competitors.insert(product.clone());
        }
    }

    let gaps: Vec<String> = SignalType::MEANINGFUL
        .iter()
        .filter_map(|st| {
            let count = counts.get(st.label()).copied().unwrap_or(0);
            (count < min_per_type)
                .then(|| format!("{} ({count} found, need {min_per_type})", st.label()))
        })
        .collect();

    let has_gaps = !gaps.is_empty();
    Coverage {
        counts,
        competitors: competitors.into_iter().collect(),
        gaps,
        has_gaps,
    }
}
