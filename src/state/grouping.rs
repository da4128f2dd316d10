//! Category projection of the collection

use indexmap::IndexMap;

use super::{Category, Timer};

/// Timers keyed by category
///
/// Categories appear in the order their first timer appears in the
/// collection; timers keep their collection order inside each group.
pub type GroupedView = IndexMap<Category, Vec<Timer>>;

pub fn group_by_category(timers: &[Timer]) -> GroupedView {
    let mut groups = GroupedView::new();
    for timer in timers {
        groups.entry(timer.category).or_default().push(timer.clone());
    }
    groups
}
