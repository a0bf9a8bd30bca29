//! Layout reconciliation
//!
//! Pure functions over [`Layouts`]. Placement of new widgets only stacks them
//! below the lowest item of each breakpoint; horizontal overlap with existing
//! items is not resolved.

use tracing::{debug, info};

use crate::constants::grid::{
    NEW_ITEM_H, NEW_ITEM_MIN_H, NEW_ITEM_MIN_W, NEW_ITEM_W, SETTINGS_GUARD_KEY,
};
use crate::types::{Breakpoint, LayoutItem, Layouts};

/// First row below every item in `items` (0 for an empty list)
pub fn next_free_row(items: &[LayoutItem]) -> u32 {
    items.iter().map(LayoutItem::bottom).max().unwrap_or(0)
}

/// Left-aligned item at `row` with the default widget size
pub fn new_item(key: &str, row: u32) -> LayoutItem {
    LayoutItem::new(key, 0, row, NEW_ITEM_W, NEW_ITEM_H, NEW_ITEM_MIN_W, NEW_ITEM_MIN_H)
}

/// Append `key` below everything else in each breakpoint that lacks it
///
/// Returns the number of breakpoints that received a new item.
pub fn place_where_missing(layouts: &mut Layouts, key: &str) -> usize {
    let mut placed = 0;
    for (breakpoint, items) in layouts.0.iter_mut() {
        if items.iter().any(|item| item.key == key) {
            continue;
        }
        let row = next_free_row(items);
        items.push(new_item(key, row));
        debug!(key = %key, breakpoint = %breakpoint, y = row, "Placed widget");
        placed += 1;
    }
    placed
}

/// Append `key` below everything else in every breakpoint
pub fn place_everywhere(layouts: &mut Layouts, key: &str) {
    for (breakpoint, items) in layouts.0.iter_mut() {
        let row = next_free_row(items);
        items.push(new_item(key, row));
        debug!(key = %key, breakpoint = %breakpoint, y = row, "Placed widget");
    }
}

/// Remove every item for `key` from every breakpoint
///
/// Returns the number of items removed.
pub fn strip(layouts: &mut Layouts, key: &str) -> usize {
    let mut removed = 0;
    for items in layouts.0.values_mut() {
        let before = items.len();
        items.retain(|item| item.key != key);
        removed += before - items.len();
    }
    removed
}

fn guard_deviates(item: &LayoutItem, target: &LayoutItem) -> bool {
    item.x != target.x
        || item.y != target.y
        || item.w != target.w
        || item.h != target.h
        || item.is_static != target.is_static
}

/// Ensure the settings guard sits at its target cell in every present breakpoint
///
/// Returns `None` when `layouts` already satisfies the guard placement, so
/// callers can skip the write entirely. Breakpoints absent from `layouts`
/// are left absent.
pub fn reconcile_settings_guard(layouts: &Layouts) -> Option<Layouts> {
    let mut next: Option<Layouts> = None;

    for breakpoint in Breakpoint::ALL {
        let Some(items) = layouts.get(breakpoint) else {
            continue;
        };
        let target = LayoutItem::settings_guard(breakpoint.guard_column());

        match items.iter().position(|item| item.key == SETTINGS_GUARD_KEY) {
            None => {
                let draft = next.get_or_insert_with(|| layouts.clone());
                if let Some(list) = draft.get_mut(breakpoint) {
                    list.push(target);
                }
                info!(breakpoint = %breakpoint, "Added missing settings guard");
            }
            Some(index) if guard_deviates(&items[index], &target) => {
                let draft = next.get_or_insert_with(|| layouts.clone());
                if let Some(guard) = draft.get_mut(breakpoint).and_then(|list| list.get_mut(index)) {
                    guard.x = target.x;
                    guard.y = target.y;
                    guard.w = target.w;
                    guard.h = target.h;
                    guard.is_static = true;
                }
                info!(breakpoint = %breakpoint, x = target.x, "Corrected settings guard");
            }
            Some(_) => {}
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_layouts;
    use proptest::prelude::*;

    fn layouts_with(breakpoint: Breakpoint, items: Vec<LayoutItem>) -> Layouts {
        let mut layouts = Layouts::default();
        layouts.insert(breakpoint, items);
        layouts
    }

    #[test]
    fn test_next_free_row_empty_is_zero() {
        assert_eq!(next_free_row(&[]), 0);
    }

    #[test]
    fn test_place_where_missing_stacks_below_lowest_item() {
        let mut layouts = layouts_with(
            Breakpoint::Lg,
            vec![
                LayoutItem::new("search", 2, 0, 7, 2, 1, 2),
                LayoutItem::new("weather", 2, 2, 3, 8, 1, 2),
            ],
        );
        assert_eq!(place_where_missing(&mut layouts, "matrix"), 1);

        let placed = layouts.find(Breakpoint::Lg, "matrix").unwrap();
        assert_eq!((placed.x, placed.y, placed.w, placed.h), (0, 10, 2, 4));
        assert_eq!((placed.min_w, placed.min_h), (Some(1), Some(2)));
    }

    #[test]
    fn test_place_where_missing_only_fills_gaps() {
        let mut layouts = default_layouts();
        layouts.get_mut(Breakpoint::Sm).unwrap().retain(|i| i.key != "snake");
        let lg_before = layouts.find(Breakpoint::Lg, "snake").cloned();

        assert_eq!(place_where_missing(&mut layouts, "snake"), 1);
        assert_eq!(layouts.find(Breakpoint::Lg, "snake").cloned(), lg_before);
        assert_eq!(layouts.find(Breakpoint::Sm, "snake").unwrap().y, 22);
    }

    #[test]
    fn test_place_everywhere_skips_absent_breakpoints() {
        let mut layouts = default_layouts();
        place_everywhere(&mut layouts, "rain-1");
        assert!(layouts.find(Breakpoint::Lg, "rain-1").is_some());
        assert!(layouts.find(Breakpoint::Md, "rain-1").is_some());
        assert!(layouts.get(Breakpoint::Xs).is_none());
    }

    #[test]
    fn test_strip_removes_from_every_breakpoint() {
        let mut layouts = default_layouts();
        assert_eq!(strip(&mut layouts, "todo"), 3);
        assert!(!layouts.contains_key("todo"));
        assert_eq!(strip(&mut layouts, "todo"), 0);
    }

    #[test]
    fn test_reconcile_defaults_is_noop() {
        assert!(reconcile_settings_guard(&default_layouts()).is_none());
    }

    #[test]
    fn test_reconcile_appends_missing_guard() {
        let layouts = layouts_with(Breakpoint::Xs, vec![LayoutItem::new("search", 0, 0, 4, 2, 1, 2)]);
        let fixed = reconcile_settings_guard(&layouts).unwrap();
        let items = fixed.get(Breakpoint::Xs).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], LayoutItem::settings_guard(3));
        assert!(fixed.get(Breakpoint::Lg).is_none());
    }

    #[test]
    fn test_reconcile_corrects_guard_in_place() {
        let mut moved = LayoutItem::settings_guard(0);
        moved.y = 4;
        moved.is_static = false;
        moved.min_w = Some(1);
        let layouts = layouts_with(
            Breakpoint::Sm,
            vec![moved, LayoutItem::new("search", 0, 0, 5, 2, 2, 2)],
        );

        let fixed = reconcile_settings_guard(&layouts).unwrap();
        let guard = &fixed.get(Breakpoint::Sm).unwrap()[0];
        assert_eq!((guard.x, guard.y, guard.w, guard.h), (5, 0, 1, 1));
        assert!(guard.is_static);
        // fields outside the guard contract survive the correction
        assert_eq!(guard.min_w, Some(1));
    }

    #[test]
    fn test_reconcile_second_pass_is_noop() {
        let layouts = layouts_with(Breakpoint::Xxs, vec![]);
        let once = reconcile_settings_guard(&layouts).unwrap();
        assert!(reconcile_settings_guard(&once).is_none());
    }

    fn arb_item() -> impl Strategy<Value = LayoutItem> {
        (
            prop::sample::select(vec!["settings-guard", "search", "todo", "matrix-1"]),
            0u32..12,
            0u32..40,
            1u32..6,
            1u32..6,
            any::<bool>(),
        )
            .prop_map(|(key, x, y, w, h, is_static)| {
                let mut item = LayoutItem::new(key, x, y, w, h, 1, 2);
                item.is_static = is_static;
                item
            })
    }

    fn arb_layouts() -> impl Strategy<Value = Layouts> {
        prop::collection::btree_map(
            prop::sample::select(vec!["lg", "md", "sm", "xs", "xxs"]).prop_map(String::from),
            prop::collection::vec(arb_item(), 0..6),
            0..5,
        )
        .prop_map(Layouts)
    }

    proptest! {
        #[test]
        fn reconcile_is_idempotent(layouts in arb_layouts()) {
            let once = reconcile_settings_guard(&layouts).unwrap_or_else(|| layouts.clone());
            prop_assert!(reconcile_settings_guard(&once).is_none());
            for breakpoint in Breakpoint::ALL {
                if let Some(items) = once.get(breakpoint) {
                    let guard = items.iter().find(|i| i.key == SETTINGS_GUARD_KEY).unwrap();
                    prop_assert_eq!((guard.x, guard.y, guard.w, guard.h, guard.is_static),
                        (breakpoint.guard_column(), 0, 1, 1, true));
                }
            }
        }
    }
}
