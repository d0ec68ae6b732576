//! Property-based invariant tests for the page behaviors.
//!
//! Row grouping / equalizer (1–4):
//! 1. Grouping partitions indices: each index appears exactly once.
//! 2. Both strategies agree when blocks are laid out row-major.
//! 3. After a pass, every block in a row carries the row maximum.
//! 4. A second pass on unchanged layout writes identical heights.
//!
//! Header (5):
//! 5. The flag equals `offset > threshold` after every application.
//!
//! Sampling (6–7):
//! 6. The sample has `min(n, k)` distinct members drawn from the input.
//! 7. Identical seeds produce identical samples.
//!
//! Debounce (8–9):
//! 8. A burst with gaps shorter than the delay fires exactly once.
//! 9. The fire lands exactly `delay` after the last event.

use core::time::Duration;
use std::collections::HashSet;

use pagefx_core::dom::PageDom;
use pagefx_core::memory_dom::{ElementSpec, MemoryDom, NodeId};
use pagefx_runtime::config::{EqualizerConfig, HeaderConfig};
use pagefx_runtime::debounce::{DebounceAction, Debouncer};
use pagefx_runtime::equalizer::{RowEqualizer, RowGrouping, group_rows};
use pagefx_runtime::faq::sample;
use pagefx_runtime::header::HeaderToggle;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ── Strategies ────────────────────────────────────────────────────────────

/// Rows of natural heights; each inner vec is one visual row.
fn row_layout() -> impl Strategy<Value = Vec<Vec<u16>>> {
    proptest::collection::vec(proptest::collection::vec(1u16..=400, 1..=5), 0..=6)
}

fn tops(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(0i64..=5, 0..=max_len)
}

/// Build one `.row` container whose cards follow `rows`, 500px apart.
fn build(rows: &[Vec<u16>]) -> (MemoryDom, Vec<Vec<NodeId>>) {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let container = dom.insert(root, ElementSpec::new("div").class("row"));
    let nodes = rows
        .iter()
        .enumerate()
        .map(|(r, heights)| {
            heights
                .iter()
                .map(|&h| {
                    dom.insert(
                        container,
                        ElementSpec::new("div")
                            .class("card-content")
                            .top(r as f64 * 500.0)
                            .height(f64::from(h)),
                    )
                })
                .collect()
        })
        .collect();
    (dom, nodes)
}

fn heights(dom: &MemoryDom, rows: &[Vec<NodeId>]) -> Vec<Option<String>> {
    rows.iter()
        .flatten()
        .map(|node| dom.style(node, "height"))
        .collect()
}

// ─── 1. Grouping is a partition ───────────────────────────────────────────

proptest! {
    #[test]
    fn grouping_is_a_partition(tops in tops(30), sort in any::<bool>()) {
        let grouping = if sort { RowGrouping::SortCluster } else { RowGrouping::Adjacent };
        let groups = group_rows(&tops, grouping);
        let mut seen: Vec<usize> = groups.iter().flatten().copied().collect();
        prop_assert!(groups.iter().all(|g| !g.is_empty()));
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..tops.len()).collect::<Vec<_>>());
        for group in &groups {
            prop_assert!(group.iter().all(|&i| tops[i] == tops[group[0]]));
        }
    }
}

// ─── 2. Strategies agree on row-major input ───────────────────────────────

proptest! {
    #[test]
    fn strategies_agree_on_row_major_layout(mut tops in tops(30)) {
        tops.sort_unstable();
        prop_assert_eq!(
            group_rows(&tops, RowGrouping::Adjacent),
            group_rows(&tops, RowGrouping::SortCluster)
        );
    }
}

// ─── 3. Rows carry their maximum ──────────────────────────────────────────

proptest! {
    #[test]
    fn rows_carry_their_maximum(rows in row_layout()) {
        let (mut dom, nodes) = build(&rows);
        let report = RowEqualizer::new(EqualizerConfig::default()).equalize(&mut dom);
        prop_assert_eq!(report.rows, rows.len());
        prop_assert_eq!(report.blocks, rows.iter().map(Vec::len).sum::<usize>());

        for (heights, row_nodes) in rows.iter().zip(&nodes) {
            let tallest = heights.iter().copied().max().unwrap_or(0);
            let expected = format!("{tallest}px");
            for node in row_nodes {
                prop_assert_eq!(dom.style(node, "height"), Some(expected.clone()));
            }
        }
    }
}

// ─── 4. Passes are idempotent ─────────────────────────────────────────────

proptest! {
    #[test]
    fn equalize_is_idempotent(rows in row_layout(), sort in any::<bool>()) {
        let grouping = if sort { RowGrouping::SortCluster } else { RowGrouping::Adjacent };
        let config = EqualizerConfig { grouping, ..EqualizerConfig::default() };
        let (mut dom, nodes) = build(&rows);
        let mut equalizer = RowEqualizer::new(config);

        let first_report = equalizer.equalize(&mut dom);
        let first = heights(&dom, &nodes);
        let second_report = equalizer.equalize(&mut dom);
        prop_assert_eq!(first_report, second_report);
        prop_assert_eq!(first, heights(&dom, &nodes));
    }
}

// ─── 5. Header flag law ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn header_flag_follows_threshold(
        threshold in 0.0f64..=200.0,
        offsets in proptest::collection::vec(0.0f64..=400.0, 1..=20),
    ) {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let header = dom.insert(root, ElementSpec::new("header").class("header"));
        let config = HeaderConfig { scroll_threshold: threshold, ..HeaderConfig::default() };
        let mut toggle = HeaderToggle::attach(&dom, config);

        for offset in offsets {
            dom.set_scroll_offset(offset);
            let update = toggle.apply(&mut dom);
            prop_assert_eq!(update.active(), Some(offset > threshold));
            prop_assert_eq!(dom.has_class(&header, "is-active"), offset > threshold);
        }
    }
}

// ─── 6. Sample shape ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sample_is_distinct_subset(n in 0usize..=60, k in 1usize..=30, seed in any::<u64>()) {
        let items: Vec<usize> = (0..n).collect();
        let picked = sample(&items, k, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(picked.len(), n.min(k));
        let unique: HashSet<_> = picked.iter().collect();
        prop_assert_eq!(unique.len(), picked.len());
        prop_assert!(picked.iter().all(|p| *p < n));
    }
}

// ─── 7. Seeded determinism ────────────────────────────────────────────────

proptest! {
    #[test]
    fn sample_is_deterministic_per_seed(n in 0usize..=40, seed in any::<u64>()) {
        let items: Vec<usize> = (0..n).collect();
        let a = sample(&items, 15, &mut StdRng::seed_from_u64(seed));
        let b = sample(&items, 15, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a, b);
    }
}

// ─── 8–9. Debounce bursts ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn burst_fires_once_after_last_event(
        delay_ms in 1u64..=500,
        gaps in proptest::collection::vec(0u64..=1_000, 1..=20),
    ) {
        let mut debouncer = Debouncer::new(Duration::from_millis(delay_ms));
        let mut now = 0u64;
        let mut fires = 0u32;
        for gap in gaps {
            // Keep every gap strictly inside the window.
            now += gap % delay_ms;
            if matches!(debouncer.tick_at(Duration::from_millis(now)), DebounceAction::Fire { .. }) {
                fires += 1;
            }
            debouncer.handle_event_at(Duration::from_millis(now));
        }
        prop_assert_eq!(fires, 0);

        let last = now;
        prop_assert_eq!(debouncer.deadline(), Some(Duration::from_millis(last + delay_ms)));
        prop_assert_eq!(
            debouncer.tick_at(Duration::from_millis(last + delay_ms - 1)),
            DebounceAction::None
        );
        let fired = debouncer.tick_at(Duration::from_millis(last + delay_ms));
        prop_assert!(
            matches!(fired, DebounceAction::Fire { .. }),
            "expected fire, got {:?}", fired
        );
        prop_assert_eq!(
            debouncer.tick_at(Duration::from_millis(last + 10 * delay_ms)),
            DebounceAction::None
        );
        prop_assert!(!debouncer.has_pending());
    }
}
