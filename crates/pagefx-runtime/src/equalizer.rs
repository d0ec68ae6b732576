//! Row height equalizer.
//!
//! For every container matching [`EqualizerConfig::container_selector`], the
//! content blocks inside it that sit on the same visual row are forced to the
//! tallest natural height in that row. Blocks on different rows are sized
//! independently.
//!
//! # Pass
//!
//! 1. Gather the container's content blocks in document order.
//! 2. Clear any forced `height` so natural flow is measured.
//! 3. Read each block's top edge, rounded to whole pixels.
//! 4. Partition the blocks into rows (see [`RowGrouping`]).
//! 5. Write the row's maximum border-box height to every member.
//!
//! Clearing before measuring makes a pass idempotent: running it twice on an
//! unchanged layout writes the same heights.
//!
//! # Scheduling
//!
//! The host runs a pass once after load via [`RowEqualizer::equalize`].
//! Resizes go through [`RowEqualizer::on_resize_at`], which (re)arms the
//! owned [`Debouncer`]; [`RowEqualizer::tick_at`] runs the pass once the
//! debounce delay has elapsed since the last resize.

#![forbid(unsafe_code)]

use core::time::Duration;

use pagefx_core::dom::PageDom;
use pagefx_core::geometry::format_px;
use tracing::{debug, debug_span};

use crate::config::EqualizerConfig;
use crate::debounce::{DebounceAction, Debouncer};

/// How content blocks are partitioned into visual rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum RowGrouping {
    /// Walk blocks in document order; a new row starts whenever the rounded
    /// top differs from the previous block's. Assumes row-major flow.
    #[default]
    Adjacent,
    /// Stable-sort blocks by rounded top, then cluster equal tops. Tolerates
    /// layouts whose document order is not row-major.
    SortCluster,
}

impl RowGrouping {
    /// Parse a strategy name (`adjacent`, `sort-cluster`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "adjacent" => Some(Self::Adjacent),
            "sort-cluster" | "sort_cluster" | "sortcluster" => Some(Self::SortCluster),
            _ => None,
        }
    }

    /// Stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adjacent => "adjacent",
            Self::SortCluster => "sort-cluster",
        }
    }
}

/// Partition block indices into rows by rounded top coordinate.
///
/// Returns groups of indices into `tops`. Each group is non-empty and every
/// index appears exactly once.
#[must_use]
pub fn group_rows(tops: &[i64], grouping: RowGrouping) -> Vec<Vec<usize>> {
    let order: Vec<usize> = match grouping {
        RowGrouping::Adjacent => (0..tops.len()).collect(),
        RowGrouping::SortCluster => {
            let mut order: Vec<usize> = (0..tops.len()).collect();
            order.sort_by_key(|&i| tops[i]);
            order
        }
    };

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut last_top: Option<i64> = None;
    for index in order {
        let top = tops[index];
        match groups.last_mut() {
            Some(group) if last_top == Some(top) => group.push(index),
            _ => groups.push(vec![index]),
        }
        last_top = Some(top);
    }
    groups
}

/// Outcome of one equalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EqualizeReport {
    /// Containers that held at least one content block.
    pub containers: usize,
    /// Containers skipped because they held no content blocks.
    pub skipped: usize,
    /// Content blocks assigned a height.
    pub blocks: usize,
    /// Rows formed across all containers.
    pub rows: usize,
}

/// Row height equalizer with an owned resize debouncer.
#[derive(Debug, Clone)]
pub struct RowEqualizer {
    config: EqualizerConfig,
    debouncer: Debouncer,
    passes: u64,
}

impl RowEqualizer {
    /// Create an equalizer.
    #[must_use]
    pub fn new(config: EqualizerConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce_delay());
        Self {
            config,
            debouncer,
            passes: 0,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EqualizerConfig {
        &self.config
    }

    /// Resize debouncer.
    #[must_use]
    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Number of passes run so far.
    #[must_use]
    pub const fn passes(&self) -> u64 {
        self.passes
    }

    /// Run one equalization pass over every container.
    pub fn equalize<D: PageDom>(&mut self, dom: &mut D) -> EqualizeReport {
        let _span = debug_span!("equalize", grouping = self.config.grouping.as_str()).entered();
        let mut report = EqualizeReport::default();

        for container in dom.query_selector_all(&self.config.container_selector) {
            let blocks = dom.query_within(&container, &self.config.content_selector);
            if blocks.is_empty() {
                report.skipped += 1;
                continue;
            }
            report.containers += 1;

            for block in &blocks {
                dom.remove_style(block, "height");
            }

            let tops: Vec<i64> = blocks
                .iter()
                .map(|block| dom.bounding_rect(block).rounded_top())
                .collect();
            let rows = group_rows(&tops, self.config.grouping);
            report.rows += rows.len();

            for row in rows {
                let tallest = row
                    .iter()
                    .map(|&i| dom.offset_height(&blocks[i]))
                    .fold(0.0_f64, f64::max);
                let value = format_px(tallest);
                for &i in &row {
                    dom.set_style(&blocks[i], "height", &value);
                }
                report.blocks += row.len();
            }
        }

        self.passes += 1;
        debug!(
            containers = report.containers,
            skipped = report.skipped,
            blocks = report.blocks,
            rows = report.rows,
            "equalize pass complete"
        );
        report
    }

    /// Record a resize at `now`, (re)arming the debounce timer.
    pub fn on_resize_at(&mut self, now: Duration) -> DebounceAction {
        self.debouncer.handle_event_at(now)
    }

    /// Run the debounced pass if it is due at `now`.
    pub fn tick_at<D: PageDom>(&mut self, dom: &mut D, now: Duration) -> Option<EqualizeReport> {
        match self.debouncer.tick_at(now) {
            DebounceAction::Fire { coalesced, waited } => {
                debug!(coalesced, waited_ms = waited.as_millis() as u64, "resize burst settled");
                Some(self.equalize(dom))
            }
            DebounceAction::None | DebounceAction::Scheduled { .. } => None,
        }
    }

    /// Deadline of the pending debounced pass, if any.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }
}
