//! Rendering surfaces the chart set drives.

use super::layout::ChartSpec;
use crate::core::{LiveboardError, Result};
use chrono::{DateTime, Utc};

/// Something that displays charts.
///
/// The chart set mounts every chart once, then mirrors each window change
/// into the surface and asks for a redraw after every append.
pub trait ChartSurface {
    /// Claim the display area for one chart. Failing here is fatal.
    fn mount(&mut self, chart: &ChartSpec) -> Result<()>;

    /// A new point was appended to every series of `chart`.
    fn push_point(&mut self, chart: &str, timestamp: DateTime<Utc>, values: &[f64]);

    /// The oldest point was dropped from every series of `chart`.
    fn evict_oldest(&mut self, chart: &str);

    /// `chart` changed and should be drawn again.
    fn redraw(&mut self, chart: &str);
}

/// Surface used by the terminal UI.
///
/// The terminal draws straight from the chart set, so this only keeps the
/// pane assignment and a dirty flag the event loop consumes.
#[derive(Debug)]
pub struct RedrawTracker {
    panes: usize,
    mounted: Vec<String>,
    dirty: bool,
    redraws: u64,
}

impl RedrawTracker {
    /// A tracker with room for `panes` charts.
    pub fn new(panes: usize) -> Self {
        Self {
            panes,
            mounted: Vec::with_capacity(panes),
            dirty: false,
            redraws: 0,
        }
    }

    /// Returns whether a redraw was requested since the last call, and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Total redraw requests so far
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn mounted(&self) -> &[String] {
        &self.mounted
    }
}

impl ChartSurface for RedrawTracker {
    fn mount(&mut self, chart: &ChartSpec) -> Result<()> {
        if self.mounted.len() >= self.panes {
            return Err(LiveboardError::missing_mount(format!(
                "no chart pane left for '{}' ({} panes available)",
                chart.name, self.panes
            )));
        }
        self.mounted.push(chart.name.clone());
        Ok(())
    }

    fn push_point(&mut self, _chart: &str, _timestamp: DateTime<Utc>, _values: &[f64]) {}

    fn evict_oldest(&mut self, _chart: &str) {}

    fn redraw(&mut self, _chart: &str) {
        self.dirty = true;
        self.redraws += 1;
    }
}

/// Surface for headless runs: every change becomes a log line.
#[derive(Debug, Default)]
pub struct LogSurface;

impl ChartSurface for LogSurface {
    fn mount(&mut self, chart: &ChartSpec) -> Result<()> {
        tracing::debug!("Mounted chart '{}' with {} series", chart.name, chart.series.len());
        Ok(())
    }

    fn push_point(&mut self, chart: &str, timestamp: DateTime<Utc>, values: &[f64]) {
        tracing::info!(chart, %timestamp, ?values, "sample");
    }

    fn evict_oldest(&mut self, chart: &str) {
        tracing::trace!(chart, "evicted oldest point");
    }

    fn redraw(&mut self, chart: &str) {
        tracing::trace!(chart, "redraw");
    }
}
