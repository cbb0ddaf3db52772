//! Live sliding-window charts.
//!
//! [`StreamingChartSet`] keeps the most recent samples of every charted
//! metric and keeps a [`ChartSurface`] in step with them. It is an owned
//! value: each view creates its own, there is no shared chart registry.
//!
//! # Window semantics
//!
//! `append` evicts only when a chart already holds *more* than `window`
//! points, so a full chart settles at `window + 1` points. Seed history is
//! loaded as-is and never trimmed, even when it is longer than the window.

mod layout;
mod series;
mod surface;

pub use layout::{ChartSpec, Metric, SeriesSpec};
pub use series::{Chart, ChartSet, Series};
pub use surface::{ChartSurface, LogSurface, RedrawTracker};

use crate::core::config::validate_layout;
use crate::core::{LiveboardError, Result, Sample};
use std::path::Path;

/// Charts fed by a live sample stream
#[derive(Debug)]
pub struct StreamingChartSet<S> {
    window: usize,
    charts: ChartSet,
    surface: S,
}

impl<S: ChartSurface> StreamingChartSet<S> {
    /// Mount every chart of `layout` on `surface` and load optional seed history.
    pub fn initialize(
        layout: Vec<ChartSpec>,
        window: usize,
        mut surface: S,
        seed: Option<&[Sample]>,
    ) -> Result<Self> {
        if window == 0 {
            return Err(LiveboardError::config("window must be greater than 0"));
        }
        validate_layout(&layout)?;

        for spec in &layout {
            surface.mount(spec)?;
        }

        let mut set = Self {
            window,
            charts: ChartSet::from_layout(layout),
            surface,
        };

        if let Some(seed) = seed {
            set.load_seed(seed);
        }

        Ok(set)
    }

    fn load_seed(&mut self, seed: &[Sample]) {
        let mut ordered: Vec<&Sample> = seed.iter().collect();
        ordered.sort_by_key(|s| s.timestamp);

        for chart in self.charts.iter_mut() {
            for sample in &ordered {
                let values = chart.push_sample(sample);
                self.surface.push_point(chart.name(), sample.timestamp, &values);
            }
            self.surface.redraw(chart.name());
        }

        if seed.len() > self.window {
            tracing::debug!(
                "Seed history holds {} samples, more than the window of {}",
                seed.len(),
                self.window
            );
        }
    }

    /// Add one sample to every chart, evicting the oldest point of a full chart first.
    pub fn append(&mut self, sample: &Sample) {
        for chart in self.charts.iter_mut() {
            if chart.len() > self.window {
                chart.evict_oldest();
                self.surface.evict_oldest(chart.name());
            }
            let values = chart.push_sample(sample);
            self.surface.push_point(chart.name(), sample.timestamp, &values);
            self.surface.redraw(chart.name());
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn charts(&self) -> &ChartSet {
        &self.charts
    }

    pub fn chart(&self, name: &str) -> Option<&Chart> {
        self.charts.get(name)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

/// Read seed history: a JSON array of stats messages.
pub async fn load_seed(path: &Path) -> Result<Vec<Sample>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        LiveboardError::config(format!("Failed to read seed file {:?}: {}", path, e))
    })?;
    let samples = Sample::history_from_json(&content)?;
    tracing::info!("Loaded {} seed samples from {:?}", samples.len(), path);
    Ok(samples)
}
