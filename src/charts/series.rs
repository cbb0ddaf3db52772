//! Series storage for the sliding-window charts.

use super::layout::{ChartSpec, Metric, SeriesSpec};
use crate::core::Sample;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Ordered `(timestamp, value)` pairs of one metric.
#[derive(Debug, Clone)]
pub struct Series {
    label: String,
    metric: Metric,
    points: VecDeque<(DateTime<Utc>, f64)>,
}

impl Series {
    fn from_spec(spec: &SeriesSpec) -> Self {
        Self {
            label: spec.label.clone(),
            metric: spec.metric,
            points: VecDeque::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points from oldest to newest
    pub fn points(&self) -> impl Iterator<Item = &(DateTime<Utc>, f64)> {
        self.points.iter()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|(ts, _)| *ts)
    }

    pub fn latest(&self) -> Option<f64> {
        self.points.back().map(|(_, v)| *v)
    }

    /// Largest value currently in the window
    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|(_, v)| *v).reduce(f64::max)
    }
}

/// Series sharing one timestamp axis.
///
/// All mutation goes through [`Chart::push_sample`] and
/// [`Chart::evict_oldest`], which touch every series together, so lengths and
/// timestamp sequences never diverge.
#[derive(Debug, Clone)]
pub struct Chart {
    spec: ChartSpec,
    series: Vec<Series>,
}

impl Chart {
    pub fn from_spec(spec: ChartSpec) -> Self {
        let series = spec.series.iter().map(Series::from_spec).collect();
        Self { spec, series }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Number of points on the shared axis
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, Series::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one point to every series; returns the values pushed, in series order.
    pub fn push_sample(&mut self, sample: &Sample) -> Vec<f64> {
        self.series
            .iter_mut()
            .map(|series| {
                let value = series.metric.value(sample);
                series.points.push_back((sample.timestamp, value));
                value
            })
            .collect()
    }

    /// Drop the oldest point of every series; returns its timestamp.
    pub fn evict_oldest(&mut self) -> Option<DateTime<Utc>> {
        let mut evicted = None;
        for series in &mut self.series {
            evicted = series.points.pop_front().map(|(ts, _)| ts);
        }
        evicted
    }

    /// Oldest and newest timestamp on the axis
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.series.first()?;
        Some((first.points.front()?.0, first.points.back()?.0))
    }

    /// Upper y bound: the configured maximum or the largest value in the window
    pub fn y_max(&self) -> f64 {
        self.spec.y_max.unwrap_or_else(|| {
            self.series
                .iter()
                .filter_map(Series::max_value)
                .fold(0.0, f64::max)
        })
    }
}

/// Charts keyed by name, kept in layout order.
#[derive(Debug, Clone, Default)]
pub struct ChartSet {
    charts: Vec<Chart>,
}

impl ChartSet {
    pub fn from_layout(layout: Vec<ChartSpec>) -> Self {
        Self {
            charts: layout.into_iter().map(Chart::from_spec).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        self.charts.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chart> {
        self.charts.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
