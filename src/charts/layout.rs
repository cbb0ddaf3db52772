//! Chart layout: which metrics are drawn together on which chart.

use crate::core::Sample;
use serde::{Deserialize, Serialize};

/// A single value extracted from a [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cpu,
    CpuProcess,
    MemorySystem,
    MemoryProcess,
    TaskCount,
    SyncThreadCount,
    KeyCount,
}

impl Metric {
    /// Read this metric out of a sample.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self, sample: &Sample) -> f64 {
        match self {
            Metric::Cpu => sample.cpu,
            Metric::CpuProcess => sample.cpu_process,
            Metric::MemorySystem => sample.memory_system as f64,
            Metric::MemoryProcess => sample.memory_process as f64,
            Metric::TaskCount => sample.task_count as f64,
            Metric::SyncThreadCount => sample.sync_thread_count as f64,
            Metric::KeyCount => sample.key_count as f64,
        }
    }
}

/// One line on a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Legend label
    pub label: String,
    /// Metric plotted by this line
    pub metric: Metric,
}

/// One chart and the series drawn on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Unique chart name, used as the mount point id
    pub name: String,
    /// Title shown above the chart
    pub title: String,
    /// Unit of the y axis
    #[serde(default)]
    pub unit: String,
    /// Fixed upper bound of the y axis; scaled to the data when unset
    #[serde(default)]
    pub y_max: Option<f64>,
    /// Lines drawn on this chart
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    pub fn new(name: impl Into<String>, title: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            unit: unit.into(),
            y_max: None,
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, label: impl Into<String>, metric: Metric) -> Self {
        self.series.push(SeriesSpec {
            label: label.into(),
            metric,
        });
        self
    }

    pub fn with_y_max(mut self, y_max: f64) -> Self {
        self.y_max = Some(y_max);
        self
    }

    /// Tasks, CPU and memory charts, two lines each.
    pub fn default_layout() -> Vec<ChartSpec> {
        vec![
            ChartSpec::new("tasks", "Tasks", "#")
                .with_series("Tasks", Metric::TaskCount)
                .with_series("Sync Threads", Metric::SyncThreadCount),
            ChartSpec::new("cpu", "CPU", "%")
                .with_series("CPU System", Metric::Cpu)
                .with_series("CPU Process", Metric::CpuProcess)
                .with_y_max(100.0),
            ChartSpec::new("mem", "Memory", "MB")
                .with_series("System Memory", Metric::MemorySystem)
                .with_series("Process Memory", Metric::MemoryProcess),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_shape() {
        let layout = ChartSpec::default_layout();
        let names: Vec<&str> = layout.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["tasks", "cpu", "mem"]);
        assert!(layout.iter().all(|c| c.series.len() == 2));
        assert_eq!(layout[1].y_max, Some(100.0));
    }

    #[test]
    fn test_layout_from_yaml() {
        let yaml = r#"
- name: keys
  title: Redis Keys
  series:
    - label: Keys
      metric: key_count
"#;
        let layout: Vec<ChartSpec> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(layout[0].series[0].metric, Metric::KeyCount);
        assert_eq!(layout[0].unit, "");
        assert_eq!(layout[0].y_max, None);
    }
}
