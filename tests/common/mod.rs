//! Common test utilities and fixtures.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use liveboard_lib::core::Sample;

/// Test fixture builder for stats samples with sensible defaults.
pub struct TestSampleBuilder {
    second: i64,
    tasks: u64,
    cpu: f64,
    memory_system: u64,
}

impl TestSampleBuilder {
    /// Sample taken `second` seconds after the test epoch.
    pub fn new(second: i64) -> Self {
        Self {
            second,
            tasks: 4,
            cpu: 12.5,
            memory_system: 2048,
        }
    }

    pub fn tasks(mut self, tasks: u64) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn cpu(mut self, cpu: f64) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn build(self) -> Sample {
        Sample {
            timestamp: at(self.second),
            cpu: self.cpu,
            cpu_process: self.cpu / 10.0,
            memory_system: self.memory_system,
            memory_process: 64,
            task_count: self.tasks,
            sync_thread_count: 1,
            key_count: 100,
        }
    }

    /// The sample as the server would send it.
    pub fn to_json(self) -> String {
        serde_json::to_string(&self.build()).unwrap()
    }
}

/// Test epoch plus `second` seconds.
pub fn at(second: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(second)
}

/// `count` consecutive one-second samples starting at `first`.
pub fn samples(first: i64, count: i64) -> Vec<Sample> {
    (first..first + count)
        .map(|s| TestSampleBuilder::new(s).tasks(s as u64).build())
        .collect()
}
