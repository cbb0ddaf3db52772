//! Wire-level domain types shared by the chart and field views.
//!
//! Every inbound message is decoded here, at the ingestion boundary, into one
//! canonical shape. Historical field names are accepted as serde aliases:
//!
//! | canonical      | historical alias |
//! |----------------|------------------|
//! | `mem`          | `memory_sys`     |
//! | `mem_proc`     | `memory`         |

use crate::core::{LiveboardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One timestamped status snapshot of the monitored process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// When the snapshot was taken
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    /// Global CPU usage in percent
    pub cpu: f64,
    /// Process CPU usage in percent, normalized over all cores
    #[serde(rename = "cpu_proc")]
    pub cpu_process: f64,
    /// Used system memory in MB
    #[serde(rename = "mem", alias = "memory_sys")]
    pub memory_system: u64,
    /// Process memory in MB
    #[serde(rename = "mem_proc", alias = "memory")]
    pub memory_process: u64,
    /// Alive runtime tasks
    #[serde(rename = "tasks")]
    pub task_count: u64,
    /// Blocking (sync) threads of the runtime
    #[serde(rename = "sync_threads")]
    pub sync_thread_count: u64,
    /// Keys in the backing Redis db0
    #[serde(rename = "keys")]
    pub key_count: u64,
}

impl Sample {
    /// Decode one stats stream message.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| LiveboardError::decode("stats sample", e.to_string()))
    }

    /// Decode a JSON array of stats messages, as used for seed history.
    pub fn history_from_json(text: &str) -> Result<Vec<Self>> {
        serde_json::from_str(text)
            .map_err(|e| LiveboardError::decode("stats history", e.to_string()))
    }
}

/// A point on the field. Serialized as `[y, x]`, y first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Position {
    /// Coordinate along the long axis of the field
    pub y: f64,
    /// Coordinate along the short axis of the field
    pub x: f64,
}

impl Position {
    /// Position at `y` along the field and `x` across it.
    ///
    /// ```
    /// use liveboard_lib::core::Position;
    ///
    /// let target = Position::new(120.0, 35.5);
    /// assert_eq!(target.to_frame().unwrap(), "[120.0,35.5]");
    /// ```
    pub const fn new(y: f64, x: f64) -> Self {
        Self { y, x }
    }

    /// Text frame sent upstream: a bare `[y, x]` array.
    pub fn to_frame(self) -> Result<String> {
        Ok(serde_json::to_string(&self)?)
    }
}

impl From<(f64, f64)> for Position {
    fn from((y, x): (f64, f64)) -> Self {
        Self { y, x }
    }
}

impl From<Position> for (f64, f64) {
    fn from(pos: Position) -> Self {
        (pos.y, pos.x)
    }
}

/// Authoritative positions broadcast by the field simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    /// The tracked entity
    pub ball: Position,
    /// Every other live entity keyed by id
    pub players: BTreeMap<String, Position>,
}

impl FieldSnapshot {
    /// Decode one field stream message.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| LiveboardError::decode("field snapshot", e.to_string()))
    }
}
