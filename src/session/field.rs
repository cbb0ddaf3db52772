//! Field viewer state.

use crate::core::{FieldSnapshot, Position, Result};
use crate::field::{FieldBounds, FieldScene, PositionSync, ReconcileReport};
use crate::stream::{ConnectionStatus, StreamEvent};

/// Scene, pointer sync and connection state of the field view.
#[derive(Debug)]
pub struct FieldSession {
    scene: FieldScene,
    sync: PositionSync,
    status: ConnectionStatus,
    received: u64,
    rejected: u64,
}

impl FieldSession {
    /// The ball starts at the center of `bounds` until the first snapshot.
    pub fn new(bounds: FieldBounds) -> Self {
        Self {
            scene: FieldScene::new(Position::new(bounds.height / 2.0, bounds.width / 2.0)),
            sync: PositionSync::new(bounds),
            status: ConnectionStatus::Connecting,
            received: 0,
            rejected: 0,
        }
    }

    /// Apply one channel event. Malformed snapshots are logged and counted.
    pub fn handle(&mut self, event: &StreamEvent) {
        self.status.observe(event);
        match event {
            // A new connection is a new player server-side
            StreamEvent::Connected => self.sync.reset_last_sent(),
            StreamEvent::Message(text) => {
                if let Err(e) = self.ingest(text) {
                    tracing::warn!("Rejected field message: {}", e);
                }
            },
            _ => {},
        }
    }

    /// Decode one snapshot and reconcile the scene against it.
    pub fn ingest(&mut self, text: &str) -> Result<ReconcileReport> {
        self.received += 1;
        let snapshot = match FieldSnapshot::from_json(text) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.rejected += 1;
                return Err(e);
            },
        };
        let report = self.scene.reconcile(&snapshot);
        if report.created > 0 || report.removed > 0 {
            tracing::debug!(
                "Field now has {} players (+{} -{})",
                self.scene.players().len(),
                report.created,
                report.removed
            );
        }
        Ok(report)
    }

    /// Pointer moved to `pos` in field coordinates.
    pub fn pointer(&mut self, pos: Position) -> bool {
        self.sync.update_target(pos)
    }

    /// Frame to send this interval, if the target moved.
    pub fn tick(&mut self) -> Result<Option<String>> {
        self.sync.tick().map(Position::to_frame).transpose()
    }

    pub fn scene(&self) -> &FieldScene {
        &self.scene
    }

    pub fn sync(&self) -> &PositionSync {
        &self.sync
    }

    pub fn bounds(&self) -> FieldBounds {
        self.sync.bounds()
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
