//! Inbound half of the field view: the rendered entity set.

use crate::core::{FieldSnapshot, Position};
use std::collections::BTreeMap;

/// What one reconciliation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Entities currently on screen: the ball plus every player.
#[derive(Debug, Clone)]
pub struct FieldScene {
    ball: Position,
    players: BTreeMap<String, Position>,
}

impl FieldScene {
    /// A scene with only the ball, placed at `ball`.
    pub fn new(ball: Position) -> Self {
        Self {
            ball,
            players: BTreeMap::new(),
        }
    }

    pub fn ball(&self) -> Position {
        self.ball
    }

    pub fn players(&self) -> &BTreeMap<String, Position> {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<Position> {
        self.players.get(id).copied()
    }

    /// Make the scene match `snapshot`: move the ball, create or move every
    /// listed player, then drop players the snapshot no longer lists.
    pub fn reconcile(&mut self, snapshot: &FieldSnapshot) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        self.ball = snapshot.ball;

        for (id, pos) in &snapshot.players {
            match self.players.get_mut(id) {
                Some(current) => {
                    *current = *pos;
                    report.updated += 1;
                },
                None => {
                    self.players.insert(id.clone(), *pos);
                    report.created += 1;
                },
            }
        }

        let before = self.players.len();
        self.players.retain(|id, _| snapshot.players.contains_key(id));
        report.removed = before - self.players.len();

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(ball: (f64, f64), players: &[(&str, (f64, f64))]) -> FieldSnapshot {
        FieldSnapshot {
            ball: ball.into(),
            players: players
                .iter()
                .map(|(id, pos)| ((*id).to_string(), Position::from(*pos)))
                .collect(),
        }
    }

    #[test]
    fn test_create_update_remove() {
        let mut scene = FieldScene::new(Position::new(400.0, 200.0));

        let report = scene.reconcile(&snapshot((400.0, 200.0), &[("a", (1.0, 2.0)), ("b", (3.0, 4.0))]));
        assert_eq!(report, ReconcileReport { created: 2, updated: 0, removed: 0 });

        let report = scene.reconcile(&snapshot((400.0, 200.0), &[("b", (5.0, 6.0))]));
        assert_eq!(report, ReconcileReport { created: 0, updated: 1, removed: 1 });
        assert_eq!(scene.player("a"), None);
        assert_eq!(scene.player("b"), Some(Position::new(5.0, 6.0)));
    }

    #[test]
    fn test_empty_mapping_clears_players_but_not_ball() {
        let mut scene = FieldScene::new(Position::new(0.0, 0.0));
        scene.reconcile(&snapshot((10.0, 10.0), &[("a", (1.0, 2.0))]));
        scene.reconcile(&snapshot((11.0, 12.0), &[]));
        assert!(scene.players().is_empty());
        assert_eq!(scene.ball(), Position::new(11.0, 12.0));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let snap = snapshot((7.0, 8.0), &[("1", (1.0, 1.0)), ("2", (2.0, 2.0))]);
        let mut once = FieldScene::new(Position::new(0.0, 0.0));
        once.reconcile(&snap);
        let mut twice = once.clone();
        let report = twice.reconcile(&snap);

        assert_eq!(report.created + report.removed, 0);
        assert_eq!(once.players(), twice.players());
        assert_eq!(once.ball(), twice.ball());
    }

    #[test]
    fn test_player_named_ball_does_not_touch_tracked_entity() {
        let mut scene = FieldScene::new(Position::new(0.0, 0.0));
        scene.reconcile(&snapshot((50.0, 60.0), &[("ball", (1.0, 1.0))]));
        scene.reconcile(&snapshot((50.0, 60.0), &[]));
        assert_eq!(scene.ball(), Position::new(50.0, 60.0));
        assert!(scene.players().is_empty());
    }
}
