//! Outbound half of the field view: debounced pointer reporting.

use crate::core::Position;

/// The rectangle pointer positions must fall in, in field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    /// Extent of the y axis
    pub height: f64,
    /// Extent of the x axis
    pub width: f64,
}

impl FieldBounds {
    pub const fn new(height: f64, width: f64) -> Self {
        Self { height, width }
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0.0..=self.height).contains(&pos.y) && (0.0..=self.width).contains(&pos.x)
    }
}

/// Tracks the local target and the last position sent upstream.
#[derive(Debug, Clone)]
pub struct PositionSync {
    bounds: FieldBounds,
    target: Option<Position>,
    last_sent: Option<Position>,
}

impl PositionSync {
    pub fn new(bounds: FieldBounds) -> Self {
        Self {
            bounds,
            target: None,
            last_sent: None,
        }
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    pub fn target(&self) -> Option<Position> {
        self.target
    }

    pub fn last_sent(&self) -> Option<Position> {
        self.last_sent
    }

    /// Record a pointer position. Positions outside the field are ignored;
    /// returns whether the target was taken.
    pub fn update_target(&mut self, pos: Position) -> bool {
        if !self.bounds.contains(pos) {
            return false;
        }
        self.target = Some(pos);
        true
    }

    /// Called once per send interval; returns the position to send, if it
    /// changed since the last send.
    pub fn tick(&mut self) -> Option<Position> {
        let target = self.target?;
        if self.last_sent == Some(target) {
            return None;
        }
        self.last_sent = Some(target);
        Some(target)
    }

    /// Forget what was sent so the next tick announces the current target
    /// again, e.g. after the channel reconnected.
    pub fn reset_last_sent(&mut self) {
        self.last_sent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync() -> PositionSync {
        PositionSync::new(FieldBounds::new(800.0, 400.0))
    }

    #[test]
    fn test_no_send_without_input() {
        let mut sync = sync();
        assert_eq!(sync.tick(), None);
    }

    #[test]
    fn test_identical_targets_send_once() {
        let mut sync = sync();
        sync.update_target(Position::new(10.0, 20.0));
        assert_eq!(sync.tick(), Some(Position::new(10.0, 20.0)));
        sync.update_target(Position::new(10.0, 20.0));
        assert_eq!(sync.tick(), None);
        assert_eq!(sync.tick(), None);
    }

    #[test]
    fn test_distinct_targets_each_send() {
        let mut sync = sync();
        let mut sent = 0;
        for i in 0..25 {
            sync.update_target(Position::new(f64::from(i), 5.0));
            if sync.tick().is_some() {
                sent += 1;
            }
        }
        assert_eq!(sent, 25);
    }

    #[test]
    fn test_only_latest_target_between_ticks_is_sent() {
        let mut sync = sync();
        sync.update_target(Position::new(1.0, 1.0));
        sync.update_target(Position::new(2.0, 2.0));
        assert_eq!(sync.tick(), Some(Position::new(2.0, 2.0)));
    }

    #[test]
    fn test_outside_positions_are_ignored() {
        let mut sync = sync();
        assert!(sync.update_target(Position::new(100.0, 100.0)));
        assert!(!sync.update_target(Position::new(801.0, 100.0)));
        assert!(!sync.update_target(Position::new(100.0, -1.0)));
        assert_eq!(sync.target(), Some(Position::new(100.0, 100.0)));
    }

    #[test]
    fn test_edges_are_inside() {
        let mut sync = sync();
        assert!(sync.update_target(Position::new(0.0, 0.0)));
        assert!(sync.update_target(Position::new(800.0, 400.0)));
    }

    #[test]
    fn test_reset_resends_current_target() {
        let mut sync = sync();
        sync.update_target(Position::new(5.0, 5.0));
        assert!(sync.tick().is_some());
        assert!(sync.tick().is_none());
        sync.reset_last_sent();
        assert_eq!(sync.tick(), Some(Position::new(5.0, 5.0)));
    }
}
