//! Soccer-field position sync.
//!
//! Two independent paths share one channel: [`PositionSync`] turns pointer
//! movement into debounced `[y, x]` frames for the server, and
//! [`FieldScene`] mirrors the server's authoritative positions. The ball is
//! the tracked entity: it always exists and reconciliation never removes it.

mod scene;
mod sync;

pub use scene::{FieldScene, ReconcileReport};
pub use sync::{FieldBounds, PositionSync};
