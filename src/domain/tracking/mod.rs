//! Order tracking is derived data:
//!
//! 1. Tracking rows are append-only, one per line per status change
//! 2. The summary is rebuilt from rows on every read
//! 3. A line shows exactly four stages; cancellation is a flag, not a stage

pub mod aggregation;
pub mod entity;

pub use aggregation::build_tracking;
pub use entity::{stage_label, OrderTracking, TrackingRow, TrackingStage, TRACKING_STAGES};
