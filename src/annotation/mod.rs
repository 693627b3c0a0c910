//! Per-frame point annotations and the observable store that owns them.

/// Single-frame annotation record.
pub mod frame;
/// Mutable annotation store with synchronous observers.
pub mod store;
