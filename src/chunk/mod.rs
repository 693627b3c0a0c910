//! Chunk partitioning of annotated frames and submission readiness.

/// Annotation -> marker payload aggregation and validation.
pub mod aggregate;
/// Chunk and frame-interval types.
pub mod set;
