//! Segmark collects point annotations for two-player video segmentation and draws the masks that
//! come back.
//!
//! The pieces, in data-flow order:
//!
//! - An [`AnnotationStore`] records clicks per (frame, player, polarity)
//! - [`aggregate`] groups them by [`ChunkSet`] chunk into a [`MarkerInput`] and checks readiness
//! - A [`SegmentationService`] turns markers into run-length encoded [`SegmentationMask`]s
//! - [`decode`] and the [`OverlayCompositor`] draw those masks beneath the marker glyphs
//!
//! [`AnnotationSession`] wires them together for one video at a time.
#![forbid(unsafe_code)]

mod foundation;

/// Per-frame point annotations and the mutable store.
pub mod annotation;
/// Chunk sets and marker aggregation.
pub mod chunk;
/// RLE mask codec.
pub mod mask;
/// Mask and marker overlay rendering.
pub mod overlay;
/// Segmentation service boundary.
pub mod service;
/// Single-video annotation session.
pub mod session;

pub use crate::foundation::core::{FrameIndex, PlayerId, Point, Polarity, Rgba, Viewport};
pub use crate::foundation::error::{SegmarkError, SegmarkResult};

pub use crate::annotation::frame::{FrameAnnotation, MarkerRef};
pub use crate::annotation::store::{
    AnnotationCollection, AnnotationStore, Selection, StoreEvent, SubscriptionId,
};
pub use crate::chunk::aggregate::{Aggregation, MarkerInput, MarkerRecord, aggregate};
pub use crate::chunk::set::{Chunk, ChunkSet, FrameInterval};
pub use crate::mask::raster::{rasterize, rasterize_bits};
pub use crate::mask::rle::{
    Bitmap, SegmentationMask, decode, encode, parse_counts, scale_mask, try_decode,
};
pub use crate::overlay::compositor::{ClickOutcome, MaskLayers, OverlayCompositor, hit_test};
pub use crate::overlay::frame::FrameRGBA;
pub use crate::overlay::style::{MaskScaling, OverlayStyle};
pub use crate::overlay::text::LabelFont;
pub use crate::service::{
    InMemoryService, JobState, RecordedRequest, SegmentationResult, SegmentationService,
    SegmentationStatus,
};
pub use crate::session::AnnotationSession;
