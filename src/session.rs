//! One annotation session over one video: store, chunks, masks and overlay wired together.

use std::collections::HashMap;

use crate::annotation::store::AnnotationStore;
use crate::chunk::aggregate::{Aggregation, aggregate};
use crate::chunk::set::ChunkSet;
use crate::foundation::core::{FrameIndex, Point, Viewport};
use crate::foundation::error::{SegmarkError, SegmarkResult};
use crate::overlay::compositor::{ClickOutcome, MaskLayers, OverlayCompositor};
use crate::overlay::frame::FrameRGBA;
use crate::service::{SegmentationResult, SegmentationService};

/// Annotation state for the active video.
///
/// Switching video drops every annotation and mask; nothing is shared between videos.
#[derive(Debug)]
pub struct AnnotationSession {
    video_id: String,
    chunks: ChunkSet,
    store: AnnotationStore,
    masks: HashMap<FrameIndex, SegmentationResult>,
}

impl AnnotationSession {
    pub fn new(video_id: impl Into<String>, chunks: ChunkSet) -> Self {
        Self {
            video_id: video_id.into(),
            chunks,
            store: AnnotationStore::new(),
            masks: HashMap::new(),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn chunks(&self) -> &ChunkSet {
        &self.chunks
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    /// Make `video_id` the active video. Observers see a single `AllCleared`.
    pub fn switch_video(&mut self, video_id: impl Into<String>, chunks: ChunkSet) {
        self.video_id = video_id.into();
        self.chunks = chunks;
        self.store.clear_all();
        self.masks.clear();
        tracing::debug!(video = %self.video_id, chunks = self.chunks.len(), "switched video");
    }

    /// `true` when the store's current frame lies in some chunk.
    pub fn current_frame_in_main_view(&self) -> bool {
        self.chunks.contains(self.store.current_frame())
    }

    pub fn aggregate(&self) -> Aggregation {
        aggregate(self.store.collection(), &self.chunks)
    }

    /// Send the aggregated markers to `service` and keep the returned masks by frame.
    ///
    /// Refuses with [`SegmarkError::Validation`], without calling the service, while some chunk
    /// lacks a positive point for either player. Returns the number of frames that received masks.
    #[tracing::instrument(skip_all, fields(video = %self.video_id))]
    pub fn submit(&mut self, service: &mut impl SegmentationService) -> SegmarkResult<usize> {
        let agg = self.aggregate();
        if !agg.is_valid {
            let missing = agg
                .missing()
                .into_iter()
                .map(|(ci, p)| format!("chunk {ci} player {}", p.as_u8()))
                .collect::<Vec<_>>();
            return Err(SegmarkError::validation(if missing.is_empty() {
                "no chunks to segment".to_string()
            } else {
                format!("missing positive points: {}", missing.join(", "))
            }));
        }

        let results = service.segment(&self.video_id, &agg.marker_input)?;
        let n = results.len();
        for r in results {
            self.masks.insert(r.frame_index, r);
        }
        tracing::debug!(frames = n, "stored segmentation results");
        Ok(n)
    }

    pub fn masks_for(&self, frame: FrameIndex) -> Option<&SegmentationResult> {
        self.masks.get(&frame)
    }

    /// Route a viewport click on the current frame through `compositor`.
    pub fn click(&mut self, compositor: &mut OverlayCompositor, point: Point) -> ClickOutcome {
        compositor.set_in_main_view(self.current_frame_in_main_view());
        compositor.handle_click(&mut self.store, point)
    }

    /// Render the overlay of the current frame, updating the compositor's main-view flag.
    pub fn render_current(
        &self,
        viewport: Viewport,
        compositor: &mut OverlayCompositor,
    ) -> SegmarkResult<FrameRGBA> {
        compositor.set_in_main_view(self.current_frame_in_main_view());
        let frame = self.store.current_frame();
        let masks = self
            .masks_for(frame)
            .map(SegmentationResult::layers)
            .unwrap_or_else(MaskLayers::none);
        compositor.render(self.store.current_frame_annotation(), masks, viewport)
    }
}
