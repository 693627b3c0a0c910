//! Boundary to the external segmentation service.
//!
//! The core never talks to the network. Callers implement [`SegmentationService`] over whatever
//! transport they use; retries and timeouts belong to that implementation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::chunk::aggregate::MarkerInput;
use crate::foundation::core::{FrameIndex, PlayerId};
use crate::foundation::error::{SegmarkError, SegmarkResult};
use crate::mask::rle::SegmentationMask;
use crate::overlay::compositor::MaskLayers;

/// Masks returned for one frame. Either player's mask may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationResult {
    pub frame_index: FrameIndex,
    #[serde(default)]
    pub player1_mask: Option<SegmentationMask>,
    #[serde(default)]
    pub player2_mask: Option<SegmentationMask>,
}

impl SegmentationResult {
    pub fn mask(&self, player: PlayerId) -> Option<&SegmentationMask> {
        match player {
            PlayerId::One => self.player1_mask.as_ref(),
            PlayerId::Two => self.player2_mask.as_ref(),
        }
    }

    /// Borrow both masks for the overlay compositor.
    pub fn layers(&self) -> MaskLayers<'_> {
        MaskLayers::new(self.player1_mask.as_ref(), self.player2_mask.as_ref())
    }
}

/// Job state reported by a polling service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    /// `true` once the job will not change state again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Progress report of a segmentation job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationStatus {
    pub status: JobState,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SegmentationResult>>,
}

impl SegmentationStatus {
    /// Turn a terminal status into its results.
    ///
    /// A failed job maps to [`SegmarkError::Service`] carrying the service message; a job that is
    /// still running is an error too, since it has nothing to return yet.
    pub fn into_results(self) -> SegmarkResult<Vec<SegmentationResult>> {
        match self.status {
            JobState::Completed => Ok(self.results.unwrap_or_default()),
            JobState::Failed => Err(SegmarkError::service(if self.message.is_empty() {
                "segmentation failed".to_string()
            } else {
                self.message
            })),
            JobState::Pending | JobState::Processing => Err(SegmarkError::service(format!(
                "segmentation still running ({:.0}%)",
                self.progress
            ))),
        }
    }
}

/// A segmentation backend: markers in, per-frame masks out.
pub trait SegmentationService {
    fn segment(
        &mut self,
        video_id: &str,
        input: &MarkerInput,
    ) -> SegmarkResult<Vec<SegmentationResult>>;
}

/// One request seen by [`InMemoryService`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub video_id: String,
    pub input: MarkerInput,
}

/// Service double that replays queued responses and records every request.
///
/// When the queue is empty each call returns an empty result list.
#[derive(Debug, Default)]
pub struct InMemoryService {
    responses: VecDeque<SegmarkResult<Vec<SegmentationResult>>>,
    requests: Vec<RecordedRequest>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, results: Vec<SegmentationResult>) -> Self {
        self.responses.push_back(Ok(results));
        self
    }

    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.responses
            .push_back(Err(SegmarkError::service(message.into())));
        self
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }
}

impl SegmentationService for InMemoryService {
    fn segment(
        &mut self,
        video_id: &str,
        input: &MarkerInput,
    ) -> SegmarkResult<Vec<SegmentationResult>> {
        self.requests.push(RecordedRequest {
            video_id: video_id.to_string(),
            input: input.clone(),
        });
        self.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/service.rs"]
mod tests;
