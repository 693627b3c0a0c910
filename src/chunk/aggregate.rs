use crate::annotation::frame::FrameAnnotation;
use crate::annotation::store::AnnotationCollection;
use crate::chunk::set::ChunkSet;
use crate::foundation::core::{FrameIndex, PlayerId, Polarity};
use serde::{Deserialize, Serialize};

/// Markers of one player on one frame, in the segmentation service's request schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    /// Annotated frame.
    pub frame_idx: FrameIndex,
    /// Player the markers describe.
    pub player_id: PlayerId,
    /// `[x, y]` pairs: positives first, then negatives.
    pub points: Vec<[f64; 2]>,
    /// A single-element list holding one label per point (`1` positive, `0` negative).
    pub labels: Vec<Vec<u8>>,
}

impl MarkerRecord {
    fn from_frame(frame: FrameIndex, player: PlayerId, ann: &FrameAnnotation) -> Self {
        let mut points = Vec::new();
        let mut labels = Vec::new();
        for polarity in Polarity::ALL {
            for p in ann.points(player, polarity) {
                points.push([p.x, p.y]);
                labels.push(polarity.label());
            }
        }
        Self {
            frame_idx: frame,
            player_id: player,
            points,
            labels: vec![labels],
        }
    }

    /// Return `true` when any label is positive.
    pub fn has_positive(&self) -> bool {
        self.labels.iter().flatten().any(|&l| l == 1)
    }
}

/// Request body for the segmentation service, indexed by chunk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerInput {
    /// `marker_input[chunk]` lists that chunk's records in frame order.
    pub marker_input: Vec<Vec<MarkerRecord>>,
}

/// Output of [`aggregate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    /// Service-ready payload.
    pub marker_input: MarkerInput,
    /// `true` when every chunk has a positive point for both players.
    pub is_valid: bool,
    coverage: Vec<[bool; 2]>,
}

impl Aggregation {
    /// Per chunk: `[player 1 has a positive point, player 2 has a positive point]`.
    pub fn coverage(&self) -> &[[bool; 2]] {
        &self.coverage
    }

    /// `(chunk, player)` pairs still lacking a positive point, in chunk then player order.
    pub fn missing(&self) -> Vec<(usize, PlayerId)> {
        let mut out = Vec::new();
        for (ci, cov) in self.coverage.iter().enumerate() {
            for player in PlayerId::ALL {
                if !cov[player.slot()] {
                    out.push((ci, player));
                }
            }
        }
        out
    }
}

/// Group annotations by chunk, reshape them into the service schema and compute readiness.
///
/// Frames outside every chunk are dropped. Frames are visited in ascending order so the output
/// is stable for a given input. Never fails: an incomplete collection yields `is_valid == false`.
#[tracing::instrument(skip_all, fields(frames = collection.len(), chunks = chunks.len()))]
pub fn aggregate(collection: &AnnotationCollection, chunks: &ChunkSet) -> Aggregation {
    let mut result: Vec<Vec<MarkerRecord>> = vec![Vec::new(); chunks.len()];
    let mut coverage = vec![[false; 2]; chunks.len()];

    let mut frames: Vec<(&FrameIndex, &FrameAnnotation)> = collection.iter().collect();
    frames.sort_unstable_by_key(|(f, _)| **f);

    for (&frame, ann) in frames {
        let Some(ci) = chunks.chunk_index_of(frame) else {
            tracing::debug!(frame = frame.0, "annotated frame is outside every chunk; dropped");
            continue;
        };
        for player in PlayerId::ALL {
            result[ci].push(MarkerRecord::from_frame(frame, player, ann));
            if ann.has_positive(player) {
                coverage[ci][player.slot()] = true;
            }
        }
    }

    let is_valid = !coverage.is_empty() && coverage.iter().all(|c| c[0] && c[1]);
    Aggregation {
        marker_input: MarkerInput {
            marker_input: result,
        },
        is_valid,
        coverage,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chunk/aggregate.rs"]
mod tests;
