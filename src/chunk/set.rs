use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SegmarkError, SegmarkResult};
use serde::{Deserialize, Serialize};

/// Inclusive frame interval `[start, end]`. Serialized as a `[start, end]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct FrameInterval {
    /// First frame (inclusive).
    pub start: FrameIndex,
    /// Last frame (inclusive).
    pub end: FrameIndex,
}

impl FrameInterval {
    /// Construct an interval without validation.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start: FrameIndex(start),
            end: FrameIndex(end),
        }
    }

    /// Return `true` when `f` is inside `[start, end]`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start <= f && f <= self.end
    }

    /// Number of frames covered.
    pub fn len_frames(self) -> u64 {
        if self.end < self.start {
            return 0;
        }
        self.end.0 - self.start.0 + 1
    }
}

impl From<[u64; 2]> for FrameInterval {
    fn from([start, end]: [u64; 2]) -> Self {
        Self::new(start, end)
    }
}

impl From<FrameInterval> for [u64; 2] {
    fn from(iv: FrameInterval) -> Self {
        [iv.start.0, iv.end.0]
    }
}

/// One usable segment of the video: a list of disjoint frame intervals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chunk {
    /// Intervals in ascending order.
    pub intervals: Vec<FrameInterval>,
}

impl Chunk {
    /// Return `true` when any interval contains `f`.
    pub fn contains(&self, f: FrameIndex) -> bool {
        self.intervals.iter().any(|iv| iv.contains(f))
    }

    /// Number of frames covered by the chunk.
    pub fn len_frames(&self) -> u64 {
        self.intervals.iter().map(|iv| iv.len_frames()).sum()
    }
}

/// Immutable chunk list for one video, as produced by the main-view preprocessing stage.
///
/// Invariant: no two intervals (within or across chunks) overlap, so a frame belongs to at most
/// one chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChunkSet {
    chunks: Vec<Chunk>,
}

impl ChunkSet {
    /// Build a validated chunk set.
    pub fn new(chunks: Vec<Chunk>) -> SegmarkResult<Self> {
        let mut all: Vec<(usize, FrameInterval)> = Vec::new();
        for (ci, chunk) in chunks.iter().enumerate() {
            for &iv in &chunk.intervals {
                if iv.start > iv.end {
                    return Err(SegmarkError::validation(format!(
                        "chunk {ci}: interval [{}, {}] has start > end",
                        iv.start, iv.end
                    )));
                }
                all.push((ci, iv));
            }
        }

        all.sort_unstable_by_key(|(_, iv)| (iv.start, iv.end));
        for w in all.windows(2) {
            let (ca, a) = w[0];
            let (cb, b) = w[1];
            if b.start <= a.end {
                return Err(SegmarkError::validation(format!(
                    "chunk {ca} interval [{}, {}] overlaps chunk {cb} interval [{}, {}]",
                    a.start, a.end, b.start, b.end
                )));
            }
        }

        Ok(Self { chunks })
    }

    /// Build a validated chunk set from raw `[[start, end], ..]` lists.
    pub fn from_ranges(chunks: Vec<Vec<[u64; 2]>>) -> SegmarkResult<Self> {
        Self::new(
            chunks
                .into_iter()
                .map(|ivs| Chunk {
                    intervals: ivs.into_iter().map(FrameInterval::from).collect(),
                })
                .collect(),
        )
    }

    /// Parse the `number[][][]` JSON form.
    pub fn from_json(s: &str) -> SegmarkResult<Self> {
        let chunks: Vec<Chunk> = serde_json::from_str(s)
            .map_err(|e| SegmarkError::serde(format!("parse chunk list JSON: {e}")))?;
        Self::new(chunks)
    }

    /// Index of the first chunk containing `f`.
    pub fn chunk_index_of(&self, f: FrameIndex) -> Option<usize> {
        self.chunks.iter().position(|c| c.contains(f))
    }

    /// Return `true` when `f` lies in any chunk (i.e. in the main view).
    pub fn contains(&self, f: FrameIndex) -> bool {
        self.chunk_index_of(f).is_some()
    }

    /// Borrow the chunks.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Return `true` when there are no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl<'de> Deserialize<'de> for ChunkSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let chunks = Vec::<Chunk>::deserialize(deserializer)?;
        Self::new(chunks).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chunk/set.rs"]
mod tests;
