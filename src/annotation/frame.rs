use crate::foundation::core::{PlayerId, Point, Polarity};
use serde::{Deserialize, Serialize};

/// Point annotations of a single frame, one ordered sequence per (player, polarity).
///
/// Insertion order is preserved end-to-end: it is the order points appear in the outgoing
/// marker payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnnotation {
    /// Player 1 include points.
    #[serde(default)]
    pub player1_positive: Vec<Point>,
    /// Player 1 exclude points.
    #[serde(default)]
    pub player1_negative: Vec<Point>,
    /// Player 2 include points.
    #[serde(default)]
    pub player2_positive: Vec<Point>,
    /// Player 2 exclude points.
    #[serde(default)]
    pub player2_negative: Vec<Point>,
}

/// A marker located inside a [`FrameAnnotation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerRef {
    /// Owning player.
    pub player: PlayerId,
    /// Marker polarity.
    pub polarity: Polarity,
    /// Position within its sequence.
    pub index: usize,
    /// Annotated coordinate.
    pub point: Point,
}

impl FrameAnnotation {
    /// Borrow the sequence for `(player, polarity)`.
    pub fn points(&self, player: PlayerId, polarity: Polarity) -> &[Point] {
        match (player, polarity) {
            (PlayerId::One, Polarity::Positive) => &self.player1_positive,
            (PlayerId::One, Polarity::Negative) => &self.player1_negative,
            (PlayerId::Two, Polarity::Positive) => &self.player2_positive,
            (PlayerId::Two, Polarity::Negative) => &self.player2_negative,
        }
    }

    pub(crate) fn points_mut(&mut self, player: PlayerId, polarity: Polarity) -> &mut Vec<Point> {
        match (player, polarity) {
            (PlayerId::One, Polarity::Positive) => &mut self.player1_positive,
            (PlayerId::One, Polarity::Negative) => &mut self.player1_negative,
            (PlayerId::Two, Polarity::Positive) => &mut self.player2_positive,
            (PlayerId::Two, Polarity::Negative) => &mut self.player2_negative,
        }
    }

    /// `true` when all four sequences are empty.
    pub fn is_empty(&self) -> bool {
        self.player1_positive.is_empty()
            && self.player1_negative.is_empty()
            && self.player2_positive.is_empty()
            && self.player2_negative.is_empty()
    }

    /// Total number of points across all sequences.
    pub fn len(&self) -> usize {
        self.player1_positive.len()
            + self.player1_negative.len()
            + self.player2_positive.len()
            + self.player2_negative.len()
    }

    /// `true` when `player` has at least one positive point on this frame.
    pub fn has_positive(&self, player: PlayerId) -> bool {
        !self.points(player, Polarity::Positive).is_empty()
    }

    /// Iterate all markers: player 1 positives, player 1 negatives, then player 2 likewise.
    pub fn markers(&self) -> impl Iterator<Item = MarkerRef> + '_ {
        PlayerId::ALL.into_iter().flat_map(move |player| {
            Polarity::ALL.into_iter().flat_map(move |polarity| {
                self.points(player, polarity)
                    .iter()
                    .enumerate()
                    .map(move |(index, &point)| MarkerRef {
                        player,
                        polarity,
                        index,
                        point,
                    })
            })
        })
    }
}
