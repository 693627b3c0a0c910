use std::collections::HashMap;

use crate::annotation::frame::FrameAnnotation;
use crate::foundation::core::{FrameIndex, PlayerId, Point, Polarity};

/// Frame index -> annotation record. Unordered; listings sort explicitly.
pub type AnnotationCollection = HashMap<FrameIndex, FrameAnnotation>;

/// Notification delivered to store observers after a mutation has completed.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    /// A point was appended.
    PointAdded {
        /// Frame the point was added to.
        frame: FrameIndex,
        /// Owning player.
        player: PlayerId,
        /// Marker polarity.
        polarity: Polarity,
        /// Index of the new point within its sequence.
        index: usize,
    },
    /// A point was removed.
    PointRemoved {
        /// Frame the point was removed from.
        frame: FrameIndex,
        /// Owning player.
        player: PlayerId,
        /// Marker polarity.
        polarity: Polarity,
        /// Former index of the point.
        index: usize,
        /// Removed coordinate.
        point: Point,
    },
    /// Both sequences of a player were emptied on a frame.
    PlayerCleared {
        /// Affected frame.
        frame: FrameIndex,
        /// Affected player.
        player: PlayerId,
    },
    /// One sequence was emptied on a frame.
    MarkerTypeCleared {
        /// Affected frame.
        frame: FrameIndex,
        /// Affected player.
        player: PlayerId,
        /// Affected polarity.
        polarity: Polarity,
    },
    /// Every frame was dropped.
    AllCleared,
    /// Frame, player or polarity selection changed.
    SelectionChanged(Selection),
}

/// UI selection state consulted by [`AnnotationStore::add_point`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Frame currently shown.
    pub frame: FrameIndex,
    /// Player new points are attributed to.
    pub player: PlayerId,
    /// Polarity of new points.
    pub polarity: Polarity,
}

/// Handle returned by [`AnnotationStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent)>;

/// Mutable annotation state with synchronous change notification.
///
/// Every mutation completes before observers run, and observers run before the mutating call
/// returns. Frames whose four sequences become empty are removed from the collection.
#[derive(Default)]
pub struct AnnotationStore {
    frames: AnnotationCollection,
    selection: Selection,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("frames", &self.frames)
            .field("selection", &self.selection)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl AnnotationStore {
    /// Create an empty store with the default selection (frame 0, player 1, positive).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `frames`. Empty records are discarded.
    pub fn with_frames(frames: impl IntoIterator<Item = (FrameIndex, FrameAnnotation)>) -> Self {
        let mut store = Self::new();
        store.frames = frames
            .into_iter()
            .filter(|(_, ann)| !ann.is_empty())
            .collect();
        store
    }

    /// Register an observer. It is called synchronously after every effective mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` when the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Frame currently shown.
    pub fn current_frame(&self) -> FrameIndex {
        self.selection.frame
    }

    /// Player new points are attributed to.
    pub fn active_player(&self) -> PlayerId {
        self.selection.player
    }

    /// Polarity of new points.
    pub fn active_polarity(&self) -> Polarity {
        self.selection.polarity
    }

    /// Select the frame that subsequent mutations target.
    pub fn set_current_frame(&mut self, frame: FrameIndex) {
        if self.selection.frame != frame {
            self.selection.frame = frame;
            self.notify(StoreEvent::SelectionChanged(self.selection));
        }
    }

    /// Select the player new points are attributed to.
    pub fn set_active_player(&mut self, player: PlayerId) {
        if self.selection.player != player {
            self.selection.player = player;
            self.notify(StoreEvent::SelectionChanged(self.selection));
        }
    }

    /// Select the polarity of new points.
    pub fn set_active_polarity(&mut self, polarity: Polarity) {
        if self.selection.polarity != polarity {
            self.selection.polarity = polarity;
            self.notify(StoreEvent::SelectionChanged(self.selection));
        }
    }

    /// Append `point` to the active (player, polarity) sequence of the current frame.
    ///
    /// Duplicates are kept.
    pub fn add_point(&mut self, point: Point) {
        let Selection {
            frame,
            player,
            polarity,
        } = self.selection;
        let seq = self.frames.entry(frame).or_default().points_mut(player, polarity);
        seq.push(point);
        let index = seq.len() - 1;
        self.notify(StoreEvent::PointAdded {
            frame,
            player,
            polarity,
            index,
        });
    }

    /// Remove the point at `index` of `(player, polarity)` on the current frame.
    ///
    /// Does nothing when the frame or index does not exist.
    pub fn remove_point(&mut self, player: PlayerId, polarity: Polarity, index: usize) {
        let frame = self.selection.frame;
        let Some(ann) = self.frames.get_mut(&frame) else {
            return;
        };
        let seq = ann.points_mut(player, polarity);
        if index >= seq.len() {
            return;
        }
        let point = seq.remove(index);
        self.prune(frame);
        self.notify(StoreEvent::PointRemoved {
            frame,
            player,
            polarity,
            index,
            point,
        });
    }

    /// Empty both sequences of `player` on the current frame.
    pub fn clear_player_points(&mut self, player: PlayerId) {
        let frame = self.selection.frame;
        let Some(ann) = self.frames.get_mut(&frame) else {
            return;
        };
        let mut removed = false;
        for polarity in Polarity::ALL {
            let seq = ann.points_mut(player, polarity);
            removed |= !seq.is_empty();
            seq.clear();
        }
        if !removed {
            return;
        }
        self.prune(frame);
        self.notify(StoreEvent::PlayerCleared { frame, player });
    }

    /// Empty the `(player, polarity)` sequence on the current frame.
    pub fn clear_player_marker_points(&mut self, player: PlayerId, polarity: Polarity) {
        let frame = self.selection.frame;
        let Some(ann) = self.frames.get_mut(&frame) else {
            return;
        };
        let seq = ann.points_mut(player, polarity);
        if seq.is_empty() {
            return;
        }
        seq.clear();
        self.prune(frame);
        self.notify(StoreEvent::MarkerTypeCleared {
            frame,
            player,
            polarity,
        });
    }

    /// Drop every annotated frame. Used when the active video changes.
    pub fn clear_all(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.frames.clear();
        self.notify(StoreEvent::AllCleared);
    }

    /// Borrow the whole collection.
    pub fn collection(&self) -> &AnnotationCollection {
        &self.frames
    }

    /// Annotation of `frame`, if any point exists on it.
    pub fn frame(&self, frame: FrameIndex) -> Option<&FrameAnnotation> {
        self.frames.get(&frame)
    }

    /// Annotation of the current frame, if any.
    pub fn current_frame_annotation(&self) -> Option<&FrameAnnotation> {
        self.frame(self.selection.frame)
    }

    /// Annotated frames in ascending frame order.
    pub fn sorted_frames(&self) -> Vec<(FrameIndex, &FrameAnnotation)> {
        let mut out: Vec<_> = self.frames.iter().map(|(&k, v)| (k, v)).collect();
        out.sort_unstable_by_key(|(k, _)| *k);
        out
    }

    /// Number of annotated frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of points across all frames.
    pub fn total_points(&self) -> usize {
        self.frames.values().map(FrameAnnotation::len).sum()
    }

    fn prune(&mut self, frame: FrameIndex) {
        if self.frames.get(&frame).is_some_and(FrameAnnotation::is_empty) {
            self.frames.remove(&frame);
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        tracing::trace!(?event, "annotation store changed");
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/annotation/store.rs"]
mod tests;
