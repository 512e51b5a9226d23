use std::collections::HashSet;

use crate::core::geo::LatLng;

/// Events the host viewer forwards to the layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// The view was reset wholesale (programmatic jump, projection change).
    ViewReset,
    /// A zoom change finished settling.
    ZoomEnd,
    /// A pan or drag finished settling.
    MoveEnd,
    /// The layer's tile content finished its initial load.
    TilesLoaded,
    /// A click on the map at the given position.
    Click { position: LatLng },
}

impl ViewerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ViewerEvent::ViewReset => EventKind::ViewReset,
            ViewerEvent::ZoomEnd => EventKind::ZoomEnd,
            ViewerEvent::MoveEnd => EventKind::MoveEnd,
            ViewerEvent::TilesLoaded => EventKind::TilesLoaded,
            ViewerEvent::Click { .. } => EventKind::Click,
        }
    }
}

/// Discriminant of [`ViewerEvent`], used for subscription bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ViewReset,
    ZoomEnd,
    MoveEnd,
    TilesLoaded,
    Click,
}

impl EventKind {
    /// Kinds that mean the settled view changed, so attribution must be
    /// re-resolved.
    pub fn affects_attribution(&self) -> bool {
        matches!(
            self,
            EventKind::ViewReset | EventKind::ZoomEnd | EventKind::MoveEnd | EventKind::TilesLoaded
        )
    }
}

/// The single set of event subscriptions a layer holds while attached.
///
/// The set is established in one piece when the layer is added to a map and
/// cleared in one piece when it is removed, so a subscription can never
/// outlive the attachment that created it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    kinds: HashSet<EventKind>,
}

impl Subscriptions {
    /// The empty set, i.e. the state of a detached layer.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind) {
        self.kinds.insert(kind);
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }
}
