//! Hover state for the graph view.
//!
//! Holds which entity is under the pointer and where the pointer was last
//! seen. Nothing here touches layout: hovering only changes which marker is
//! drawn highlighted and where the detail overlay goes.

use serde::{Deserialize, Serialize};

use crate::layout::PointF;

/// Something the pointer can hover.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum HoverTarget {
    Center,
    /// A peer, by its render id.
    Peer(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InteractionState {
    hovered: Option<HoverTarget>,
    pointer: PointF,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.hovered.as_ref()
    }

    pub fn pointer(&self) -> PointF {
        self.pointer
    }

    /// Pointer entered `target`. The latest enter always wins.
    pub fn pointer_enter(&mut self, target: HoverTarget, pointer: PointF) {
        self.hovered = Some(target);
        self.pointer = pointer;
    }

    /// Pointer moved. Only tracked while something is hovered.
    /// Returns whether the state changed.
    pub fn pointer_move(&mut self, pointer: PointF) -> bool {
        if self.hovered.is_none() {
            return false;
        }
        self.pointer = pointer;
        true
    }

    /// Pointer left `target`.
    ///
    /// Overlapping shapes can deliver enter(B) before leave(A); a leave for
    /// anything but the current target is ignored so B stays hovered.
    pub fn pointer_leave(&mut self, target: &HoverTarget) -> bool {
        if self.hovered.as_ref() == Some(target) {
            self.hovered = None;
            true
        } else {
            false
        }
    }

    /// Drop the hover, e.g. when the displayed graph is replaced.
    pub fn clear(&mut self) {
        self.hovered = None;
    }

    pub fn is_hovered(&self, target: &HoverTarget) -> bool {
        self.hovered.as_ref() == Some(target)
    }

    /// Diameter multiplier for `target`.
    pub fn scale_for(&self, target: &HoverTarget, hover_scale: f64) -> f64 {
        if self.is_hovered(target) { hover_scale } else { 1.0 }
    }

    /// Where the detail overlay goes, if anything is hovered.
    pub fn tooltip_anchor(&self, offset: (f64, f64)) -> Option<PointF> {
        self.hovered
            .as_ref()
            .map(|_| PointF::new(self.pointer.x + offset.0, self.pointer.y + offset.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(id: &str) -> HoverTarget {
        HoverTarget::Peer(id.to_string())
    }

    #[test]
    fn test_enter_move_leave() {
        let mut s = InteractionState::new();
        s.pointer_enter(peer("a"), PointF::new(10.0, 10.0));
        assert!(s.is_hovered(&peer("a")));

        assert!(s.pointer_move(PointF::new(12.0, 11.0)));
        assert_eq!(s.pointer(), PointF::new(12.0, 11.0));
        assert!(s.is_hovered(&peer("a")));

        assert!(s.pointer_leave(&peer("a")));
        assert_eq!(s.hovered(), None);
    }

    #[test]
    fn test_move_without_hover_is_ignored() {
        let mut s = InteractionState::new();
        assert!(!s.pointer_move(PointF::new(5.0, 5.0)));
        assert_eq!(s.pointer(), PointF::default());
    }

    #[test]
    fn test_late_leave_does_not_clear_new_hover() {
        // Overlapping shapes: enter(B) arrives before leave(A)
        let mut s = InteractionState::new();
        s.pointer_enter(peer("a"), PointF::new(0.0, 0.0));
        s.pointer_enter(peer("b"), PointF::new(1.0, 0.0));
        assert!(!s.pointer_leave(&peer("a")));
        assert!(s.is_hovered(&peer("b")));
        assert!(!s.is_hovered(&peer("a")));
    }

    #[test]
    fn test_center_and_peer_are_exclusive() {
        let mut s = InteractionState::new();
        s.pointer_enter(HoverTarget::Center, PointF::new(0.0, 0.0));
        s.pointer_enter(peer("a"), PointF::new(0.0, 0.0));
        assert!(!s.is_hovered(&HoverTarget::Center));
        assert!(s.is_hovered(&peer("a")));
    }

    #[test]
    fn test_scale_and_tooltip() {
        let mut s = InteractionState::new();
        assert_eq!(s.tooltip_anchor((15.0, -30.0)), None);
        s.pointer_enter(HoverTarget::Center, PointF::new(100.0, 200.0));
        assert_eq!(s.scale_for(&HoverTarget::Center, 1.2), 1.2);
        assert_eq!(s.scale_for(&peer("a"), 1.2), 1.0);
        assert_eq!(s.tooltip_anchor((15.0, -30.0)), Some(PointF::new(115.0, 170.0)));
    }

    #[test]
    fn test_target_json_shape() {
        let t: HoverTarget = serde_json::from_str(r#"{"kind": "peer", "id": "W1"}"#).unwrap();
        assert_eq!(t, peer("W1"));
        let t: HoverTarget = serde_json::from_str(r#"{"kind": "center"}"#).unwrap();
        assert_eq!(t, HoverTarget::Center);
    }
}
