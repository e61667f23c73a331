use crate::action::ControlAction;

/// Pointer buttons the tracker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button: orbit.
    Primary,
    /// Right button: pan.
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Orbit,
    Pan,
}

/// Tracks the pointer between events and turns drags into actions.
#[derive(Debug, Default)]
pub struct PointerTracker {
    position: Option<(f32, f32)>,
    gesture: Option<Gesture>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// A button went down. Starts a gesture unless one is already active.
    pub fn press(&mut self, button: PointerButton) {
        if self.gesture.is_some() {
            return;
        }
        self.gesture = match button {
            PointerButton::Primary => Some(Gesture::Orbit),
            PointerButton::Secondary => Some(Gesture::Pan),
            PointerButton::Other => None,
        };
        if let Some(g) = self.gesture {
            tracing::trace!("pointer gesture {g:?} started");
        }
    }

    /// A button went up. Ends the gesture that button started.
    pub fn release(&mut self, button: PointerButton) {
        let ends = matches!(
            (self.gesture, button),
            (Some(Gesture::Orbit), PointerButton::Primary)
                | (Some(Gesture::Pan), PointerButton::Secondary)
        );
        if ends {
            self.gesture = None;
        }
    }

    /// The pointer moved to `(x, y)` in logical pixels.
    pub fn moved(&mut self, x: f32, y: f32) -> Option<ControlAction> {
        let previous = self.position.replace((x, y));
        let (px, py) = previous?;
        let (dx, dy) = (x - px, y - py);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        match self.gesture? {
            Gesture::Orbit => Some(ControlAction::Orbit { dx, dy }),
            Gesture::Pan => Some(ControlAction::Pan { dx, dy }),
        }
    }

    /// The pointer left the window; the next move starts a fresh delta.
    pub fn left(&mut self) {
        self.position = None;
        self.gesture = None;
    }

    /// A wheel scroll of `lines` (positive = away from the user).
    pub fn wheel(&mut self, lines: f32) -> Option<ControlAction> {
        (lines != 0.0 && lines.is_finite()).then_some(ControlAction::Dolly(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_without_button_is_ignored() {
        let mut t = PointerTracker::new();
        assert_eq!(t.moved(10.0, 10.0), None);
        assert_eq!(t.moved(20.0, 10.0), None);
    }

    #[test]
    fn primary_drag_orbits() {
        let mut t = PointerTracker::new();
        t.moved(10.0, 10.0);
        t.press(PointerButton::Primary);
        assert!(t.is_dragging());
        assert_eq!(
            t.moved(15.0, 8.0),
            Some(ControlAction::Orbit { dx: 5.0, dy: -2.0 })
        );
        t.release(PointerButton::Primary);
        assert!(!t.is_dragging());
        assert_eq!(t.moved(30.0, 8.0), None);
    }

    #[test]
    fn secondary_drag_pans() {
        let mut t = PointerTracker::new();
        t.moved(0.0, 0.0);
        t.press(PointerButton::Secondary);
        assert_eq!(
            t.moved(3.0, 4.0),
            Some(ControlAction::Pan { dx: 3.0, dy: 4.0 })
        );
    }

    #[test]
    fn second_button_does_not_hijack_gesture() {
        let mut t = PointerTracker::new();
        t.moved(0.0, 0.0);
        t.press(PointerButton::Primary);
        t.press(PointerButton::Secondary);
        t.release(PointerButton::Secondary);
        assert_eq!(
            t.moved(1.0, 0.0),
            Some(ControlAction::Orbit { dx: 1.0, dy: 0.0 })
        );
    }

    #[test]
    fn first_move_after_leaving_has_no_delta() {
        let mut t = PointerTracker::new();
        t.moved(0.0, 0.0);
        t.press(PointerButton::Primary);
        t.left();
        t.press(PointerButton::Primary);
        assert_eq!(t.moved(100.0, 100.0), None);
        assert!(t.moved(101.0, 100.0).is_some());
    }

    #[test]
    fn wheel_dollies() {
        let mut t = PointerTracker::new();
        assert_eq!(t.wheel(1.0), Some(ControlAction::Dolly(1.0)));
        assert_eq!(t.wheel(0.0), None);
    }
}
