/// A high-level control the host applies to the running showcase.
///
/// Hosts translate their window events into actions; the orbit controls and
/// the debug panel consume actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Orbit the camera by a pointer delta in logical pixels.
    Orbit { dx: f32, dy: f32 },
    /// Pan the camera target by a pointer delta in logical pixels.
    Pan { dx: f32, dy: f32 },
    /// Zoom by wheel notches; positive moves towards the target.
    Dolly(f32),
    /// Show or hide the debug panel.
    TogglePanel,
    /// Stop the animation loop and leave.
    Quit,
}

/// Keys the showcase reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    F1,
    Escape,
    Other,
}

impl ControlAction {
    /// Map a key press to an action.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::F1 => Some(ControlAction::TogglePanel),
            Key::Escape => Some(ControlAction::Quit),
            Key::Other => None,
        }
    }
}
