use std::fmt;

/// Keyboard key understood by the input driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Char(char),
    /// Function key `F1`..`F12`.
    F(u8),
    Escape,
    Shift,
    Ctrl,
    Alt,
    Space,
    Enter,
    Tab,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            Key::Escape => f.write_str("Esc"),
            Key::Shift => f.write_str("Shift"),
            Key::Ctrl => f.write_str("Ctrl"),
            Key::Alt => f.write_str("Alt"),
            Key::Space => f.write_str("Space"),
            Key::Enter => f.write_str("Enter"),
            Key::Tab => f.write_str("Tab"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
}

/// Pixel coordinate inside the game window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Simulated keyboard and mouse.
///
/// Every call is fire-and-forget: the driver gives no acknowledgement that
/// the game processed the input, so callers verify effects by polling the
/// next snapshot instead of trusting the call.
pub trait InputDevice: Send + Sync {
    /// Press and release a key.
    fn press_key(&self, key: Key);

    /// Press a key and keep it held until [`key_up`](Self::key_up).
    fn key_down(&self, key: Key);

    fn key_up(&self, key: Key);

    /// Click at `point`, optionally holding `modifier` for the duration.
    fn click(&self, point: ScreenPoint, button: MouseButton, modifier: Option<Key>);

    fn move_pointer(&self, point: ScreenPoint);

    /// Release every key and button still held down.
    fn release_all(&self);
}

/// Keeps a key held until dropped.
///
/// Used for modifiers that must stay down across several inputs and be
/// released on every exit path.
#[must_use = "the key is released as soon as the guard is dropped"]
pub struct HeldKey<'a> {
    input: &'a dyn InputDevice,
    key: Key,
}

impl<'a> HeldKey<'a> {
    pub fn hold(input: &'a dyn InputDevice, key: Key) -> Self {
        input.key_down(key);
        Self { input, key }
    }

    pub fn key(&self) -> Key {
        self.key
    }
}

impl Drop for HeldKey<'_> {
    fn drop(&mut self) {
        self.input.key_up(self.key);
    }
}

impl fmt::Debug for HeldKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeldKey").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl InputDevice for Recorder {
        fn press_key(&self, key: Key) {
            self.push(format!("press {key}"));
        }

        fn key_down(&self, key: Key) {
            self.push(format!("down {key}"));
        }

        fn key_up(&self, key: Key) {
            self.push(format!("up {key}"));
        }

        fn click(&self, _point: ScreenPoint, button: MouseButton, _modifier: Option<Key>) {
            self.push(format!("click {button}"));
        }

        fn move_pointer(&self, _point: ScreenPoint) {}

        fn release_all(&self) {}
    }

    #[test]
    fn test_held_key_is_released_on_drop() {
        let input = Recorder::default();
        {
            let held = HeldKey::hold(&input, Key::Shift);
            assert_eq!(held.key(), Key::Shift);
            input.click(ScreenPoint::new(1, 1), MouseButton::Left, None);
        }
        assert_eq!(input.entries(), ["down Shift", "click left", "up Shift"]);
    }

    #[test]
    fn test_held_key_is_released_when_unwinding_early() {
        fn attempt(input: &dyn InputDevice) -> Result<(), ()> {
            let _held = HeldKey::hold(input, Key::Shift);
            Err(())
        }

        let input = Recorder::default();
        assert!(attempt(&input).is_err());
        assert_eq!(input.entries(), ["down Shift", "up Shift"]);
    }
}
