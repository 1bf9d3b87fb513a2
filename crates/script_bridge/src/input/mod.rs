//! Polled input
//!
//! The native engine is polled once per frame into an [`InputSnapshot`] so
//! every script in a frame observes the same key and mouse state.

use crate::foundation::math::Vector3;
use crate::native::NativeEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key codes, numbered as the native input backend reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum KeyCode {
    /// Space bar
    Space = 32,
    /// A key
    A = 65,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Escape key
    Escape = 256,
    /// Enter key
    Enter = 257,
    /// Tab key
    Tab = 258,
    /// Backspace key
    Backspace = 259,
    /// Delete key
    Delete = 261,
    /// Right arrow
    Right = 262,
    /// Left arrow
    Left = 263,
    /// Down arrow
    Down = 264,
    /// Up arrow
    Up = 265,
    /// Left shift
    LeftShift = 340,
    /// Left control
    LeftCtrl = 341,
    /// Left alt
    LeftAlt = 342,
    /// Right shift
    RightShift = 344,
    /// Right control
    RightCtrl = 345,
    /// Right alt
    RightAlt = 346,
}

impl KeyCode {
    /// Every key the bridge polls
    pub const ALL: [Self; 42] = [
        Self::Space,
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F, Self::G,
        Self::H, Self::I, Self::J, Self::K, Self::L, Self::M, Self::N,
        Self::O, Self::P, Self::Q, Self::R, Self::S, Self::T, Self::U,
        Self::V, Self::W, Self::X, Self::Y, Self::Z,
        Self::Escape, Self::Enter, Self::Tab, Self::Backspace, Self::Delete,
        Self::Right, Self::Left, Self::Down, Self::Up,
        Self::LeftShift, Self::LeftCtrl, Self::LeftAlt,
        Self::RightShift, Self::RightCtrl, Self::RightAlt,
    ];

    /// Numeric code used on the native side
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look a key up by its native code
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.code() == code)
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left = 0,
    /// Right mouse button
    Right = 1,
    /// Middle mouse button
    Middle = 2,
}

impl MouseButton {
    /// Every button the bridge polls
    pub const ALL: [Self; 3] = [Self::Left, Self::Right, Self::Middle];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Input state captured at the start of a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
    mouse_buttons: [bool; 3],
    mouse_x: f32,
    mouse_y: f32,
}

impl InputSnapshot {
    /// Poll the native engine for the current frame's input
    pub fn capture(native: &dyn NativeEngine) -> Self {
        let mut snapshot = Self {
            mouse_x: native.input_get_mouse_x(),
            mouse_y: native.input_get_mouse_y(),
            ..Self::default()
        };
        for key in KeyCode::ALL {
            if native.input_get_key(key) {
                snapshot.held.insert(key);
            }
            if native.input_get_key_down(key) {
                snapshot.pressed.insert(key);
            }
            if native.input_get_key_up(key) {
                snapshot.released.insert(key);
            }
        }
        for button in MouseButton::ALL {
            snapshot.mouse_buttons[button.index()] = native.input_get_mouse_button(button);
        }
        snapshot
    }

    /// Key is currently held
    pub fn get_key(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Key went down this frame
    pub fn get_key_down(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Key went up this frame
    pub fn get_key_up(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    /// Mouse button is currently held
    pub fn get_mouse_button(&self, button: MouseButton) -> bool {
        self.mouse_buttons[button.index()]
    }

    /// Horizontal cursor position
    pub fn mouse_x(&self) -> f32 {
        self.mouse_x
    }

    /// Vertical cursor position
    pub fn mouse_y(&self) -> f32 {
        self.mouse_y
    }

    /// Cursor position as `(x, y, 0)`
    pub fn mouse_position(&self) -> Vector3 {
        Vector3::new(self.mouse_x, self.mouse_y, 0.0)
    }

    /// -1, 0 or 1 depending on which of two opposing keys is held
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        match (self.get_key(negative), self.get_key(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
