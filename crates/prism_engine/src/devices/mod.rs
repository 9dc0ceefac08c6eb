//! Input device handles and their event tables
//!
//! Devices are created by the environment and shared as `Rc<RefCell<..>>`
//! handles. The environment translates native events into the typed argument
//! structs below and dispatches them through the per-device event tables;
//! everything downstream (quit handling, application bindings) observes the
//! devices and never the native backend.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::core::event::EventDispatcher;

/// Key identification, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum KeyCode {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    /// A key the backend reported but this layer does not distinguish.
    Unknown,
}

/// Pressed/released state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// The key or button went down.
    Pressed,
    /// The key or button went up.
    Released,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button
    Left,
    /// Right button
    Right,
    /// Middle button (wheel click)
    Middle,
    /// Any additional button, by backend index
    Other(u8),
}

/// Payload of a keyboard key event.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardEventArg {
    /// The key that changed state.
    pub key: KeyCode,
    /// New state of the key.
    pub state: ButtonState,
}

/// Payload of a mouse movement event.
#[derive(Debug, Clone, Copy)]
pub struct MouseMovedArg {
    /// Cursor x position in frame coordinates.
    pub x: f64,
    /// Cursor y position in frame coordinates.
    pub y: f64,
    /// Movement since the previous event on the x axis.
    pub dx: f64,
    /// Movement since the previous event on the y axis.
    pub dy: f64,
}

/// Payload of a mouse button event.
#[derive(Debug, Clone, Copy)]
pub struct MouseButtonArg {
    /// The button that changed state.
    pub button: MouseButton,
    /// New state of the button.
    pub state: ButtonState,
}

/// Payload of a joystick axis movement.
#[derive(Debug, Clone, Copy)]
pub struct JoystickAxisArg {
    /// Axis index as reported by the backend.
    pub axis: u32,
    /// Normalized axis value in `[-1, 1]`.
    pub value: f32,
}

/// Payload of a joystick button event.
#[derive(Debug, Clone, Copy)]
pub struct JoystickButtonArg {
    /// Button index as reported by the backend.
    pub button: u32,
    /// New state of the button.
    pub state: ButtonState,
}

/// Shared keyboard handle.
pub type KeyboardRef = Rc<RefCell<Keyboard>>;
/// Shared mouse handle.
pub type MouseRef = Rc<RefCell<Mouse>>;
/// Shared joystick handle.
pub type JoystickRef = Rc<RefCell<Joystick>>;

/// Keyboard device: key event table plus polled key state.
#[derive(Default)]
pub struct Keyboard {
    key_event: EventDispatcher<KeyboardEventArg>,
    pressed: HashSet<KeyCode>,
}

impl Keyboard {
    /// Create a keyboard with no listeners and no keys down.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration point for key events.
    pub fn key_event(&mut self) -> &mut EventDispatcher<KeyboardEventArg> {
        &mut self.key_event
    }

    /// Whether `key` is currently held down.
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Record a state change and notify listeners. Called by the environment.
    pub fn dispatch(&mut self, arg: KeyboardEventArg) {
        match arg.state {
            ButtonState::Pressed => {
                self.pressed.insert(arg.key);
            }
            ButtonState::Released => {
                self.pressed.remove(&arg.key);
            }
        }
        self.key_event.notify(&arg);
    }
}

/// Mouse device: movement/button event tables plus last known position.
#[derive(Default)]
pub struct Mouse {
    moved_event: EventDispatcher<MouseMovedArg>,
    button_event: EventDispatcher<MouseButtonArg>,
    position: (f64, f64),
}

impl Mouse {
    /// Create a mouse with no listeners at position (0, 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration point for movement events.
    pub fn moved_event(&mut self) -> &mut EventDispatcher<MouseMovedArg> {
        &mut self.moved_event
    }

    /// Registration point for button events.
    pub fn button_event(&mut self) -> &mut EventDispatcher<MouseButtonArg> {
        &mut self.button_event
    }

    /// Last known cursor position in frame coordinates.
    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Record a cursor move and notify listeners. Called by the environment.
    pub fn dispatch_moved(&mut self, x: f64, y: f64) {
        let arg = MouseMovedArg {
            x,
            y,
            dx: x - self.position.0,
            dy: y - self.position.1,
        };
        self.position = (x, y);
        self.moved_event.notify(&arg);
    }

    /// Record a button change and notify listeners. Called by the environment.
    pub fn dispatch_button(&mut self, arg: MouseButtonArg) {
        self.button_event.notify(&arg);
    }
}

/// Joystick device: axis/button event tables.
///
/// A joystick handle only exists when the environment detected (or was
/// configured with) a physical stick; see `Environment::joystick`.
pub struct Joystick {
    name: String,
    axis_event: EventDispatcher<JoystickAxisArg>,
    button_event: EventDispatcher<JoystickButtonArg>,
}

impl Joystick {
    /// Create a joystick with the backend-reported name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axis_event: EventDispatcher::new(),
            button_event: EventDispatcher::new(),
        }
    }

    /// Backend-reported device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registration point for axis events.
    pub fn axis_event(&mut self) -> &mut EventDispatcher<JoystickAxisArg> {
        &mut self.axis_event
    }

    /// Registration point for button events.
    pub fn button_event(&mut self) -> &mut EventDispatcher<JoystickButtonArg> {
        &mut self.button_event
    }

    /// Notify listeners of an axis change. Called by the environment.
    pub fn dispatch_axis(&mut self, arg: JoystickAxisArg) {
        self.axis_event.notify(&arg);
    }

    /// Notify listeners of a button change. Called by the environment.
    pub fn dispatch_button(&mut self, arg: JoystickButtonArg) {
        self.button_event.notify(&arg);
    }
}
