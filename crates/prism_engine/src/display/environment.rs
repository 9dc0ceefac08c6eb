//! Display environments
//!
//! An environment owns the native display surface and the input device
//! handles, and pumps the native event queue once per engine phase. The
//! default implementation is GLFW-backed; [`HeadlessEnvironment`] provides the
//! same contract without a display for tests and server-side tools.

use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

use super::frame::Frame;
use crate::core::config::DisplayConfig;
use crate::devices::{
    ButtonState, Joystick, JoystickAxisArg, JoystickButtonArg, JoystickRef, KeyCode, Keyboard,
    KeyboardEventArg, KeyboardRef, Mouse, MouseButton, MouseButtonArg, MouseRef,
};

/// Environment setup errors
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// The windowing system could not be initialized (e.g. no display).
    #[error("windowing system initialization failed")]
    InitializationFailed,

    /// The native window could not be created.
    #[error("window creation failed")]
    WindowCreationFailed,
}

/// Which engine phase an event pump is running for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpPhase {
    /// Engine initialize phase.
    Initialize,
    /// One process-phase tick.
    Process,
    /// Engine deinitialize phase.
    Deinitialize,
}

/// Owner of the display surface and input devices.
///
/// The device handles returned here are stable for the lifetime of the
/// environment; the bootstrap extracts them once at construction.
pub trait Environment {
    /// The native display surface record.
    fn frame(&self) -> Rc<RefCell<Frame>>;

    /// The mouse device.
    fn mouse(&self) -> MouseRef;

    /// The keyboard device.
    fn keyboard(&self) -> KeyboardRef;

    /// The joystick device, if one is present.
    fn joystick(&self) -> Option<JoystickRef>;

    /// Run the native event pump once. Called once per engine phase by the
    /// bootstrap's phase adapters.
    fn pump_events(&mut self, phase: PumpPhase);

    /// Whether the user asked the native window to close.
    fn close_requested(&self) -> bool;
}

/// GLFW-backed environment: one native window plus translated input events.
pub struct GlfwEnvironment {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    frame: Rc<RefCell<Frame>>,
    mouse: MouseRef,
    keyboard: KeyboardRef,
    joystick: Option<JoystickRef>,
    joystick_axes: Vec<f32>,
    joystick_buttons: Vec<bool>,
    close: bool,
}

impl GlfwEnvironment {
    /// Initialize GLFW and create the native window.
    pub fn new(config: &DisplayConfig) -> Result<Self, EnvironmentError> {
        let mut glfw =
            glfw::init(glfw::fail_on_errors).map_err(|_| EnvironmentError::InitializationFailed)?;

        // No GL context; the rendering backend owns API setup.
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(EnvironmentError::WindowCreationFailed)?;

        window.set_key_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        let joystick = if glfw
            .get_joystick(glfw::JoystickId::Joystick1)
            .is_present()
        {
            log::info!("joystick detected on slot 1");
            Some(Rc::new(RefCell::new(Joystick::new("glfw-joystick-1"))))
        } else {
            None
        };

        log::info!(
            "created {}x{} window \"{}\"",
            config.width,
            config.height,
            config.title
        );

        Ok(Self {
            glfw,
            window,
            events,
            frame: Rc::new(RefCell::new(Frame::new(
                config.title.clone(),
                config.width,
                config.height,
                config.color_depth,
            ))),
            mouse: Rc::new(RefCell::new(Mouse::new())),
            keyboard: Rc::new(RefCell::new(Keyboard::new())),
            joystick,
            joystick_axes: Vec::new(),
            joystick_buttons: Vec::new(),
            close: false,
        })
    }

    fn drain_native_events(&mut self) {
        self.glfw.poll_events();
        let events: Vec<(f64, glfw::WindowEvent)> = glfw::flush_messages(&self.events).collect();
        for (_, event) in events {
            match event {
                glfw::WindowEvent::Key(key, _, action, _) => {
                    let state = match action {
                        glfw::Action::Press => ButtonState::Pressed,
                        glfw::Action::Release => ButtonState::Released,
                        glfw::Action::Repeat => continue,
                    };
                    self.keyboard.borrow_mut().dispatch(KeyboardEventArg {
                        key: map_key(key),
                        state,
                    });
                }
                glfw::WindowEvent::MouseButton(button, action, _) => {
                    let state = match action {
                        glfw::Action::Press => ButtonState::Pressed,
                        glfw::Action::Release => ButtonState::Released,
                        glfw::Action::Repeat => continue,
                    };
                    self.mouse.borrow_mut().dispatch_button(MouseButtonArg {
                        button: map_mouse_button(button),
                        state,
                    });
                }
                glfw::WindowEvent::CursorPos(x, y) => {
                    self.mouse.borrow_mut().dispatch_moved(x, y);
                }
                glfw::WindowEvent::Close => {
                    self.close = true;
                }
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    self.frame
                        .borrow_mut()
                        .set_dimensions(width.max(0) as u32, height.max(0) as u32);
                }
                _ => {}
            }
        }
        self.poll_joystick();
    }

    /// Joysticks have no event queue in GLFW; diff polled state instead.
    fn poll_joystick(&mut self) {
        let Some(joystick) = self.joystick.clone() else {
            return;
        };
        let native = self.glfw.get_joystick(glfw::JoystickId::Joystick1);
        if !native.is_present() {
            return;
        }

        let axes = native.get_axes();
        for (index, value) in axes.iter().enumerate() {
            if self.joystick_axes.get(index) != Some(value) {
                joystick.borrow_mut().dispatch_axis(JoystickAxisArg {
                    axis: index as u32,
                    value: *value,
                });
            }
        }
        self.joystick_axes = axes;

        let buttons: Vec<bool> = native.get_buttons().iter().map(|b| *b != 0).collect();
        for (index, pressed) in buttons.iter().enumerate() {
            let previous = self.joystick_buttons.get(index).copied().unwrap_or(false);
            if *pressed != previous {
                joystick.borrow_mut().dispatch_button(JoystickButtonArg {
                    button: index as u32,
                    state: if *pressed {
                        ButtonState::Pressed
                    } else {
                        ButtonState::Released
                    },
                });
            }
        }
        self.joystick_buttons = buttons;
    }
}

impl Environment for GlfwEnvironment {
    fn frame(&self) -> Rc<RefCell<Frame>> {
        self.frame.clone()
    }

    fn mouse(&self) -> MouseRef {
        self.mouse.clone()
    }

    fn keyboard(&self) -> KeyboardRef {
        self.keyboard.clone()
    }

    fn joystick(&self) -> Option<JoystickRef> {
        self.joystick.clone()
    }

    fn pump_events(&mut self, phase: PumpPhase) {
        match phase {
            PumpPhase::Initialize | PumpPhase::Process => self.drain_native_events(),
            PumpPhase::Deinitialize => {
                self.window.set_should_close(true);
                log::debug!("environment deinitialized");
            }
        }
    }

    fn close_requested(&self) -> bool {
        self.close || self.window.should_close()
    }
}

fn map_key(key: glfw::Key) -> KeyCode {
    use glfw::Key;
    match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Num0 => KeyCode::Num0,
        Key::Num1 => KeyCode::Num1,
        Key::Num2 => KeyCode::Num2,
        Key::Num3 => KeyCode::Num3,
        Key::Num4 => KeyCode::Num4,
        Key::Num5 => KeyCode::Num5,
        Key::Num6 => KeyCode::Num6,
        Key::Num7 => KeyCode::Num7,
        Key::Num8 => KeyCode::Num8,
        Key::Num9 => KeyCode::Num9,
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Tab => KeyCode::Tab,
        Key::Backspace => KeyCode::Backspace,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::LeftShift => KeyCode::LeftShift,
        Key::RightShift => KeyCode::RightShift,
        Key::LeftControl => KeyCode::LeftControl,
        Key::RightControl => KeyCode::RightControl,
        _ => KeyCode::Unknown,
    }
}

fn map_mouse_button(button: glfw::MouseButton) -> MouseButton {
    match button {
        glfw::MouseButton::Button1 => MouseButton::Left,
        glfw::MouseButton::Button2 => MouseButton::Right,
        glfw::MouseButton::Button3 => MouseButton::Middle,
        other => MouseButton::Other(other as u8),
    }
}

/// Environment without a display, for tests and headless tools.
///
/// Devices behave exactly like the windowed ones; events are injected by
/// dispatching on the device handles directly.
pub struct HeadlessEnvironment {
    frame: Rc<RefCell<Frame>>,
    mouse: MouseRef,
    keyboard: KeyboardRef,
    joystick: Option<JoystickRef>,
    close: bool,
    pumps: [usize; 3],
}

impl HeadlessEnvironment {
    /// Create a headless environment with the given virtual frame size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Rc::new(RefCell::new(Frame::new("headless", width, height, 32))),
            mouse: Rc::new(RefCell::new(Mouse::new())),
            keyboard: Rc::new(RefCell::new(Keyboard::new())),
            joystick: None,
            close: false,
            pumps: [0; 3],
        }
    }

    /// Add a synthetic joystick.
    pub fn with_joystick(mut self, name: &str) -> Self {
        self.joystick = Some(Rc::new(RefCell::new(Joystick::new(name))));
        self
    }

    /// Simulate the user closing the window.
    pub fn request_close(&mut self) {
        self.close = true;
    }

    /// How many times the pump ran for `phase`.
    pub fn pump_count(&self, phase: PumpPhase) -> usize {
        self.pumps[match phase {
            PumpPhase::Initialize => 0,
            PumpPhase::Process => 1,
            PumpPhase::Deinitialize => 2,
        }]
    }
}

impl Environment for HeadlessEnvironment {
    fn frame(&self) -> Rc<RefCell<Frame>> {
        self.frame.clone()
    }

    fn mouse(&self) -> MouseRef {
        self.mouse.clone()
    }

    fn keyboard(&self) -> KeyboardRef {
        self.keyboard.clone()
    }

    fn joystick(&self) -> Option<JoystickRef> {
        self.joystick.clone()
    }

    fn pump_events(&mut self, phase: PumpPhase) {
        self.pumps[match phase {
            PumpPhase::Initialize => 0,
            PumpPhase::Process => 1,
            PumpPhase::Deinitialize => 2,
        }] += 1;
    }

    fn close_requested(&self) -> bool {
        self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_environment_provides_all_devices() {
        let environment = HeadlessEnvironment::new(640, 480);
        assert_eq!(environment.frame().borrow().width(), 640);
        assert!(environment.joystick().is_none());

        let with_stick = HeadlessEnvironment::new(640, 480).with_joystick("pad");
        let joystick = with_stick.joystick().unwrap();
        assert_eq!(joystick.borrow().name(), "pad");
    }

    #[test]
    fn pump_counts_are_tracked_per_phase() {
        let mut environment = HeadlessEnvironment::new(640, 480);
        environment.pump_events(PumpPhase::Initialize);
        environment.pump_events(PumpPhase::Process);
        environment.pump_events(PumpPhase::Process);

        assert_eq!(environment.pump_count(PumpPhase::Initialize), 1);
        assert_eq!(environment.pump_count(PumpPhase::Process), 2);
        assert_eq!(environment.pump_count(PumpPhase::Deinitialize), 0);
    }
}
