//! Global hotkey listener using `rdev`
//!
//! Monitors system-wide key events on a dedicated thread and sets the
//! trigger signal whenever the configured combination is pressed.
//! `rdev::listen` cannot be interrupted, so stopping the listener only makes
//! the callback ignore further events; the thread lives until process exit.
//! If capture cannot start at all (no X display, missing permissions) the
//! failure is handed back through the receiver returned by `start()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rdev::EventType;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::keys::{Modifier, ModifierState, SpecialKey};
use super::parser::{Operand, StructuredHotkey};
use crate::trigger::TriggerSignal;

/// Errors that can occur in the hotkey listener
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("hotkey listener is already running")]
    AlreadyRunning,

    #[error("trigger key '{0}' has no physical key mapping")]
    UnsupportedKey(Operand),

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("cannot capture global key events ({reason}): {hint}")]
    Listen { reason: String, hint: &'static str },
}

/// The physical key combination that fires the trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerCombo {
    modifiers: ModifierState,
    key: rdev::Key,
}

impl TriggerCombo {
    /// Map a parsed hotkey onto physical keys
    pub fn from_hotkey(hotkey: &StructuredHotkey) -> Result<Self, ListenerError> {
        let key = physical_key(hotkey.operand())
            .ok_or(ListenerError::UnsupportedKey(hotkey.operand()))?;
        Ok(Self {
            modifiers: ModifierState::from_modifiers(hotkey.modifiers()),
            key,
        })
    }
}

/// Follows modifier press/release events and reports when the trigger
/// combination is completed
#[derive(Debug, Clone)]
pub struct ComboTracker {
    combo: TriggerCombo,
    held: ModifierState,
}

impl ComboTracker {
    pub fn new(combo: TriggerCombo) -> Self {
        Self {
            combo,
            held: ModifierState::default(),
        }
    }

    /// Feed one keyboard event; returns true when the combination fires.
    ///
    /// The operand must be pressed while exactly the configured modifiers
    /// are held.
    pub fn observe(&mut self, event: &EventType) -> bool {
        match event {
            EventType::KeyPress(key) => {
                if let Some(modifier) = modifier_of(*key) {
                    self.held.set(modifier, true);
                    false
                } else {
                    *key == self.combo.key && self.held == self.combo.modifiers
                }
            }
            EventType::KeyRelease(key) => {
                if let Some(modifier) = modifier_of(*key) {
                    self.held.set(modifier, false);
                }
                false
            }
            _ => false,
        }
    }
}

/// Global hotkey listener that sets the trigger signal on a match
pub struct HotkeyListener {
    combo: TriggerCombo,
    trigger: TriggerSignal,
    running: Arc<AtomicBool>,
}

impl HotkeyListener {
    /// Create a new hotkey listener
    pub fn new(hotkey: &StructuredHotkey, trigger: TriggerSignal) -> Result<Self, ListenerError> {
        Ok(Self {
            combo: TriggerCombo::from_hotkey(hotkey)?,
            trigger,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start the hotkey listener
    ///
    /// Spawns a dedicated thread running `rdev::listen`. Matching events set
    /// the trigger signal until `stop()` is called. The returned receiver
    /// resolves if the thread gives up on capturing events.
    pub fn start(&self) -> Result<oneshot::Receiver<ListenerError>, ListenerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ListenerError::AlreadyRunning);
        }

        let mut tracker = ComboTracker::new(self.combo);
        let trigger = self.trigger.clone();
        let running = Arc::clone(&self.running);
        let callback_running = Arc::clone(&self.running);
        let (failed_tx, failed_rx) = oneshot::channel();

        let spawned = thread::Builder::new()
            .name("hotkey-listener".to_string())
            .spawn(move || {
                let listen = move || {
                    rdev::listen(move |event| {
                        if !callback_running.load(Ordering::SeqCst) {
                            return;
                        }
                        if tracker.observe(&event.event_type) {
                            let fresh = trigger.set();
                            debug!(fresh, "trigger hotkey pressed");
                        }
                    })
                };
                run_listener(listen, running, failed_tx);
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(ListenerError::ThreadSpawn(e.to_string()));
        }

        Ok(failed_rx)
    }

    /// Stop forwarding events to the trigger signal
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the listener is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Body of the listener thread. `listen` blocks for as long as events are
/// being captured.
fn run_listener<L>(listen: L, running: Arc<AtomicBool>, failed: oneshot::Sender<ListenerError>)
where
    L: FnOnce() -> Result<(), rdev::ListenError>,
{
    info!("hotkey listener thread started");

    if let Err(e) = listen() {
        let failure = listen_failure(&e);
        warn!(%failure, "hotkey listener failed, the trigger hotkey will not fire");
        // the receiver is gone once the process is already shutting down
        let _ = failed.send(failure);
    }

    running.store(false, Ordering::SeqCst);
    info!("hotkey listener thread stopped");
}

fn listen_failure(error: &rdev::ListenError) -> ListenerError {
    use rdev::ListenError as E;

    let hint = match error {
        E::MissingDisplayError | E::XRecordExtensionError => {
            "run inside an X11 session with DISPLAY set; Wayland sessions cannot be captured"
        }
        _ => "make sure this user may read global keyboard input",
    };
    ListenerError::Listen {
        reason: format!("{:?}", error),
        hint,
    }
}

fn modifier_of(key: rdev::Key) -> Option<Modifier> {
    use rdev::Key as K;

    match key {
        K::ControlLeft | K::ControlRight => Some(Modifier::Control),
        K::Alt | K::AltGr => Some(Modifier::Alt),
        K::MetaLeft | K::MetaRight => Some(Modifier::Super),
        K::ShiftLeft | K::ShiftRight => Some(Modifier::Shift),
        _ => None,
    }
}

fn physical_key(operand: Operand) -> Option<rdev::Key> {
    use rdev::Key as K;

    let key = match operand {
        Operand::Special(special) => match special {
            SpecialKey::Tab => K::Tab,
            SpecialKey::Left => K::LeftArrow,
            SpecialKey::Up => K::UpArrow,
            SpecialKey::Right => K::RightArrow,
            SpecialKey::Down => K::DownArrow,
            SpecialKey::Enter => K::Return,
            SpecialKey::PageUp => K::PageUp,
            SpecialKey::PageDown => K::PageDown,
            SpecialKey::F1 => K::F1,
            SpecialKey::F2 => K::F2,
            SpecialKey::F3 => K::F3,
            SpecialKey::F4 => K::F4,
            SpecialKey::F5 => K::F5,
            SpecialKey::F6 => K::F6,
            SpecialKey::F7 => K::F7,
            SpecialKey::F8 => K::F8,
            SpecialKey::F9 => K::F9,
            SpecialKey::F10 => K::F10,
            SpecialKey::F11 => K::F11,
            SpecialKey::F12 => K::F12,
            // rdev has no codes past F12
            _ => return None,
        },
        Operand::Char(c) => match c.to_ascii_lowercase() {
            'a' => K::KeyA,
            'b' => K::KeyB,
            'c' => K::KeyC,
            'd' => K::KeyD,
            'e' => K::KeyE,
            'f' => K::KeyF,
            'g' => K::KeyG,
            'h' => K::KeyH,
            'i' => K::KeyI,
            'j' => K::KeyJ,
            'k' => K::KeyK,
            'l' => K::KeyL,
            'm' => K::KeyM,
            'n' => K::KeyN,
            'o' => K::KeyO,
            'p' => K::KeyP,
            'q' => K::KeyQ,
            'r' => K::KeyR,
            's' => K::KeyS,
            't' => K::KeyT,
            'u' => K::KeyU,
            'v' => K::KeyV,
            'w' => K::KeyW,
            'x' => K::KeyX,
            'y' => K::KeyY,
            'z' => K::KeyZ,
            '0' => K::Num0,
            '1' => K::Num1,
            '2' => K::Num2,
            '3' => K::Num3,
            '4' => K::Num4,
            '5' => K::Num5,
            '6' => K::Num6,
            '7' => K::Num7,
            '8' => K::Num8,
            '9' => K::Num9,
            ' ' => K::Space,
            '-' => K::Minus,
            '=' => K::Equal,
            ',' => K::Comma,
            '.' => K::Dot,
            '/' => K::Slash,
            _ => return None,
        },
    };
    Some(key)
}
