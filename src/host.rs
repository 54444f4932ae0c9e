//! Host application interfaces
//!
//! The embedding application owns windows, menus, notifications, the cursor,
//! and the configuration store. The core drives it through the [`Host`]
//! trait; all methods take `&self` so implementations sit behind an `Arc`
//! and use interior mutability for their own state.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::bridge::ScriptCall;
use crate::config::AddonConfig;
use crate::profile::State;

/// Key identifiers for synthesized key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Application-level commands the host executes directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Sync,
    Browser,
    Statistics,
    AddCard,
    Preferences,
    Quit,
    Undo,
    Redo,
    Back,
    Forward,
    NextDeck,
    PreviousDeck,
    NextDueDeck,
    PreviousDueDeck,
    Enter,
    Select,
    Options,
    Fullscreen,
    VolumeUp,
    VolumeDown,
    HideCursor,
    FocusMainWindow,
}

/// One host-side operation, dispatched from an action binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    App(AppCommand),
    MoveToState(State),
    Key {
        key: Key,
        shift: bool,
        ctrl: bool,
    },
    Click {
        button: MouseButton,
        release: bool,
    },
    Scroll {
        x: i32,
        y: i32,
    },
}

/// Fixed interface to the embedding application and its webview bridge.
///
/// The session calls these on the UI-bound logical thread; implementations
/// must not block in the synchronous methods.
#[async_trait]
pub trait Host: Send + Sync {
    /// Current application context, or `NoFocus` when another window has focus
    fn active_state(&self) -> State;

    /// Snapshot of the add-on configuration store; `None` means the store is
    /// unavailable (fatal at construction)
    fn config(&self) -> Option<AddonConfig>;

    /// Transient, non-blocking notification
    fn notify(&self, text: &str);

    /// Add an entry to the controller selection menu
    fn add_menu_entry(&self, id: &str, label: &str);
    fn remove_menu_entry(&self, id: &str);

    /// Diagnostic highlight used by the profile editor's config mode
    fn set_highlight(&self, index: usize, on: bool);

    fn show_overlay(&self, state: State);
    fn hide_overlay(&self);

    /// Present the quick-select menu with the given sector labels
    fn show_quick_select(&self, state: State, labels: &[String]);
    /// Update which sector is highlighted (`None` clears the highlight)
    fn update_quick_select(&self, selection: Option<usize>);
    fn hide_quick_select(&self);

    /// Execute an application action
    async fn perform(&self, op: HostOp) -> Result<()>;

    /// Move the cursor by a pixel delta
    async fn move_cursor(&self, dx: i32, dy: i32) -> Result<()>;

    /// Scroll the focused view by a unit delta
    async fn scroll_by(&self, dx: i32, dy: i32) -> Result<()>;

    /// Invoke a function in the embedded controller script; the reply, if
    /// any, arrives as a string
    async fn eval_script(&self, call: ScriptCall) -> Result<Option<String>>;
}

/// Host implementation that logs every call.
///
/// Useful for exercising the pipeline from the command line without the real
/// embedding application: actions go to the log, the cursor is virtual, and
/// script calls return no reply.
pub struct ConsoleHost {
    config: AddonConfig,
    state: RwLock<State>,
    cursor: RwLock<(i32, i32)>,
}

impl ConsoleHost {
    pub fn new(config: AddonConfig) -> Self {
        Self {
            config,
            state: RwLock::new(State::DeckBrowser),
            cursor: RwLock::new((0, 0)),
        }
    }

    /// Override the reported application context
    pub async fn set_state(&self, state: State) {
        *self.state.write().await = state;
    }
}

#[async_trait]
impl Host for ConsoleHost {
    fn active_state(&self) -> State {
        // try_read never contends here: the session and setter share one
        // logical thread
        self.state
            .try_read()
            .map(|s| *s)
            .unwrap_or(State::NoFocus)
    }

    fn config(&self) -> Option<AddonConfig> {
        Some(self.config.clone())
    }

    fn notify(&self, text: &str) {
        info!("[notify] {text}");
    }

    fn add_menu_entry(&self, id: &str, label: &str) {
        info!("[menu] + {id}: {label}");
    }

    fn remove_menu_entry(&self, id: &str) {
        info!("[menu] - {id}");
    }

    fn set_highlight(&self, index: usize, on: bool) {
        debug!("[highlight] {index} = {on}");
    }

    fn show_overlay(&self, state: State) {
        debug!("[overlay] show for {}", state.as_str());
    }

    fn hide_overlay(&self) {
        debug!("[overlay] hide");
    }

    fn show_quick_select(&self, state: State, labels: &[String]) {
        info!("[quick-select] show for {}: {labels:?}", state.as_str());
    }

    fn update_quick_select(&self, selection: Option<usize>) {
        debug!("[quick-select] highlight {selection:?}");
    }

    fn hide_quick_select(&self) {
        info!("[quick-select] hide");
    }

    async fn perform(&self, op: HostOp) -> Result<()> {
        info!("[action] {op:?}");
        Ok(())
    }

    async fn move_cursor(&self, dx: i32, dy: i32) -> Result<()> {
        let mut cursor = self.cursor.write().await;
        cursor.0 += dx;
        cursor.1 += dy;
        debug!("[cursor] moved by ({dx}, {dy}) to {cursor:?}");
        Ok(())
    }

    async fn scroll_by(&self, dx: i32, dy: i32) -> Result<()> {
        debug!("[scroll] ({dx}, {dy})");
        Ok(())
    }

    async fn eval_script(&self, call: ScriptCall) -> Result<Option<String>> {
        debug!("[script] {}", call.render());
        Ok(None)
    }
}
