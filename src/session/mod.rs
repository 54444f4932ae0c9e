//! Controller session - the input state machine
//!
//! Owns the per-connection button/axis state and routes each poll frame:
//! quick-select interception first, then edge-triggered action dispatch,
//! then continuous axis mapping. Connect/disconnect and multi-controller
//! registration manage the host menu entries and the diagnostic snapshot.


use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::actions::{Action, SHOW_QUICK_SELECT, TOGGLE_QUICK_SELECT};
use crate::axes::AxisMapper;
use crate::bridge::{parse_controller_info, BridgeMessage, ControllerDescriptor, ScriptCall};
use crate::config::AddonConfig;
use crate::controller::identify_controller;
use crate::host::Host;
use crate::profile::{AxisAssignment, Profile, ProfileStore, State};
use crate::quick_select::QuickSelectMenu;

/// Button index reserved for stick press; confirms a quick-select selection
const STICK_PRESS_BUTTON: usize = 10;
/// D-pad button indices in standard-gamepad order: up, down, left, right
const DPAD_BUTTONS: &[usize] = &[12, 13, 14, 15];
/// Virtual button indices for axis-as-button bindings start here
const AXIS_BUTTON_BASE: usize = 100;
/// Menu entry id for the add-on options item
const OPTIONS_MENU_ID: &str = "controller-options";

/// One controller session: bridge messages in, host actions out
pub struct Contanki {
    host: Arc<dyn Host>,
    profiles: ProfileStore,
    config: AddonConfig,
    profile: Option<Profile>,
    quick_select: QuickSelectMenu,
    /// Last seen button state, for edge detection
    buttons: Vec<bool>,
    /// Latches for axis-as-button bindings
    axes: Vec<bool>,
    len_buttons: usize,
    len_axes: usize,
    cursor: AxisMapper,
    scroll: AxisMapper,
    /// Menu entry ids currently registered for controller selection
    controller_entries: Vec<String>,
    /// Diagnostic snapshot, refreshed asynchronously; latest write wins
    debug_info: Arc<RwLock<Vec<Vec<String>>>>,
}

impl Contanki {
    /// Create a session. Fails only when the host configuration store is
    /// unavailable.
    pub fn new(host: Arc<dyn Host>, profiles: ProfileStore) -> Result<Self> {
        let config = host.config().context("unable to load add-on config")?;
        let session = Self {
            cursor: AxisMapper::cursor(&config),
            scroll: AxisMapper::scroll(&config),
            host,
            profiles,
            config,
            profile: None,
            quick_select: QuickSelectMenu::new(Default::default()),
            buttons: Vec::new(),
            axes: Vec::new(),
            len_buttons: 0,
            len_axes: 0,
            controller_entries: Vec::new(),
            debug_info: Arc::new(RwLock::new(Vec::new())),
        };
        session.update_debug_info();
        Ok(session)
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Snapshot of the controller diagnostics for the help dialog
    pub async fn debug_info(&self) -> Vec<Vec<String>> {
        self.debug_info.read().await.clone()
    }

    /// Route one raw webview message. Returns false when the message does
    /// not belong to this bridge and should be handed back to the host.
    pub async fn on_receive_message(&mut self, raw: &str) -> Result<bool> {
        let Some(message) = BridgeMessage::parse(raw)? else {
            return Ok(false);
        };
        match message {
            BridgeMessage::OnConnect { buttons, axes, id } => {
                self.on_connect(buttons, axes, &id).await;
            }
            BridgeMessage::OnDisconnect => self.on_disconnect().await,
            BridgeMessage::Poll { buttons, axes } => self.poll(buttons, axes).await,
            BridgeMessage::Register { controllers } => self.register_controllers(&controllers),
            BridgeMessage::Message(text) => self.host.notify(&text),
            BridgeMessage::Initialise => {}
        }
        Ok(true)
    }

    /// Install a profile and rebuild everything derived from it
    fn set_profile(&mut self, profile: Option<Profile>) {
        match profile {
            Some(profile) => {
                self.quick_select = QuickSelectMenu::new(profile.quick_select.clone());
                // Settings may have changed since the last controller
                if let Some(config) = self.host.config() {
                    self.cursor = AxisMapper::cursor(&config);
                    self.scroll = AxisMapper::scroll(&config);
                    self.config = config;
                }
                self.profile = Some(profile);
            }
            None => self.profile = None,
        }
    }

    /// A controller connected through the bridge
    pub async fn on_connect(&mut self, len_buttons: usize, len_axes: usize, id: &str) {
        self.reset_controller().await;
        self.len_buttons = len_buttons;
        self.len_axes = len_axes;

        let Some(identity) = identify_controller(id, len_buttons, len_axes) else {
            // Blocklisted sub-device, ignore the connection entirely
            return;
        };
        let profile = match &identity.name {
            Some(name) => {
                let profile = self.profiles.find_profile(name, len_buttons, len_axes);
                self.host.notify(&format!("{name} Connected"));
                profile
            }
            None => {
                let profile = self.profiles.find_profile(id, len_buttons, len_axes);
                self.host.notify(&format!("Unknown Controller Connected | {id}"));
                profile
            }
        };
        if profile.is_none() {
            warn!("no profile available for '{}'", identity.display);
        }
        self.set_profile(profile);

        self.buttons = vec![false; len_buttons];
        self.axes = vec![false; len_axes];

        self.host.add_menu_entry(OPTIONS_MENU_ID, "Controller Options");
        self.update_debug_info();
    }

    /// The active controller disconnected
    pub async fn on_disconnect(&mut self) {
        for id in std::mem::take(&mut self.controller_entries) {
            self.host.remove_menu_entry(&id);
        }
        self.reset_controller().await;
        self.update_debug_info();
        self.host.notify("Controller Disconnected");
    }

    /// Clear all per-controller state. A selection pending confirm-on-release
    /// still fires, as it would on any other hide.
    async fn reset_controller(&mut self) {
        self.host.hide_overlay();
        let action = self.quick_select.disappear(false);
        self.host.hide_quick_select();
        self.host.remove_menu_entry(OPTIONS_MENU_ID);
        self.buttons.clear();
        self.axes.clear();
        self.profile = None;
        self.update_debug_info();
        if let Some(action) = action {
            self.dispatch(&action).await;
        }
    }

    /// Rebuild the controller selection menu. A menu is only worth showing
    /// when at least two controllers resolved.
    pub fn register_controllers(&mut self, descriptors: &[ControllerDescriptor]) {
        for id in std::mem::take(&mut self.controller_entries) {
            self.host.remove_menu_entry(&id);
        }
        let entries: Vec<(String, String)> = descriptors
            .iter()
            .enumerate()
            .filter_map(|(index, descriptor)| {
                identify_controller(&descriptor.id, descriptor.buttons, descriptor.axes)
                    .map(|identity| (format!("controller-{index}"), identity.display))
            })
            .collect();
        if entries.len() <= 1 {
            return;
        }
        for (id, label) in &entries {
            self.host.add_menu_entry(id, label);
        }
        let count = entries.len();
        self.controller_entries = entries.into_iter().map(|(id, _)| id).collect();
        self.host.notify(&format!(
            "{count} controllers detected - select from the Tools menu."
        ));
    }

    /// Ask the embedded script to switch to another controller slot
    pub async fn change_controller(&self, index: usize) {
        if let Err(err) = self
            .host
            .eval_script(ScriptCall::ConnectController(index))
            .await
        {
            warn!("failed to switch controller: {err:#}");
        }
    }

    /// Refresh the diagnostic snapshot. Fire-and-forget: a stale in-flight
    /// refresh simply gets overwritten on arrival.
    pub fn update_debug_info(&self) {
        let host = self.host.clone();
        let cell = self.debug_info.clone();
        tokio::spawn(async move {
            match host.eval_script(ScriptCall::GetControllerInfo).await {
                Ok(Some(reply)) => *cell.write().await = parse_controller_info(&reply),
                Ok(None) => cell.write().await.clear(),
                Err(err) => debug!("controller info refresh failed: {err:#}"),
            }
        });
    }

    /// Drop the current frame and ask the script to reinitialise
    fn on_error(&self, reason: &str) {
        warn!("input frame dropped: {reason}");
        let host = self.host.clone();
        tokio::spawn(async move {
            if let Err(err) = host.eval_script(ScriptCall::Reinitialise).await {
                debug!("controller reinitialise failed: {err:#}");
            }
        });
    }

    /// Process one input frame. Never raises; bad frames are dropped.
    pub async fn poll(&mut self, mut buttons: Vec<bool>, axes: Vec<f32>) {
        let state = self.host.active_state();
        if state == State::NoFocus {
            return;
        }
        if self.profile.is_none() {
            self.on_error("no active profile");
            return;
        }
        if buttons.is_empty() {
            self.on_error("empty button frame");
            return;
        }

        // Config mode feeds the raw indices to the profile editor's
        // highlighter instead of dispatching anything.
        if state == State::Config {
            for (i, &value) in buttons.iter().enumerate() {
                if let Some(slot) = self.buttons.get_mut(i) {
                    *slot = value;
                }
                self.host.set_highlight(i, value);
            }
            for (i, &axis) in axes.iter().enumerate() {
                self.host.set_highlight(i * 2 + AXIS_BUTTON_BASE + 1, axis > 0.5);
                self.host.set_highlight(i * 2 + AXIS_BUTTON_BASE, axis < -0.5);
            }
            return;
        }

        if self.quick_select.is_shown() {
            if self.quick_select.select_with_dpad() {
                // The D-pad drives the menu instead of the buttons' own
                // bindings; held directions never reach the edge loop.
                let pad: Vec<bool> = DPAD_BUTTONS
                    .iter()
                    .map(|&i| buttons.get(i).copied().unwrap_or(false))
                    .collect();
                self.quick_select
                    .dpad_select(state, pad[0], pad[1], pad[2], pad[3]);
                for &i in DPAD_BUTTONS {
                    if let Some(held) = buttons.get_mut(i) {
                        *held = false;
                    }
                }
                self.host.update_quick_select(self.quick_select.selection());
            } else {
                let x = axes.first().copied().unwrap_or(0.0);
                let y = axes.get(1).copied().unwrap_or(0.0);
                if let Some(action) = self.quick_select.select(state, x, y) {
                    // Stick-release confirm: the menu already hid itself
                    self.host.hide_quick_select();
                    self.dispatch(&action).await;
                } else {
                    self.host.update_quick_select(self.quick_select.selection());
                }
            }

            // Stick press confirms the highlighted selection and suppresses
            // the button's normal press dispatch for this frame.
            if buttons.get(STICK_PRESS_BUTTON).copied().unwrap_or(false)
                && self.quick_select.is_active()
                && self.quick_select.do_action_on_stick_press()
            {
                let action = self.quick_select.disappear(true);
                self.host.hide_quick_select();
                if let Some(action) = action {
                    self.dispatch(&action).await;
                }
                buttons[STICK_PRESS_BUTTON] = false;
            }
        }

        for i in 0..buttons.len().min(self.buttons.len()) {
            let value = buttons[i];
            if value == self.buttons[i] {
                continue;
            }
            self.buttons[i] = value;
            if value {
                self.do_action(state, i).await;
            } else {
                self.do_release_action(state, i).await;
            }
        }

        if axes.iter().any(|&axis| axis != 0.0) && !self.quick_select.is_shown() {
            self.do_axes_actions(state, &axes).await;
        }
    }

    /// Dispatch the press action bound to a button
    pub async fn do_action(&mut self, state: State, button: usize) {
        let Some(profile) = &self.profile else {
            self.on_error("no active profile");
            return;
        };
        let Some(action) = profile.get(state, button).map(str::to_string) else {
            return;
        };
        match action.as_str() {
            TOGGLE_QUICK_SELECT => {
                if self.quick_select.is_shown() {
                    self.hide_quick_select().await;
                } else {
                    self.show_quick_select(state);
                }
            }
            SHOW_QUICK_SELECT => self.show_quick_select(state),
            name => self.dispatch(name).await,
        }
    }

    /// Dispatch the release action bound to a button
    pub async fn do_release_action(&mut self, state: State, button: usize) {
        let Some(profile) = &self.profile else {
            self.on_error("no active profile");
            return;
        };
        let Some(action) = profile.get(state, button).map(str::to_string) else {
            return;
        };
        if action == SHOW_QUICK_SELECT {
            self.hide_quick_select().await;
            return;
        }
        if let Some(op) = Action::from_name(&action).and_then(Action::release_op) {
            if let Err(err) = self.host.perform(op).await {
                self.host.notify(&format!("Error: {err}"));
            }
        }
    }

    /// Look an action name up in the press registry and run it. Failures
    /// become a notification; one broken binding must not stall polling.
    async fn dispatch(&self, name: &str) {
        let Some(action) = Action::from_name(name) else {
            return;
        };
        if let Err(err) = self.host.perform(action.press_op()).await {
            self.host.notify(&format!("Error: {err}"));
        }
    }

    fn show_quick_select(&mut self, state: State) {
        if self.quick_select.is_shown() {
            return;
        }
        if self.quick_select.appear(state) {
            self.host
                .show_quick_select(state, self.quick_select.labels(state));
            if self.config.enable_overlays {
                self.host.show_overlay(state);
            }
        }
    }

    async fn hide_quick_select(&mut self) {
        let action = self.quick_select.disappear(false);
        self.host.hide_quick_select();
        self.host.hide_overlay();
        // Re-latch so axis buttons do not fire from a deflection that was
        // part of the gesture.
        self.axes = vec![true; self.len_axes];
        if let Some(action) = action {
            self.dispatch(&action).await;
        }
    }

    /// Run the continuous axis assignments for one frame
    async fn do_axes_actions(&mut self, state: State, axes: &[f32]) {
        let Some(profile) = &self.profile else {
            self.on_error("no active profile");
            return;
        };
        let assignments: Vec<(usize, AxisAssignment)> = profile
            .axes_bindings
            .iter()
            .map(|(axis, assignment)| (*axis, *assignment))
            .collect();

        let mut mouse = (0.0f32, 0.0f32);
        let mut scroll = (0.0f32, 0.0f32);
        for ((axis, assignment), &value) in assignments.iter().zip(axes.iter()) {
            match assignment {
                AxisAssignment::Unassigned => {}
                AxisAssignment::Buttons => {
                    if value.abs() > 0.5 {
                        if !self.axes.get(*axis).copied().unwrap_or(true) {
                            let button =
                                *axis * 2 + AXIS_BUTTON_BASE + (value > 0.0) as usize;
                            self.do_action(state, button).await;
                            if let Some(latch) = self.axes.get_mut(*axis) {
                                *latch = true;
                            }
                        }
                    } else if let Some(latch) = self.axes.get_mut(*axis) {
                        *latch = false;
                    }
                }
                AxisAssignment::ScrollHorizontal => scroll.0 = value,
                AxisAssignment::ScrollVertical => scroll.1 = value,
                AxisAssignment::CursorHorizontal => mouse.0 = value,
                AxisAssignment::CursorVertical => mouse.1 = value,
            }
        }

        if mouse.0 != 0.0 || mouse.1 != 0.0 {
            if let Some((dx, dy)) = self.cursor.apply(mouse.0, mouse.1) {
                if let Err(err) = self.host.move_cursor(dx, dy).await {
                    self.host.notify(&format!("Error: {err}"));
                }
            }
        }
        if scroll.0 != 0.0 || scroll.1 != 0.0 {
            if let Some((dx, dy)) = self.scroll.apply(scroll.0, scroll.1) {
                if let Err(err) = self.host.scroll_by(dx, dy).await {
                    self.host.notify(&format!("Error: {err}"));
                }
            }
        }
    }
}
