//! Quick-select gesture engine
//!
//! A radial menu driven by stick position. Sectors sit at fixed angles
//! (cardinals first, then nudged diagonals); the stick selects the nearest
//! sector once it leaves the activation ring, and the selection is confirmed
//! on hide or on stick release. Rendering is owned by the host; this engine
//! only tracks the state machine.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::profile::{QuickSelectConfig, State};

/// Stick magnitude (squared) past which a sector can be selected
const ACTIVATION_DISTANCE_SQ: f32 = 0.75;
/// Stick magnitude (squared) under which a release confirm fires
const RELEASE_DISTANCE_SQ: f32 = 0.1;

/// Sector angles for a menu of `count` actions, sorted clockwise from up.
/// Cardinal directions are allocated first; diagonals are nudged off the
/// exact 45-degree lines so they do not shadow the cardinals.
fn sector_angles(count: usize) -> Vec<f32> {
    const ANGLES: [f32; 8] = [
        0.0,
        PI,
        FRAC_PI_2,
        PI + FRAC_PI_2,
        FRAC_PI_4 + PI / 20.0,
        FRAC_PI_2 + FRAC_PI_4 - PI / 20.0,
        PI + FRAC_PI_4 + PI / 20.0,
        TAU - FRAC_PI_4 - PI / 20.0,
    ];
    let mut angles = ANGLES[..count.min(ANGLES.len())].to_vec();
    angles.sort_by(f32::total_cmp);
    angles
}

/// Angle from centre, clockwise from straight up, for cartesian input
fn angle_of(x: f32, y: f32) -> f32 {
    if x == 0.0 {
        return if y > 0.0 { 0.0 } else { PI };
    }
    let mut angle = FRAC_PI_2 - (y / x).atan();
    if x < 0.0 {
        angle += PI;
    }
    angle
}

/// Angular distance accounting for wrap-around
fn angle_distance(a: f32, b: f32) -> f32 {
    let distance = (a - b).abs();
    distance.min((TAU - distance).abs())
}

/// Radial quick-select menu state machine
#[derive(Debug)]
pub struct QuickSelectMenu {
    config: QuickSelectConfig,
    /// Sorted sector angles per state, parallel to the action label lists
    arcs: HashMap<State, Vec<f32>>,
    is_shown: bool,
    selection: Option<usize>,
    current_action: Option<String>,
}

impl QuickSelectMenu {
    pub fn new(config: QuickSelectConfig) -> Self {
        let arcs = config
            .actions
            .iter()
            .filter(|(_, actions)| !actions.is_empty())
            .map(|(state, actions)| (*state, sector_angles(actions.len())))
            .collect();
        Self {
            config,
            arcs,
            is_shown: false,
            selection: None,
            current_action: None,
        }
    }

    /// Question and answer share the review menu
    fn menu_state(state: State) -> State {
        if state.is_review_phase() {
            State::Review
        } else {
            state
        }
    }

    pub fn is_shown(&self) -> bool {
        self.is_shown
    }

    /// A selection is highlighted; only possible while shown
    pub fn is_active(&self) -> bool {
        self.is_shown && self.current_action.is_some()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn do_action_on_stick_press(&self) -> bool {
        self.config.do_action_on_stick_press
    }

    pub fn select_with_dpad(&self) -> bool {
        self.config.select_with_dpad
    }

    /// Action labels for a state, in sector order
    pub fn labels(&self, state: State) -> &[String] {
        self.config
            .actions
            .get(&Self::menu_state(state))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Show the menu for a context. Returns false when already shown, the
    /// gesture is not configured, or the context has no actions.
    pub fn appear(&mut self, state: State) -> bool {
        let state = Self::menu_state(state);
        let enabled = self.config.select_with_stick || self.config.select_with_dpad;
        if self.is_shown || !enabled || self.labels(state).is_empty() {
            return false;
        }
        self.is_shown = true;
        self.selection = None;
        self.current_action = None;
        true
    }

    /// Feed one frame of stick position while shown.
    ///
    /// Returns an action to dispatch when the stick-release confirm fires;
    /// the menu has hidden itself in that case.
    pub fn select(&mut self, state: State, x: f32, y: f32) -> Option<String> {
        let state = Self::menu_state(state);
        if !self.is_shown || self.labels(state).is_empty() {
            return None;
        }
        // Stick y grows downward; the menu reasons with up as positive.
        let y = -y;
        let magnitude_sq = x * x + y * y;
        if magnitude_sq > ACTIVATION_DISTANCE_SQ {
            self.mark_nearest(state, angle_of(x, y));
        } else {
            if self.config.do_action_on_stick_release
                && !self.config.select_with_dpad
                && self.current_action.is_some()
                && magnitude_sq < RELEASE_DISTANCE_SQ
            {
                return self.disappear(true);
            }
            self.selection = None;
            self.current_action = None;
        }
        None
    }

    /// Select a sector from D-pad input while shown
    pub fn dpad_select(&mut self, state: State, up: bool, down: bool, left: bool, right: bool) {
        let state = Self::menu_state(state);
        if !self.is_shown || !self.config.select_with_dpad || self.labels(state).is_empty() {
            return;
        }
        let x = (right as i8 - left as i8) as f32;
        let y = (up as i8 - down as i8) as f32;
        if x == 0.0 && y == 0.0 {
            self.selection = None;
            return;
        }
        self.mark_nearest(state, angle_of(x, y));
    }

    fn mark_nearest(&mut self, state: State, angle: f32) {
        let Some(arcs) = self.arcs.get(&state) else {
            return;
        };
        let nearest = arcs
            .iter()
            .enumerate()
            .map(|(i, sector)| (i, angle_distance(angle, *sector)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((index, distance)) if distance < FRAC_PI_4 => {
                self.selection = Some(index);
                self.current_action = self.labels(state).get(index).cloned();
            }
            // Between sectors: drop the highlight but keep the last action
            // so a quick flick past a gap does not lose the pending confirm.
            _ => self.selection = None,
        }
    }

    /// Hide the menu. With `confirm` (or the confirm-on-release setting) the
    /// highlighted action is handed back for dispatch, exactly once.
    pub fn disappear(&mut self, confirm: bool) -> Option<String> {
        let action = if confirm || self.config.do_action_on_release {
            self.current_action.take()
        } else {
            None
        };
        self.current_action = None;
        self.selection = None;
        self.is_shown = false;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(actions: Vec<&str>) -> QuickSelectConfig {
        QuickSelectConfig {
            actions: HashMap::from([(
                State::Review,
                actions.into_iter().map(str::to_string).collect(),
            )]),
            select_with_stick: true,
            select_with_dpad: false,
            do_action_on_release: false,
            do_action_on_stick_press: true,
            do_action_on_stick_release: false,
        }
    }

    fn shown_menu() -> QuickSelectMenu {
        // Four actions: sectors at 0 (up), pi/2 (right), pi (down), 3pi/2 (left)
        let mut menu = QuickSelectMenu::new(config(vec!["Sync", "Undo", "Redo", "Fullscreen"]));
        assert!(menu.appear(State::Review));
        menu
    }

    #[test]
    fn test_below_deadzone_yields_no_selection() {
        let mut menu = shown_menu();
        assert_eq!(menu.select(State::Review, 0.3, 0.3), None);
        assert_eq!(menu.selection(), None);
        assert!(!menu.is_active());
    }

    #[test]
    fn test_sector_is_deterministic_function_of_angle() {
        // Stick y is inverted: up on the stick is negative y.
        let cases = [
            ((0.0, -1.0), 0, "Sync"),
            ((1.0, 0.0), 1, "Undo"),
            ((0.0, 1.0), 2, "Redo"),
            ((-1.0, 0.0), 3, "Fullscreen"),
        ];
        for ((x, y), sector, action) in cases {
            let mut menu = shown_menu();
            assert_eq!(menu.select(State::Review, x, y), None);
            assert_eq!(menu.selection(), Some(sector), "stick ({x}, {y})");
            assert!(menu.is_active());
            assert_eq!(menu.disappear(true).as_deref(), Some(action));
        }
    }

    #[test]
    fn test_question_answer_collapse_to_review() {
        let mut menu = QuickSelectMenu::new(config(vec!["Sync", "Undo"]));
        assert!(menu.appear(State::Question));
        assert_eq!(menu.select(State::Answer, 1.0, 0.0), None);
        assert!(menu.is_active());
    }

    #[test]
    fn test_disappear_confirm_dispatches_exactly_once() {
        let mut menu = shown_menu();
        menu.select(State::Review, 1.0, 0.0);
        assert_eq!(menu.disappear(true).as_deref(), Some("Undo"));
        assert!(!menu.is_shown());
        // Second hide has nothing left to dispatch
        assert_eq!(menu.disappear(true), None);
    }

    #[test]
    fn test_disappear_without_confirm_dispatches_nothing() {
        let mut menu = shown_menu();
        menu.select(State::Review, 1.0, 0.0);
        assert_eq!(menu.disappear(false), None);
        assert!(!menu.is_shown());
        assert!(!menu.is_active());
    }

    #[test]
    fn test_stick_release_confirm() {
        let mut cfg = config(vec!["Sync", "Undo", "Redo", "Fullscreen"]);
        cfg.do_action_on_stick_release = true;
        let mut menu = QuickSelectMenu::new(cfg);
        assert!(menu.appear(State::Review));
        assert_eq!(menu.select(State::Review, 0.0, -1.0), None);
        // Stick drops back to centre: the highlighted action fires once.
        assert_eq!(menu.select(State::Review, 0.0, 0.0).as_deref(), Some("Sync"));
        assert!(!menu.is_shown());
    }

    #[test]
    fn test_appear_requires_actions_and_setting() {
        let mut menu = QuickSelectMenu::new(config(vec![]));
        assert!(!menu.appear(State::Review));

        let mut cfg = config(vec!["Sync"]);
        cfg.select_with_stick = false;
        let mut menu = QuickSelectMenu::new(cfg);
        assert!(!menu.appear(State::Review));

        // No actions configured for this state at all
        let mut menu = QuickSelectMenu::new(config(vec!["Sync"]));
        assert!(!menu.appear(State::DeckBrowser));
    }

    #[test]
    fn test_never_active_while_hidden() {
        let mut menu = shown_menu();
        menu.select(State::Review, 1.0, 0.0);
        menu.disappear(false);
        assert!(!menu.is_active());
        assert_eq!(menu.select(State::Review, 1.0, 0.0), None);
        assert!(!menu.is_active());
    }

    #[test]
    fn test_dpad_select() {
        let mut cfg = config(vec!["Sync", "Undo", "Redo", "Fullscreen"]);
        cfg.select_with_dpad = true;
        let mut menu = QuickSelectMenu::new(cfg);
        assert!(menu.appear(State::Review));
        menu.dpad_select(State::Review, true, false, false, false);
        assert_eq!(menu.selection(), Some(0));
        menu.dpad_select(State::Review, false, false, false, true);
        assert_eq!(menu.selection(), Some(1));
        menu.dpad_select(State::Review, false, false, false, false);
        assert_eq!(menu.selection(), None);
    }
}
