//! Profiles: per-controller mappings from (context, button) to action names
//!
//! A profile is loaded and persisted externally; the session only reads it.
//! Bindings are keyed by context state and button index, with question/answer
//! inheriting from review and everything inheriting from `all`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Context under which a binding set applies.
///
/// Owned by the host application; the core treats it as a lookup key. The
/// string forms match the host's state names and the stored profile format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum State {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "deckBrowser")]
    DeckBrowser,
    #[serde(rename = "overview")]
    Overview,
    #[serde(rename = "review")]
    Review,
    #[serde(rename = "question")]
    Question,
    #[serde(rename = "answer")]
    Answer,
    #[serde(rename = "dialog")]
    Dialog,
    #[serde(rename = "config")]
    Config,
    #[serde(rename = "NoFocus")]
    NoFocus,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::DeckBrowser => "deckBrowser",
            Self::Overview => "overview",
            Self::Review => "review",
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Dialog => "dialog",
            Self::Config => "config",
            Self::NoFocus => "NoFocus",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "all" => Self::All,
            "deckBrowser" => Self::DeckBrowser,
            "overview" => Self::Overview,
            "review" => Self::Review,
            "question" => Self::Question,
            "answer" => Self::Answer,
            "dialog" => Self::Dialog,
            "config" => Self::Config,
            "NoFocus" => Self::NoFocus,
            _ => return None,
        })
    }

    /// Question and answer share the review binding set in several places.
    pub fn is_review_phase(self) -> bool {
        matches!(self, Self::Question | Self::Answer)
    }
}

/// Role bound to a continuous input axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum AxisAssignment {
    #[default]
    Unassigned,
    Buttons,
    #[serde(rename = "Scroll Horizontal")]
    ScrollHorizontal,
    #[serde(rename = "Scroll Vertical")]
    ScrollVertical,
    #[serde(rename = "Cursor Horizontal")]
    CursorHorizontal,
    #[serde(rename = "Cursor Vertical")]
    CursorVertical,
}

/// Quick-select gesture configuration, nested inside a profile
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuickSelectConfig {
    /// Action labels per context, in radial sector order
    pub actions: HashMap<State, Vec<String>>,
    #[serde(rename = "Select with Stick")]
    pub select_with_stick: bool,
    #[serde(rename = "Select with D-Pad")]
    pub select_with_dpad: bool,
    #[serde(rename = "Do Action on Release")]
    pub do_action_on_release: bool,
    #[serde(rename = "Do Action on Stick Press")]
    pub do_action_on_stick_press: bool,
    #[serde(rename = "Do Action on Stick Release")]
    pub do_action_on_stick_release: bool,
}

impl Default for QuickSelectConfig {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
            select_with_stick: true,
            select_with_dpad: false,
            do_action_on_release: true,
            do_action_on_stick_press: true,
            do_action_on_stick_release: false,
        }
    }
}

/// Immutable control bindings for one controller
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
    /// Resolved controller name this profile was built for
    pub controller: String,
    /// (button count, axis count)
    pub size: (usize, usize),
    #[serde(default)]
    pub bindings: HashMap<State, HashMap<usize, String>>,
    /// Ordered mapping from axis index to its role
    #[serde(default)]
    pub axes_bindings: BTreeMap<usize, AxisAssignment>,
    #[serde(default)]
    pub quick_select: QuickSelectConfig,
}

impl Profile {
    pub fn new(name: impl Into<String>, controller: impl Into<String>, size: (usize, usize)) -> Self {
        let mut profile = Self {
            name: name.into(),
            controller: controller.into(),
            size,
            bindings: HashMap::new(),
            axes_bindings: BTreeMap::new(),
            quick_select: QuickSelectConfig::default(),
        };
        // Pressing anything while unfocused pulls the main window back.
        profile.set(State::NoFocus, 0, "Focus Main Window");
        profile
    }

    pub fn len_buttons(&self) -> usize {
        self.size.0
    }

    pub fn len_axes(&self) -> usize {
        self.size.1
    }

    fn lookup(&self, state: State, button: usize) -> Option<&str> {
        self.bindings
            .get(&state)
            .and_then(|buttons| buttons.get(&button))
            .map(String::as_str)
            .filter(|action| !action.is_empty())
    }

    /// Resolve the action for a button, following the inheritance chain:
    /// question/answer fall back to review, and every state falls back to `all`.
    pub fn get(&self, state: State, button: usize) -> Option<&str> {
        self.lookup(state, button)
            .or_else(|| {
                state
                    .is_review_phase()
                    .then(|| self.lookup(State::Review, button))
                    .flatten()
            })
            .or_else(|| self.lookup(State::All, button))
    }

    pub fn set(&mut self, state: State, button: usize, action: impl Into<String>) {
        self.bindings
            .entry(state)
            .or_default()
            .insert(button, action.into());
    }

    pub fn set_axis(&mut self, axis: usize, assignment: AxisAssignment) {
        self.axes_bindings.insert(axis, assignment);
    }
}

/// In-memory profile collection plus the controller-to-profile assignment map
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: HashMap<String, Profile>,
    controllers: HashMap<String, String>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Record that a controller should use a named profile
    pub fn assign(&mut self, controller: impl Into<String>, profile: impl Into<String>) {
        self.controllers.insert(controller.into(), profile.into());
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Find the best profile for a controller: the user's assignment first,
    /// then a profile named for the controller, then a generic profile shaped
    /// to the reported counts, then the 16-button/4-axis generic fallback.
    pub fn find_profile(&self, controller: &str, len_buttons: usize, len_axes: usize) -> Option<Profile> {
        if let Some(assigned) = self.controllers.get(controller) {
            if let Some(profile) = self.profiles.get(assigned) {
                return Some(Self::shape(profile.clone(), controller, len_buttons, len_axes));
            }
            warn!(
                "Assigned profile '{}' for '{}' is missing, falling back",
                assigned, controller
            );
        }

        let sized = format!("Standard Gamepad ({len_buttons} Buttons, {len_axes} Axes)");
        let template = self
            .profiles
            .get(controller)
            .or_else(|| self.profiles.get(&sized))
            .or_else(|| self.profiles.get("Standard Gamepad (16 Buttons, 4 Axes)"))?;

        Some(Self::shape(template.clone(), controller, len_buttons, len_axes))
    }

    fn shape(mut profile: Profile, controller: &str, len_buttons: usize, len_axes: usize) -> Profile {
        profile.name = controller.to_string();
        profile.controller = controller.to_string();
        profile.size = (len_buttons, len_axes);
        profile
    }

    /// Store with the built-in generic profile, used by the binary and tests.
    pub fn builtin() -> Self {
        let mut profile = Profile::new(
            "Standard Gamepad (16 Buttons, 4 Axes)",
            "Standard Gamepad",
            (16, 4),
        );
        profile.set(State::All, 0, "Enter");
        profile.set(State::All, 1, "Back");
        profile.set(State::All, 2, "Undo");
        profile.set(State::All, 3, "Options");
        profile.set(State::All, 8, "Fullscreen");
        profile.set(State::All, 9, "Toggle Quick Select");
        profile.set(State::All, 12, "Up");
        profile.set(State::All, 13, "Down");
        profile.set(State::DeckBrowser, 14, "Previous Deck");
        profile.set(State::DeckBrowser, 15, "Next Deck");
        profile.set(State::Review, 4, "Click");
        profile.set(State::Review, 5, "Secondary Click");
        // Axis virtual buttons live at index 100 and up.
        profile.set(State::All, 104, "Scroll Up");
        profile.set(State::All, 105, "Scroll Down");
        profile.set_axis(0, AxisAssignment::CursorHorizontal);
        profile.set_axis(1, AxisAssignment::CursorVertical);
        profile.set_axis(2, AxisAssignment::ScrollHorizontal);
        profile.set_axis(3, AxisAssignment::ScrollVertical);
        profile.quick_select.actions.insert(
            State::Review,
            vec![
                "Sync".to_string(),
                "Undo".to_string(),
                "Redo".to_string(),
                "Fullscreen".to_string(),
            ],
        );
        profile.quick_select.actions.insert(
            State::DeckBrowser,
            vec!["Sync".to_string(), "Statistics".to_string()],
        );

        let mut store = Self::new();
        store.insert(profile);
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_profile() -> Profile {
        let mut profile = Profile::new("test", "Test Pad", (16, 4));
        profile.set(State::All, 0, "Enter");
        profile.set(State::Review, 0, "Undo");
        profile.set(State::Question, 1, "Redo");
        profile
    }

    #[test]
    fn test_binding_inheritance() {
        let profile = review_profile();
        // Direct hit
        assert_eq!(profile.get(State::Question, 1), Some("Redo"));
        // Question inherits review before all
        assert_eq!(profile.get(State::Question, 0), Some("Undo"));
        assert_eq!(profile.get(State::Answer, 0), Some("Undo"));
        // Other states inherit straight from all
        assert_eq!(profile.get(State::DeckBrowser, 0), Some("Enter"));
        assert_eq!(profile.get(State::DeckBrowser, 1), None);
    }

    #[test]
    fn test_empty_binding_is_unbound() {
        let mut profile = review_profile();
        profile.set(State::All, 2, "");
        assert_eq!(profile.get(State::Overview, 2), None);
    }

    #[test]
    fn test_nofocus_default_binding() {
        let profile = Profile::new("p", "c", (4, 0));
        assert_eq!(profile.get(State::NoFocus, 0), Some("Focus Main Window"));
    }

    #[test]
    fn test_find_profile_prefers_assignment() {
        let mut store = ProfileStore::builtin();
        let mut custom = Profile::new("My Bindings", "DualSense", (18, 4));
        custom.set(State::All, 0, "Sync");
        store.insert(custom);
        store.assign("DualSense", "My Bindings");

        let found = store.find_profile("DualSense", 18, 4).unwrap();
        assert_eq!(found.get(State::Review, 0), Some("Sync"));
        assert_eq!(found.name, "DualSense");
        assert_eq!(found.size, (18, 4));
    }

    #[test]
    fn test_find_profile_generic_fallback_is_shaped() {
        let store = ProfileStore::builtin();
        let found = store.find_profile("Mystery Pad", 17, 4).unwrap();
        assert_eq!(found.name, "Mystery Pad");
        assert_eq!(found.controller, "Mystery Pad");
        assert_eq!(found.size, (17, 4));
    }

    #[test]
    fn test_find_profile_missing_assignment_falls_back() {
        let mut store = ProfileStore::builtin();
        store.assign("DualSense", "Deleted Profile");
        assert!(store.find_profile("DualSense", 18, 4).is_some());
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let profile = review_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(State::Answer, 0), Some("Undo"));
        assert_eq!(back.size, (16, 4));
    }

    #[test]
    fn test_axis_assignment_strings() {
        let json = serde_json::to_string(&AxisAssignment::ScrollHorizontal).unwrap();
        assert_eq!(json, "\"Scroll Horizontal\"");
        let back: AxisAssignment = serde_json::from_str("\"Cursor Vertical\"").unwrap();
        assert_eq!(back, AxisAssignment::CursorVertical);
    }
}
