//! Action vocabulary and dispatch tables
//!
//! Profiles store human-readable action names; those resolve here into a
//! closed [`Action`] enumeration with a press operation and, for the click
//! actions, a release operation. Unknown names resolve to nothing and are
//! skipped by dispatch rather than treated as errors, so profiles written
//! for a newer action set degrade gracefully.

use crate::host::{AppCommand, HostOp, Key, MouseButton};
use crate::profile::State;

/// Scroll units for the discrete scroll actions
const SCROLL_STEP: i32 = 5;

/// Sentinel action that toggles the quick-select menu; handled by the
/// session before registry lookup
pub const TOGGLE_QUICK_SELECT: &str = "Toggle Quick Select";
/// Sentinel action that shows the menu on press and hides it on release
pub const SHOW_QUICK_SELECT: &str = "Show Quick Select";

/// Closed set of dispatchable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Sync,
    Overview,
    Browser,
    Statistics,
    MainScreen,
    Review,
    NextDeck,
    PreviousDeck,
    NextDueDeck,
    PreviousDueDeck,
    Undo,
    Redo,
    Back,
    Forward,
    Enter,
    Fullscreen,
    VolumeUp,
    VolumeDown,
    Add,
    Preferences,
    Quit,
    HideCursor,
    Click,
    SecondaryClick,
    SelectNext,
    SelectPrevious,
    Select,
    Escape,
    Up,
    Down,
    UpByTen,
    DownByTen,
    ScrollUp,
    ScrollDown,
    Options,
    FocusMainWindow,
}

impl Action {
    /// Resolve a profile action name. Empty strings and modifier
    /// placeholders are deliberately unmapped.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Sync" => Self::Sync,
            "Overview" => Self::Overview,
            "Browser" => Self::Browser,
            "Statistics" => Self::Statistics,
            "Main Screen" => Self::MainScreen,
            "Review" => Self::Review,
            "Next Deck" => Self::NextDeck,
            "Previous Deck" => Self::PreviousDeck,
            "Next Due Deck" => Self::NextDueDeck,
            "Previous Due Deck" => Self::PreviousDueDeck,
            "Undo" => Self::Undo,
            "Redo" => Self::Redo,
            "Back" => Self::Back,
            "Forward" => Self::Forward,
            "Enter" => Self::Enter,
            "Fullscreen" => Self::Fullscreen,
            "Volume Up" => Self::VolumeUp,
            "Volume Down" => Self::VolumeDown,
            "Add" => Self::Add,
            "Preferences" => Self::Preferences,
            "Quit" => Self::Quit,
            "Hide Cursor" => Self::HideCursor,
            "Click" => Self::Click,
            "Secondary Click" => Self::SecondaryClick,
            "Select Next" => Self::SelectNext,
            "Select Previous" => Self::SelectPrevious,
            "Select" => Self::Select,
            "Escape" => Self::Escape,
            "Up" => Self::Up,
            "Down" => Self::Down,
            "Up by 10" => Self::UpByTen,
            "Down by 10" => Self::DownByTen,
            "Scroll Up" => Self::ScrollUp,
            "Scroll Down" => Self::ScrollDown,
            "Options" => Self::Options,
            "Focus Main Window" => Self::FocusMainWindow,
            _ => return None,
        })
    }

    /// Operation to run when the bound button is pressed
    pub fn press_op(self) -> HostOp {
        match self {
            Self::Sync => HostOp::App(AppCommand::Sync),
            Self::Overview => HostOp::MoveToState(State::Overview),
            Self::Browser => HostOp::App(AppCommand::Browser),
            Self::Statistics => HostOp::App(AppCommand::Statistics),
            Self::MainScreen => HostOp::MoveToState(State::DeckBrowser),
            Self::Review => HostOp::MoveToState(State::Review),
            Self::NextDeck => HostOp::App(AppCommand::NextDeck),
            Self::PreviousDeck => HostOp::App(AppCommand::PreviousDeck),
            Self::NextDueDeck => HostOp::App(AppCommand::NextDueDeck),
            Self::PreviousDueDeck => HostOp::App(AppCommand::PreviousDueDeck),
            Self::Undo => HostOp::App(AppCommand::Undo),
            Self::Redo => HostOp::App(AppCommand::Redo),
            Self::Back => HostOp::App(AppCommand::Back),
            Self::Forward => HostOp::App(AppCommand::Forward),
            Self::Enter => HostOp::App(AppCommand::Enter),
            Self::Fullscreen => HostOp::App(AppCommand::Fullscreen),
            Self::VolumeUp => HostOp::App(AppCommand::VolumeUp),
            Self::VolumeDown => HostOp::App(AppCommand::VolumeDown),
            Self::Add => HostOp::App(AppCommand::AddCard),
            Self::Preferences => HostOp::App(AppCommand::Preferences),
            Self::Quit => HostOp::App(AppCommand::Quit),
            Self::HideCursor => HostOp::App(AppCommand::HideCursor),
            Self::Click => HostOp::Click {
                button: MouseButton::Left,
                release: false,
            },
            Self::SecondaryClick => HostOp::Click {
                button: MouseButton::Right,
                release: false,
            },
            Self::SelectNext => HostOp::Key {
                key: Key::Tab,
                shift: false,
                ctrl: false,
            },
            Self::SelectPrevious => HostOp::Key {
                key: Key::Tab,
                shift: true,
                ctrl: false,
            },
            Self::Select => HostOp::App(AppCommand::Select),
            Self::Escape => HostOp::Key {
                key: Key::Escape,
                shift: false,
                ctrl: false,
            },
            Self::Up => HostOp::Key {
                key: Key::Up,
                shift: false,
                ctrl: false,
            },
            Self::Down => HostOp::Key {
                key: Key::Down,
                shift: false,
                ctrl: false,
            },
            Self::UpByTen => HostOp::Key {
                key: Key::Up,
                shift: false,
                ctrl: true,
            },
            Self::DownByTen => HostOp::Key {
                key: Key::Down,
                shift: false,
                ctrl: true,
            },
            Self::ScrollUp => HostOp::Scroll {
                x: 0,
                y: -SCROLL_STEP,
            },
            Self::ScrollDown => HostOp::Scroll { x: 0, y: SCROLL_STEP },
            Self::Options => HostOp::App(AppCommand::Options),
            Self::FocusMainWindow => HostOp::App(AppCommand::FocusMainWindow),
        }
    }

    /// Operation to run when the bound button is released, if any. Only the
    /// click actions hold state between press and release.
    pub fn release_op(self) -> Option<HostOp> {
        match self {
            Self::Click => Some(HostOp::Click {
                button: MouseButton::Left,
                release: true,
            }),
            Self::SecondaryClick => Some(HostOp::Click {
                button: MouseButton::Right,
                release: true,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_and_placeholder_names_are_noops() {
        assert_eq!(Action::from_name(""), None);
        assert_eq!(Action::from_name("mod"), None);
        assert_eq!(Action::from_name("Launch Missiles"), None);
    }

    #[test]
    fn test_press_ops() {
        assert_eq!(
            Action::from_name("Sync").unwrap().press_op(),
            HostOp::App(AppCommand::Sync)
        );
        assert_eq!(
            Action::from_name("Main Screen").unwrap().press_op(),
            HostOp::MoveToState(State::DeckBrowser)
        );
        assert_eq!(
            Action::from_name("Select Previous").unwrap().press_op(),
            HostOp::Key {
                key: Key::Tab,
                shift: true,
                ctrl: false,
            }
        );
    }

    #[test]
    fn test_builtin_profile_bindings_all_resolve() {
        let store = crate::profile::ProfileStore::builtin();
        let profile = store
            .get("Standard Gamepad (16 Buttons, 4 Axes)")
            .unwrap();
        let sentinel = |name: &str| name == TOGGLE_QUICK_SELECT || name == SHOW_QUICK_SELECT;
        for buttons in profile.bindings.values() {
            for name in buttons.values() {
                assert!(
                    Action::from_name(name).is_some() || sentinel(name),
                    "unresolvable binding: {name}"
                );
            }
        }
        for actions in profile.quick_select.actions.values() {
            for name in actions {
                assert!(
                    Action::from_name(name).is_some(),
                    "unresolvable quick-select action: {name}"
                );
            }
        }
    }

    #[test]
    fn test_deck_navigation_actions() {
        assert_eq!(
            Action::from_name("Previous Deck").unwrap().press_op(),
            HostOp::App(AppCommand::PreviousDeck)
        );
        assert_eq!(
            Action::from_name("Next Due Deck").unwrap().press_op(),
            HostOp::App(AppCommand::NextDueDeck)
        );
    }

    #[test]
    fn test_release_only_for_click_actions() {
        assert!(Action::Click.release_op().is_some());
        assert!(Action::SecondaryClick.release_op().is_some());
        assert_eq!(Action::Sync.release_op(), None);
        assert_eq!(Action::ScrollDown.release_op(), None);
    }
}
