//! Contanki GW - gamepad-to-action gateway
//!
//! Translates raw controller input delivered by an embedded webview bridge into
//! host application actions: edge detection over button state, profile-driven
//! dispatch, a radial quick-select gesture menu, and continuous axis mapping
//! (cursor movement, scrolling).

pub mod actions;
pub mod axes;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod host;
pub mod profile;
pub mod quick_select;
pub mod session;

pub use config::AddonConfig;
pub use host::{ConsoleHost, Host};
pub use profile::{Profile, ProfileStore, State};
pub use session::Contanki;
