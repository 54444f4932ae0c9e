//! Controller identity resolution
//!
//! Browser gamepad ids are free-form vendor strings. Resolution goes through
//! two layers: an exact vendor/product table for ids that embed USB ids, then
//! substring heuristics with button/axis-count disambiguation for devices
//! that share an id family. Unrecognized ids keep the raw string as the name.

/// Vendor/product pairs for ids carrying `Vendor: xxxx` / `Product: xxxx`.
/// A name of "invalid" marks devices that must be ignored outright
/// (motion/touchpad sub-devices that also enumerate as gamepads).
const DEVICE_TABLE: &[(&str, &str, &str)] = &[
    ("054c", "0268", "DualShock 3"),
    ("054c", "05c4", "DualShock 4"),
    ("054c", "09cc", "DualShock 4"),
    ("054c", "0ce6", "DualSense"),
    ("054c", "0df2", "DualSense"),
    ("054c", "0ba0", "invalid"),
    ("045e", "028e", "Xbox 360"),
    ("045e", "02d1", "Xbox One"),
    ("045e", "02ea", "Xbox One"),
    ("045e", "0b12", "Xbox Series"),
    ("045e", "0b13", "Xbox Series"),
    ("057e", "2006", "Joy-Con Left"),
    ("057e", "2007", "Joy-Con Right"),
    ("057e", "2009", "Switch Pro"),
    ("28de", "1102", "Steam Controller"),
    ("28de", "1142", "Steam Controller"),
    ("2dc8", "9018", "8Bitdo Zero"),
    ("2dc8", "6100", "8Bitdo Lite"),
];

/// Canonical names the profile layer ships bindings for.
const KNOWN_CONTROLLERS: &[&str] = &[
    "PlayStation Controller",
    "DualShock 3",
    "DualShock 4",
    "DualSense",
    "Xbox 360",
    "Xbox One",
    "Xbox Series",
    "Switch Pro",
    "Joy-Con",
    "Joy-Con Left",
    "Joy-Con Right",
    "Wii Remote",
    "Wii Nunchuck",
    "Steam Controller",
    "8Bitdo Zero",
    "8Bitdo Lite",
];

/// Result of resolving a controller id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerIdentity {
    /// Canonical name, or `None` when the id was not recognized
    pub name: Option<String>,
    /// Name (or raw id) with the button count, for menus and notifications
    pub display: String,
}

impl ControllerIdentity {
    fn known(name: &str, len_buttons: usize) -> Self {
        Self {
            name: Some(name.to_string()),
            display: format!("{name} ({len_buttons} buttons)"),
        }
    }

    fn unknown(id: &str, len_buttons: usize) -> Self {
        Self {
            name: None,
            display: format!("{id} ({len_buttons} buttons)"),
        }
    }
}

/// Extract a four-character hex id following a label such as "Vendor: ".
fn hex_field<'a>(id: &'a str, label: &str) -> Option<&'a str> {
    let start = id.find(label)? + label.len();
    let field = id.get(start..start + 4)?;
    field
        .chars()
        .all(|c| c.is_ascii_hexdigit())
        .then_some(field)
}

/// Identify a controller from its raw id and reported capabilities.
///
/// Returns `None` for devices marked invalid in the device table; everything
/// else resolves, falling back to the raw id when no heuristic matches.
pub fn identify_controller(
    id: &str,
    len_buttons: usize,
    len_axes: usize,
) -> Option<ControllerIdentity> {
    if let (Some(vendor), Some(product)) = (hex_field(id, "Vendor: "), hex_field(id, "Product: ")) {
        let vendor = vendor.to_ascii_lowercase();
        let product = product.to_ascii_lowercase();
        if let Some((_, _, name)) = DEVICE_TABLE
            .iter()
            .find(|(v, p, _)| *v == vendor && *p == product)
        {
            if *name == "invalid" {
                return None;
            }
            if KNOWN_CONTROLLERS.contains(name) {
                return Some(ControllerIdentity::known(name, len_buttons));
            }
        }
    }

    let lowered = id.to_ascii_lowercase();
    let name = if lowered.contains("dualshock")
        || lowered.contains("dualsense")
        || lowered.contains("playstation")
        || lowered.contains("sony")
    {
        if len_axes == 0 {
            Some("PlayStation Controller")
        } else if lowered.contains("dualsense") {
            Some("DualSense")
        } else if len_buttons == 17 {
            Some("DualShock 3")
        } else if len_buttons == 18 {
            Some("DualShock 4")
        } else {
            None
        }
    } else if lowered.contains("xbox") {
        if lowered.contains("360") || lowered.contains("adaptive") {
            Some("Xbox 360")
        } else if lowered.contains("elite") || lowered.contains("series") {
            Some("Xbox Series")
        } else if lowered.contains("one") {
            Some("Xbox One")
        } else if len_buttons == 16 {
            Some("Xbox 360")
        } else if len_buttons > 16 {
            Some("Xbox Series")
        } else {
            None
        }
    } else if lowered.contains("joycon") || lowered.contains("joy-con") || lowered.contains("switch")
    {
        if lowered.contains("pro") {
            Some("Switch Pro")
        } else if lowered.contains("left") {
            Some("Joy-Con Left")
        } else if lowered.contains("right") {
            Some("Joy-Con Right")
        } else {
            Some("Joy-Con")
        }
    } else if lowered.contains("wii") {
        if lowered.contains("nunchuck") {
            Some("Wii Nunchuck")
        } else {
            Some("Wii Remote")
        }
    } else if lowered.contains("steam") || lowered.contains("valve") {
        Some("Steam Controller")
    } else if lowered.contains("8bitdo") {
        if lowered.contains("zero") {
            Some("8Bitdo Zero")
        } else {
            Some("8Bitdo Lite")
        }
    } else {
        None
    };

    Some(match name {
        Some(name) => ControllerIdentity::known(name, len_buttons),
        None => ControllerIdentity::unknown(id, len_buttons),
    })
}
