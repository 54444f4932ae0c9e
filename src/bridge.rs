//! Webview bridge protocol
//!
//! Messages from the embedded controller script arrive as `::`-delimited
//! strings prefixed with `contanki`. They are parsed here into a tagged
//! union; the wire field order is load-bearing and must not change. The
//! reverse direction is a named script call rendered back to JavaScript.

use thiserror::Error;

/// Errors produced while decoding a bridge message
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown bridge function: {0}")]
    UnknownFunction(String),
    #[error("missing field `{0}` in `{1}` message")]
    MissingField(&'static str, &'static str),
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

/// A controller as described by the `register` message.
///
/// Entries on the wire are `::`-separated, each entry `%%%`-joined as
/// `id%%%buttons%%%axes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescriptor {
    pub id: String,
    pub buttons: usize,
    pub axes: usize,
}

impl ControllerDescriptor {
    fn parse(entry: &str) -> Result<Self, BridgeError> {
        let mut fields = entry.split("%%%");
        let id = fields
            .next()
            .ok_or(BridgeError::MissingField("id", "register"))?
            .to_string();
        let buttons = parse_count(fields.next(), "register")?;
        let axes = parse_count(fields.next(), "register")?;
        Ok(Self { id, buttons, axes })
    }
}

/// A message from the embedded script
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeMessage {
    /// A controller connected: button count, axis count, raw id string.
    /// The id may itself contain `::` and is rejoined from the tail fields.
    OnConnect {
        buttons: usize,
        axes: usize,
        id: String,
    },
    OnDisconnect,
    /// One input frame: button booleans and axis values in [-1, 1]
    Poll { buttons: Vec<bool>, axes: Vec<f32> },
    /// Multiple controllers are present and selectable
    Register {
        controllers: Vec<ControllerDescriptor>,
    },
    /// Free text to surface verbatim as a transient notification
    Message(String),
    /// Handshake from the script; acknowledged without effect
    Initialise,
}

impl BridgeMessage {
    /// Parse a raw webview message.
    ///
    /// Returns `Ok(None)` for messages that do not carry the `contanki`
    /// prefix, so the caller can hand them back to the host's message chain.
    pub fn parse(raw: &str) -> Result<Option<Self>, BridgeError> {
        let Some(body) = raw.strip_prefix("contanki::") else {
            return Ok(None);
        };
        let mut parts = body.split("::");
        let func = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let message = match func {
            "on_connect" => {
                let buttons = parse_count(args.first().copied(), "on_connect")?;
                let axes = parse_count(args.get(1).copied(), "on_connect")?;
                let id = args.get(2..).unwrap_or_default().join("::");
                Self::OnConnect { buttons, axes, id }
            }
            "on_disconnect" => Self::OnDisconnect,
            "poll" => {
                let buttons = args
                    .first()
                    .ok_or(BridgeError::MissingField("buttons", "poll"))?;
                let axes = args
                    .get(1)
                    .ok_or(BridgeError::MissingField("axes", "poll"))?;
                Self::Poll {
                    buttons: parse_buttons(buttons),
                    axes: parse_axes(axes)?,
                }
            }
            "register" => {
                let controllers = args
                    .iter()
                    .filter(|entry| !entry.is_empty())
                    .map(|entry| ControllerDescriptor::parse(entry))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::Register { controllers }
            }
            "message" => Self::Message(args.join("::")),
            "initialise" => Self::Initialise,
            other => return Err(BridgeError::UnknownFunction(other.to_string())),
        };
        Ok(Some(message))
    }
}

fn parse_count(field: Option<&str>, context: &'static str) -> Result<usize, BridgeError> {
    let field = field.ok_or(BridgeError::MissingField("count", context))?;
    field
        .trim()
        .parse::<usize>()
        .map_err(|_| BridgeError::InvalidValue("count", field.to_string()))
}

fn parse_buttons(raw: &str) -> Vec<bool> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|b| b == "true").collect()
}

fn parse_axes(raw: &str) -> Result<Vec<f32>, BridgeError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|a| {
            a.trim()
                .parse::<f32>()
                .map_err(|_| BridgeError::InvalidValue("axis", a.to_string()))
        })
        .collect()
}

/// A call into the embedded script (core -> webview)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCall {
    /// Switch the active controller to the slot at `index`
    ConnectController(usize),
    /// Request the diagnostic controller snapshot
    GetControllerInfo,
    /// Ask the script to tear down and reconnect the controller
    Reinitialise,
}

impl ScriptCall {
    /// Render the JavaScript expression for this call
    pub fn render(&self) -> String {
        match self {
            Self::ConnectController(index) => format!("connect_controller(indices[{index}]);"),
            Self::GetControllerInfo => "get_controller_info()".to_string(),
            Self::Reinitialise => "on_controller_disconnect()".to_string(),
        }
    }
}

/// Parse the `get_controller_info` reply into the debug snapshot.
///
/// Controllers are `%%%`-separated, fields within a controller `%`-separated.
pub fn parse_controller_info(raw: &str) -> Vec<Vec<String>> {
    raw.split("%%%")
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.split('%').map(str::to_string).collect())
        .collect()
}
