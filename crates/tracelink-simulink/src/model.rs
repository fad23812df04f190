//! Block-diagram entities and the endpoint grammar

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Default rectangle for blocks without a parseable position
pub(crate) const DEFAULT_POSITION: (i32, i32, i32, i32) = (0, 0, 100, 50);

/// One diagram block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Simulink id, unique per model
    pub sid: String,
    /// Block name
    pub name: String,
    /// Block type (Gain, Sum, Inport, ...)
    pub block_type: String,
    /// Position rectangle (x, y, width, height)
    pub position: (i32, i32, i32, i32),
    /// Remaining descriptor properties (position/z-order excluded)
    pub properties: IndexMap<String, String>,
    /// Base name of the descriptor the block came from
    pub parent_system: String,
    /// Declared input port count
    pub input_ports: u32,
    /// Declared output port count
    pub output_ports: u32,
}

/// One signal connection between block ports
///
/// A branched line yields several of these, all sharing the source
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// Source block sid
    pub source_block: String,
    /// Source port number
    pub source_port: u32,
    /// Destination block sid
    pub dest_block: String,
    /// Destination port number
    pub dest_port: u32,
    /// Signal name, when the line carries one
    pub signal_name: Option<String>,
}

/// Port kind of a parsed endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    /// Input port (`#in:<n>`)
    In,
    /// Output port (`#out:<n>`)
    Out,
    /// State port (`#state`), normalized to port 0
    State,
}

/// A parsed line endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Referenced block sid
    pub sid: String,
    /// Endpoint kind
    pub kind: PortKind,
    /// Port number (0 for state ports)
    pub port: u32,
}

static PORT_ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)#(out|in):(\d+)$").expect("port endpoint pattern compiles"));
static STATE_ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)#state$").expect("state endpoint pattern compiles"));

impl Endpoint {
    /// Parse an endpoint string
    ///
    /// Accepted forms: `<sid>#out:<port>`, `<sid>#in:<port>`,
    /// `<sid>#state`. State ports carry no number and normalize to
    /// port 0. Anything else is unparseable and returns `None`; the
    /// caller skips and counts it.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(captures) = PORT_ENDPOINT.captures(raw) {
            let kind = match &captures[2] {
                "out" => PortKind::Out,
                _ => PortKind::In,
            };
            return Some(Self {
                sid: captures[1].to_string(),
                kind,
                port: captures[3].parse().ok()?,
            });
        }
        if let Some(captures) = STATE_ENDPOINT.captures(raw) {
            return Some(Self {
                sid: captures[1].to_string(),
                kind: PortKind::State,
                port: 0,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_output_port() {
        let endpoint = Endpoint::parse("10#out:1").unwrap();
        assert_eq!(endpoint.sid, "10");
        assert_eq!(endpoint.kind, PortKind::Out);
        assert_eq!(endpoint.port, 1);
    }

    #[test]
    fn parses_input_port() {
        let endpoint = Endpoint::parse("7#in:12").unwrap();
        assert_eq!(endpoint.kind, PortKind::In);
        assert_eq!(endpoint.port, 12);
    }

    #[test]
    fn state_port_normalizes_to_zero() {
        let endpoint = Endpoint::parse("3#state").unwrap();
        assert_eq!(endpoint.kind, PortKind::State);
        assert_eq!(endpoint.port, 0);
    }

    #[test]
    fn rejects_malformed_endpoints() {
        for raw in ["", "10", "10#", "10#out", "10#out:", "a#out:1", "10#side:1", "10#out:x"] {
            assert!(Endpoint::parse(raw).is_none(), "accepted {raw:?}");
        }
    }

    proptest! {
        #[test]
        fn any_valid_port_endpoint_parses(sid in 0u32..100_000, port in 0u32..512, out in any::<bool>()) {
            let direction = if out { "out" } else { "in" };
            let raw = format!("{sid}#{direction}:{port}");
            let endpoint = Endpoint::parse(&raw).unwrap();
            prop_assert_eq!(endpoint.sid, sid.to_string());
            prop_assert_eq!(endpoint.port, port);
        }

        #[test]
        fn arbitrary_text_never_panics(raw in "\\PC*") {
            let _ = Endpoint::parse(&raw);
        }
    }
}
