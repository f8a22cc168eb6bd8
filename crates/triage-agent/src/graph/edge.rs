use std::fmt;

/// Name of the implicit entry point.
pub const START: &str = "__start__";
/// Name of the implicit exit point.
pub const END: &str = "__end__";

/// One end of an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Node(String),
    End,
}

impl Endpoint {
    /// Map a name to an endpoint, recognising the `START`/`END` markers.
    pub fn parse(name: &str) -> Self {
        match name {
            START => Self::Start,
            END => Self::End,
            other => Self::Node(other.to_string()),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "{}", START),
            Self::Node(name) => write!(f, "{}", name),
            Self::End => write!(f, "{}", END),
        }
    }
}

/// A directed transition between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: Endpoint::parse(from),
            to: Endpoint::parse(to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_parse_to_endpoints() {
        assert_eq!(Endpoint::parse(START), Endpoint::Start);
        assert_eq!(Endpoint::parse(END), Endpoint::End);
        assert_eq!(Endpoint::parse("triage"), Endpoint::Node("triage".into()));
    }

    #[test]
    fn test_display_round_trips_names() {
        let edge = Edge::new(START, "a");
        assert_eq!(edge.from.to_string(), START);
        assert_eq!(edge.to.to_string(), "a");
    }
}
