//! Network elements (switches, interfaces) and the links between them

use crate::metadata::{Metadata, MetadataValue};
use serde::{Deserialize, Serialize};

/// Build the identifier of a switch port: `"<switch-id>:<port>"`
pub fn interface_id(switch_id: &str, port: u32) -> String {
    format!("{}:{}", switch_id, port)
}

/// Split an interface identifier into its owning switch and port number.
///
/// The split happens at the last `:`, so DPID-style switch names that
/// contain colons themselves still resolve to the right owner.
pub fn split_interface_id(id: &str) -> Option<(&str, u32)> {
    let (switch, port) = id.rsplit_once(':')?;
    if switch.is_empty() {
        return None;
    }
    let port = port.parse().ok()?;
    Some((switch, port))
}

/// A port on a switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Port number, unique within the owning switch
    pub port: u32,

    /// Arbitrary metadata
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Interface {
    pub fn new(port: u32) -> Self {
        Self {
            port,
            metadata: Metadata::new(),
        }
    }
}

/// A switch and the interfaces it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    /// Switch name or DPID
    pub id: String,

    /// Interfaces owned by this switch
    #[serde(default)]
    pub interfaces: Vec<Interface>,

    /// Arbitrary metadata
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Switch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            interfaces: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Add ports `1..=count`
    pub fn with_ports(mut self, count: u32) -> Self {
        self.interfaces.extend((1..=count).map(Interface::new));
        self
    }

    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Identifier of one of this switch's ports
    pub fn interface_id(&self, port: u32) -> String {
        interface_id(&self.id, port)
    }
}

/// An undirected link between two interfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// First endpoint interface id
    pub endpoint_a: String,

    /// Second endpoint interface id
    pub endpoint_b: String,

    /// QoS and administrative metadata (bandwidth, ownership, ...)
    #[serde(default)]
    pub metadata: Metadata,
}

impl Link {
    pub fn new(endpoint_a: impl Into<String>, endpoint_b: impl Into<String>) -> Self {
        Self {
            endpoint_a: endpoint_a.into(),
            endpoint_b: endpoint_b.into(),
            metadata: Metadata::new(),
        }
    }

    /// Set a metadata value, replacing any previous value for the key
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Stable display name, independent of endpoint order
    pub fn id(&self) -> String {
        let (a, b) = if self.endpoint_a <= self.endpoint_b {
            (&self.endpoint_a, &self.endpoint_b)
        } else {
            (&self.endpoint_b, &self.endpoint_a)
        };
        format!("{}<->{}", a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_interface_id() {
        assert_eq!(split_interface_id("S1:2"), Some(("S1", 2)));
        assert_eq!(
            split_interface_id("00:00:00:00:00:00:00:01:7"),
            Some(("00:00:00:00:00:00:00:01", 7))
        );
        assert_eq!(split_interface_id("S1"), None);
        assert_eq!(split_interface_id(":3"), None);
        assert_eq!(split_interface_id("S1:eth0"), None);
    }

    #[test]
    fn test_switch_with_ports() {
        let switch = Switch::new("S2").with_ports(3);
        assert_eq!(switch.interfaces.len(), 3);
        assert_eq!(switch.interface_id(3), "S2:3");
    }

    #[test]
    fn test_link_id_is_order_independent() {
        let forward = Link::new("S1:1", "S2:1");
        let backward = Link::new("S2:1", "S1:1");
        assert_eq!(forward.id(), backward.id());
        assert_eq!(forward.id(), "S1:1<->S2:1");
    }
}
