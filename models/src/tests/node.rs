// Unit tests for node descriptor serialization
// The wire names must match what HID-IO Core sends

use crate::node::{NodeDescriptor, NodeType};

/// **VALUE**: Verifies node types serialize with the daemon's wire names.
///
/// **WHY THIS MATTERS**: The daemon identifies node kinds with camelCase
/// strings (`hidioApi`, `hidioDaemon`, `usbKeyboard`). If our serde renames
/// drift, node snapshots from the daemon stop matching and every node shows
/// up as Unknown.
///
/// **BUG THIS CATCHES**: Would catch someone removing or changing a
/// `#[serde(rename = ...)]` attribute on NodeType.
#[test]
fn given_node_types_when_serialized_then_uses_wire_names() {
    // GIVEN / WHEN: Each known node type serialized to JSON
    let api = serde_json::to_value(NodeType::ApiClient).unwrap();
    let daemon = serde_json::to_value(NodeType::Daemon).unwrap();
    let keyboard = serde_json::to_value(NodeType::UsbKeyboard).unwrap();

    // THEN: Wire names match the daemon's vocabulary
    assert_eq!(api, "hidioApi");
    assert_eq!(daemon, "hidioDaemon");
    assert_eq!(keyboard, "usbKeyboard");
}

/// **VALUE**: Verifies unrecognized node type names deserialize to Unknown.
///
/// **WHY THIS MATTERS**: A newer daemon may report node kinds this client
/// predates. Deserialization must degrade to Unknown instead of failing the
/// whole snapshot.
///
/// **BUG THIS CATCHES**: Would catch removal of the `#[serde(other)]`
/// fallback variant.
#[test]
fn given_unknown_type_name_when_deserialized_then_maps_to_unknown() {
    // GIVEN: A node descriptor with a type this client doesn't know
    let json = r#"{"type":"bleKeyboard","name":"K2","serial":"S2","id":7}"#;

    // WHEN: Deserializing
    let node: NodeDescriptor = serde_json::from_str(json).unwrap();

    // THEN: Falls back to Unknown, other fields intact
    assert_eq!(node.node_type, NodeType::Unknown);
    assert_eq!(node.name, "K2");
    assert_eq!(node.id, 7);
}

/// **VALUE**: Verifies the menu-style Display rendering of a descriptor.
///
/// **WHY THIS MATTERS**: The tray layer renders nodes as `[id] name (serial)`
/// menu entries; Display is the single place that format lives.
#[test]
fn given_descriptor_when_displayed_then_renders_menu_entry() {
    // GIVEN: A usb keyboard node
    let node = NodeDescriptor {
        node_type: NodeType::UsbKeyboard,
        name: String::from("K1"),
        serial: String::from("S1"),
        id: 1,
    };

    // WHEN / THEN: Display matches the menu entry format
    assert_eq!(node.to_string(), "[1] K1 (S1)");
}

/// **VALUE**: Verifies a descriptor round-trips through JSON unchanged.
///
/// **BUG THIS CATCHES**: Would catch asymmetric rename attributes (the
/// `type` field alias in particular).
#[test]
fn given_descriptor_when_round_tripped_then_equal() {
    // GIVEN: A daemon node
    let node = NodeDescriptor {
        node_type: NodeType::Daemon,
        name: String::from("HID-IO Core"),
        serial: String::from("pid:123"),
        id: 0,
    };

    // WHEN: Serializing then deserializing
    let json = serde_json::to_string(&node).unwrap();
    let back: NodeDescriptor = serde_json::from_str(&json).unwrap();

    // THEN: Identical value
    assert_eq!(back, node);
    assert!(json.contains(r#""type":"hidioDaemon""#));
}
