// Unit tests for client identity generation

use crate::CLIENT_NAME;
use crate::session::identity::ClientIdentity;

/// **VALUE**: Verifies generated serials carry the client display name.
///
/// **WHY THIS MATTERS**: The daemon and the tray menu both show the serial;
/// the display-name prefix is how a human tells this client's registration
/// apart from other API clients.
#[test]
fn given_generated_identity_when_inspected_then_serial_has_client_name_prefix() {
    // GIVEN / WHEN: A freshly generated identity
    let identity = ClientIdentity::generate();

    // THEN: Serial starts with the client display name
    assert!(
        identity.serial().starts_with(CLIENT_NAME),
        "serial should start with {CLIENT_NAME:?}, got {:?}",
        identity.serial()
    );

    // AND: There is a non-empty unique suffix after the name
    assert!(identity.serial().len() > CLIENT_NAME.len() + 1);
}

/// **VALUE**: Verifies two workers never share a serial.
///
/// **WHY THIS MATTERS**: The serial exists for daemon-side deduplication of
/// client instances. Colliding serials would make two running clients look
/// like one.
///
/// **BUG THIS CATCHES**: Would catch the uuid being generated once in a
/// static instead of per identity.
#[test]
fn given_two_identities_when_generated_then_serials_differ() {
    // GIVEN / WHEN: Two generated identities
    let first = ClientIdentity::generate();
    let second = ClientIdentity::generate();

    // THEN: Serials are unique
    assert_ne!(first.serial(), second.serial());
}

/// **VALUE**: Verifies Display and serial() agree.
#[test]
fn given_identity_when_displayed_then_matches_serial() {
    let identity = ClientIdentity::generate();
    assert_eq!(identity.to_string(), identity.serial());
}
