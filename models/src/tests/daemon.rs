// Unit tests for daemon identity display

use crate::daemon::DaemonInfo;

/// **VALUE**: Verifies the tray menu rendering of the daemon identity.
///
/// **WHY THIS MATTERS**: The systray shows "`<name> v<version>`" while
/// connected; this string is built from Display.
#[test]
fn given_daemon_info_when_displayed_then_renders_name_and_version() {
    // GIVEN: A connected daemon identity
    let daemon = DaemonInfo {
        name: String::from("HID-IO Core"),
        version: String::from("0.1.3"),
    };

    // WHEN / THEN: Display matches the menu format
    assert_eq!(daemon.to_string(), "HID-IO Core v0.1.3");
}
