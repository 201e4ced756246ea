// Unit tests for error module
// Tests error serialization (for a future IPC boundary)

use crate::error::TrayError;

use models::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that launcher errors serialize to structured JSON.
///
/// **WHY THIS MATTERS**: A UI shell receiving these errors over IPC needs
/// the variant and message as data, not a flattened string.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[derive(Serialize)]` or a
/// non-serializable field being added.
#[test]
fn given_tray_error_when_serialized_then_succeeds() {
    // GIVEN: A TrayError
    let err = TrayError::Core {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let result = serde_json::to_string(&err);

    // THEN: Should succeed
    assert!(result.is_ok(), "Error should be serializable");

    // AND: Should contain the error data
    let json = result.unwrap();
    assert!(json.contains("Core"), "JSON should contain variant name");
    assert!(json.contains("Test"), "JSON should contain message");
}

/// **VALUE**: Verifies Display includes the capture location.
///
/// **WHY THIS MATTERS**: Log lines are often the only diagnostic artifact a
/// user sends in; the `[file:line:col]` suffix is what makes them
/// actionable.
#[test]
fn given_tray_error_when_displayed_then_includes_location() {
    let err = TrayError::Tray {
        message: String::from("boom"),
        location: ErrorLocation::from(Location::caller()),
    };

    let rendered = err.to_string();
    assert!(rendered.contains("boom"));
    assert!(rendered.contains(file!()));
}
