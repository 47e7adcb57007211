//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::session::SessionError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_invalid_identifier() {
    let error = CoreError::invalid_identifier("claim id must not be empty");

    match error {
        CoreError::InvalidIdentifier(msg) => assert!(msg.contains("claim")),
        _ => panic!("Expected InvalidIdentifier error"),
    }
}

#[test]
fn test_core_error_from_session_error() {
    let core_error: CoreError = SessionError::MissingSubject.into();

    assert!(matches!(core_error, CoreError::Session(_)));
    assert!(core_error.to_string().contains("no subject"));
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("Test error");
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::Configuration("Missing config".to_string());

    match error {
        CoreError::Configuration(msg) => assert_eq!(msg, "Missing config"),
        _ => panic!("Expected Configuration error"),
    }
}
