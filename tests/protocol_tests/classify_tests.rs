//! Classifier Tests
//!
//! Tests for line classification, command encoding and line framing.

use soundbridge::protocol::{
    classify, encode_command, scalar_value, strip_line_terminator, Invocation, Line, Status,
};

// =============================================================================
// Scalar Tests
// =============================================================================

#[test]
fn test_scalar_value_is_verbatim() {
    assert_eq!(
        classify("GetPowerState", "GetPowerState: on"),
        Some(Line::Scalar("on"))
    );
}

#[test]
fn test_scalar_keeps_embedded_spaces() {
    let line = "ListSongs: Purple People Eater  (Live)";
    assert_eq!(
        classify("ListSongs", line),
        Some(Line::Scalar("Purple People Eater  (Live)"))
    );
}

#[test]
fn test_scalar_keeps_inner_colons() {
    assert_eq!(
        classify("GetActiveServerInfo", "GetActiveServerInfo: Name: iMac iTunes"),
        Some(Line::Scalar("Name: iMac iTunes"))
    );
}

#[test]
fn test_scalar_for_other_command_is_rejected() {
    assert_eq!(classify("ListSongs", "ListServers: iMac iTunes"), None);
}

#[test]
fn test_unkeyed_text_is_rejected() {
    assert_eq!(classify("ListServers", "iMac iTunes"), None);
    assert_eq!(classify("ListServers", ""), None);
}

#[test]
fn test_empty_scalar_is_rejected() {
    assert_eq!(classify("Stop", "Stop: "), None);
    assert_eq!(classify("Stop", "Stop:"), None);
}

#[test]
fn test_command_prefix_needs_separator() {
    // "ListSongsX: ..." must not be read as a ListSongs scalar
    assert_eq!(classify("ListSongs", "ListSongsX: value"), None);
}

#[test]
fn test_scalar_value_helper() {
    assert_eq!(scalar_value("Type", "Type: iTunes"), Some("iTunes"));
    assert_eq!(scalar_value("Type", "Name: iMac"), None);
}

// =============================================================================
// Marker Tests
// =============================================================================

#[test]
fn test_list_start_bare_and_keyed() {
    assert_eq!(classify("ListServers", "ListResultSize 2"), Some(Line::ListStart(2)));
    assert_eq!(
        classify("ListServers", "ListServers: ListResultSize 12"),
        Some(Line::ListStart(12))
    );
    assert_eq!(classify("ListServers", "ListResultSize 0"), Some(Line::ListStart(0)));
}

#[test]
fn test_malformed_list_size_is_not_a_marker() {
    assert_eq!(classify("ListServers", "ListResultSize"), None);
    assert_eq!(classify("ListServers", "ListResultSize -1"), None);
    assert_eq!(classify("ListServers", "ListResultSize +3"), None);
    assert_eq!(classify("ListServers", "ListResultSize 2 extra"), None);
}

#[test]
fn test_list_end_and_transaction_markers() {
    assert_eq!(classify("ListServers", "ListResultEnd"), Some(Line::ListEnd));
    assert_eq!(
        classify("ListServers", "ListServers: ListResultEnd"),
        Some(Line::ListEnd)
    );
    assert_eq!(
        classify("ListSongs", "TransactionInitiated"),
        Some(Line::TransactionStart)
    );
    assert_eq!(
        classify("ListSongs", "ListSongs: TransactionComplete"),
        Some(Line::TransactionComplete)
    );
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_every_status_token_classifies() {
    for status in Status::ALL {
        assert_eq!(
            classify("GetActiveServerInfo", status.as_str()),
            Some(Line::Status(status))
        );
    }
}

#[test]
fn test_keyed_status() {
    assert_eq!(
        classify("ServerDisconnect", "ServerDisconnect: ErrorDisconnected"),
        Some(Line::Status(Status::ErrorDisconnected))
    );
}

#[test]
fn test_non_status_value_stays_scalar() {
    assert_eq!(
        classify("ServerConnect", "ServerConnect: Connected"),
        Some(Line::Scalar("Connected"))
    );
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_encode_command_line() {
    let inv = Invocation::new("ServerConnect", [1]);
    assert_eq!(encode_command(&inv), b"ServerConnect 1\n".to_vec());
    assert_eq!(encode_command(&Invocation::bare("Stop")), b"Stop\n".to_vec());
}

#[test]
fn test_strip_line_terminator() {
    assert_eq!(strip_line_terminator("roku: ready\r\n"), "roku: ready");
    assert_eq!(strip_line_terminator("roku: ready\n"), "roku: ready");
    assert_eq!(strip_line_terminator("roku: ready"), "roku: ready");
}
