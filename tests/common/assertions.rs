//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use std::io::{Cursor, Read};

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert bytes are a PNG image
pub fn assert_png_bytes(bytes: &[u8]) {
    assert!(
        bytes.len() >= 8 && &bytes[0..8] == b"\x89PNG\r\n\x1a\n",
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert response is a chart bundle and return its entries by name
pub fn assert_zip_bundle(response: &TestResponse) -> Vec<(String, Vec<u8>)> {
    assert_ok(response);
    assert!(
        response.is_zip(),
        "Expected ZIP archive, got {} bytes",
        response.body.len()
    );
    assert_eq!(response.header("content-type"), Some("application/zip"));
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=pattern_bundle.zip")
    );

    let mut archive =
        zip::ZipArchive::new(Cursor::new(response.body.clone())).expect("Invalid ZIP archive");
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).expect("Unreadable ZIP entry");
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).expect("Unreadable ZIP entry");
        entries.push((file.name().to_string(), bytes));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Assert JSON error body with matching status and message
pub fn assert_json_error(response: &TestResponse, expected: StatusCode, message: &str) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Full response: {}",
        serde_json::to_string_pretty(&json).unwrap()
    );
    let error = json["error"].as_str().unwrap_or_default();
    assert!(
        error.contains(message),
        "Expected error containing {message:?}, got {error:?}"
    );
}
