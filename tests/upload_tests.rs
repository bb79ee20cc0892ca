mod common;

use common::*;
use mockito::Matcher;
use shopware_account_api::{AccountError, Payload};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_upload_missing_file_makes_no_request() {
    let mut server = mockito::Server::new();
    let dir = TempDir::new().unwrap();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let client = authenticated_client(&server, &dir, "tok");
    let err = client
        .upload_file("/plugins/5/pictures", Path::new("/nonexistent/picture.png"))
        .unwrap_err();

    mock.assert();
    match err {
        AccountError::Validation(message) => assert!(message.contains("does not exist")),
        other => panic!("expected Validation error, got {:?}", other),
    }
}

#[test]
fn test_upload_sends_multipart_form() {
    let mut server = mockito::Server::new();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("release.zip");
    fs::write(&file, b"PK\x03\x04 archive bytes").unwrap();

    let mock = server
        .mock("POST", "/producers/3/plugins/5/binaries/8/file")
        .match_header("x-shopware-token", "tok")
        .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="archive"; filename="release.zip""#.to_string()),
            Matcher::Regex("archive bytes".to_string()),
            Matcher::Regex(r#"name="comment""#.to_string()),
            Matcher::Regex("first upload".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"id": 8, "name": "release.zip"}"#)
        .create();

    let client = authenticated_client(&server, &dir, "tok");
    let payload = client
        .upload_file_with(
            "/producers/3/plugins/5/binaries/8/file",
            &file,
            "archive",
            &[("comment", "first upload")],
        )
        .unwrap();

    mock.assert();
    assert_eq!(payload.get_str("name"), Some("release.zip"));
}

#[test]
fn test_upload_default_field_and_empty_response() {
    let mut server = mockito::Server::new();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("icon.png");
    fs::write(&file, b"not really a png").unwrap();

    let mock = server
        .mock("POST", "/plugins/5/icon")
        .match_body(Matcher::Regex(r#"name="file"; filename="icon.png""#.to_string()))
        .with_status(200)
        .create();

    let client = authenticated_client(&server, &dir, "tok");
    let payload = client.upload_file("/plugins/5/icon", &file).unwrap();

    mock.assert();
    assert_eq!(payload, Payload::NoContent);
}

#[test]
fn test_upload_error_is_upload_variant() {
    let mut server = mockito::Server::new();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("big.zip");
    fs::write(&file, vec![0u8; 1024]).unwrap();

    let _mock = server
        .mock("POST", "/plugins/5/pictures")
        .with_status(413)
        .with_body(r#"{"code":"FileTooLarge"}"#)
        .create();

    let client = authenticated_client(&server, &dir, "tok");
    let err = client.upload_file("/plugins/5/pictures", &file).unwrap_err();

    assert!(matches!(err, AccountError::Upload { status: Some(413), .. }));
    assert!(err.is_api_error());
    assert_eq!(err.response_body(), Some(r#"{"code":"FileTooLarge"}"#));
}
