//! Google Drive upsert tests against a mock Drive API

use kiosk_export::adapters::gdrive::DriveClient;
use kiosk_export::config::{secret_string, DriveFolderConfig, GoogleConfig, GoogleCredentials};
use kiosk_export::core::distribute::{RemoteFileUpserter, UpsertAction};
use kiosk_export::domain::{DriveError, KioskError};
use mockito::{Matcher, Server};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const LOOKUP_QUERY: &str = "name='obj1.json' and 'folder-1' in parents and trashed = false";

fn google_config(base_url: String) -> GoogleConfig {
    GoogleConfig {
        enabled: true,
        api_base_url: base_url,
        credentials: GoogleCredentials {
            access_token: Some(secret_string("ya29.static".to_string())),
            ..Default::default()
        },
        metadata: DriveFolderConfig {
            drive_id: "drive-1".to_string(),
            parent_folder_id: "folder-1".to_string(),
        },
        ..Default::default()
    }
}

fn upserter(config: &GoogleConfig) -> RemoteFileUpserter {
    let client = DriveClient::new(config).unwrap();
    RemoteFileUpserter::new(Arc::new(client), &config.metadata)
}

fn artifact(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("obj1.json");
    std::fs::write(&path, contents).unwrap();
    path
}

fn lookup_matcher() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("q".into(), LOOKUP_QUERY.into()),
        Matcher::UrlEncoded("driveId".into(), "drive-1".into()),
        Matcher::UrlEncoded("corpora".into(), "drive".into()),
        Matcher::UrlEncoded("supportsAllDrives".into(), "true".into()),
    ])
}

#[tokio::test]
async fn test_first_upsert_creates_then_second_updates() {
    let mut server = Server::new_async().await;
    let config = google_config(server.url());
    let upserter = upserter(&config);
    let dir = TempDir::new().unwrap();

    // First run: nothing there yet
    let empty_lookup = server
        .mock("GET", "/drive/v3/files")
        .match_query(lookup_matcher())
        .match_header("authorization", "Bearer ya29.static")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"kind":"drive#fileList","files":[]}"#)
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/upload/drive/v3/files")
        .match_query(Matcher::UrlEncoded("uploadType".into(), "multipart".into()))
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/related; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""name":"obj1.json""#.to_string()),
            Matcher::Regex(r#""parents":\["folder-1"\]"#.to_string()),
            Matcher::Regex(r#"\{"title":"Vase"\}"#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"file-abc"}"#)
        .expect(1)
        .create_async()
        .await;

    let path = artifact(&dir, r#"{"title":"Vase"}"#);
    let first = upserter.upsert(&path, "application/json").await.unwrap();

    assert_eq!(first.action, UpsertAction::Created);
    assert_eq!(first.file_id.as_str(), "file-abc");
    empty_lookup.assert_async().await;
    create.assert_async().await;
    empty_lookup.remove_async().await;

    // Second run: the file created above is found and replaced
    let found_lookup = server
        .mock("GET", "/drive/v3/files")
        .match_query(lookup_matcher())
        .with_status(200)
        .with_body(
            r#"{"files":[{"id":"file-abc","name":"obj1.json","mimeType":"application/json","parents":["folder-1"]}]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let update = server
        .mock("PATCH", "/upload/drive/v3/files/file-abc")
        .match_query(Matcher::UrlEncoded("uploadType".into(), "media".into()))
        .match_header("content-type", "application/json")
        .match_body(r#"{"title":"Vase, glazed"}"#)
        .with_status(200)
        .with_body(r#"{"id":"file-abc"}"#)
        .expect(1)
        .create_async()
        .await;

    let path = artifact(&dir, r#"{"title":"Vase, glazed"}"#);
    let second = upserter.upsert(&path, "application/json").await.unwrap();

    assert_eq!(second.action, UpsertAction::Updated);
    assert_eq!(second.file_id.as_str(), "file-abc");
    found_lookup.assert_async().await;
    update.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_duplicates_update_first_returned() {
    let mut server = Server::new_async().await;
    let config = google_config(server.url());
    let dir = TempDir::new().unwrap();

    let _lookup = server
        .mock("GET", "/drive/v3/files")
        .match_query(lookup_matcher())
        .with_status(200)
        .with_body(
            r#"{"files":[{"id":"dup-a","name":"obj1.json"},{"id":"dup-b","name":"obj1.json"}]}"#,
        )
        .create_async()
        .await;
    let update_first = server
        .mock("PATCH", "/upload/drive/v3/files/dup-a")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id":"dup-a"}"#)
        .expect(1)
        .create_async()
        .await;
    let update_second = server
        .mock("PATCH", "/upload/drive/v3/files/dup-b")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let path = artifact(&dir, "{}");
    let outcome = upserter(&config)
        .upsert(&path, "application/json")
        .await
        .unwrap();

    assert_eq!(outcome.file_id.as_str(), "dup-a");
    update_first.assert_async().await;
    update_second.assert_async().await;
}

#[tokio::test]
async fn test_lookup_failure_is_not_retried() {
    let mut server = Server::new_async().await;
    let config = google_config(server.url());
    let dir = TempDir::new().unwrap();

    let lookup = server
        .mock("GET", "/drive/v3/files")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body("insufficient permissions")
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/upload/drive/v3/files")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let path = artifact(&dir, "{}");
    let err = upserter(&config)
        .upsert(&path, "application/json")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        KioskError::Drive(DriveError::QueryFailed { status: 403, .. })
    ));
    lookup.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_create_failure_reports_status() {
    let mut server = Server::new_async().await;
    let config = google_config(server.url());
    let dir = TempDir::new().unwrap();

    let _lookup = server
        .mock("GET", "/drive/v3/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"files":[]}"#)
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/upload/drive/v3/files")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("backend error")
        .create_async()
        .await;

    let path = artifact(&dir, "{}");
    let err = upserter(&config)
        .upsert(&path, "application/json")
        .await
        .unwrap_err();

    match err {
        KioskError::Drive(DriveError::UploadFailed { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend error");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_local_artifact() {
    let mut server = Server::new_async().await;
    let config = google_config(server.url());

    let _lookup = server
        .mock("GET", "/drive/v3/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"files":[]}"#)
        .create_async()
        .await;

    let err = upserter(&config)
        .upsert(
            std::path::Path::new("/nonexistent/kiosk/obj1.json"),
            "application/json",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, KioskError::Io(_)));
}
