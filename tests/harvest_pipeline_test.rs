//! End-to-end tests of the harvest pipeline against in-memory sinks

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use kiosk_export::adapters::embark::MetadataSource;
use kiosk_export::adapters::store::{
    DocumentStore, EmailMessage, Mailer, NewFileRequest, ObjectStorage, RemoteFile,
};
use kiosk_export::config::{parse_config, KioskConfig};
use kiosk_export::core::harvest::{HarvestErrorType, HarvestPipeline, HarvestSinks, HarvestSummary};
use kiosk_export::domain::{DriveError, EmbarkError, FileId, KioskError, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const COMPOSITE_METS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<mets:metsCollection xmlns:mets="http://www.loc.gov/METS/" xmlns:dcterms="http://purl.org/dc/terms/">
  <mets:mets>
    <mets:dmdSec ID="DSC_01_SNITE"><mets:mdWrap MDTYPE="DC"><mets:xmlData>
      <dcterms:identifier>1976.057.001</dcterms:identifier>
      <dcterms:title>Portrait of a Lady</dcterms:title>
    </mets:xmlData></mets:mdWrap></mets:dmdSec>
  </mets:mets>
  <mets:mets>
    <mets:dmdSec ID="DSC_01_SNITE"><mets:mdWrap MDTYPE="DC"><mets:xmlData>
      <dcterms:identifier>2001.012.003</dcterms:identifier>
    </mets:xmlData></mets:mdWrap></mets:dmdSec>
  </mets:mets>
  <mets:mets>
    <mets:dmdSec ID="DSC_01_SNITE"><mets:mdWrap MDTYPE="DC"><mets:xmlData>
      <dcterms:identifier>2010.001.001</dcterms:identifier>
      <dcterms:title>Bowl</dcterms:title>
    </mets:xmlData></mets:mdWrap></mets:dmdSec>
  </mets:mets>
</mets:metsCollection>"#;

const SINGLE_OBJECT_JSON: &str =
    r#"{"objects":[{"uniqueIdentifier":"obj1","digitalAssets":[{"fileDescription":"img1.jpg"}]}]}"#;

const THREE_OBJECTS_JSON: &str = r#"{"objects":[
    {"uniqueIdentifier":"obj1","title":"Vase"},
    {"uniqueIdentifier":"obj2","title":"Plate"},
    {"uniqueIdentifier":"obj3","title":"Cup"}
]}"#;

/// Serves canned composite documents by `format` parameter
#[derive(Default)]
struct FakeEmbark {
    xml: Option<String>,
    json: Option<String>,
    refuse_xml: bool,
    requests: Mutex<Vec<String>>,
}

#[async_trait]
impl MetadataSource for FakeEmbark {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        if url.contains("format=xml") {
            if self.refuse_xml {
                return Err(EmbarkError::ConnectionRefused {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                }
                .into());
            }
            return Ok(self.xml.clone().unwrap_or_default());
        }
        Ok(self.json.clone().unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
struct StoredFile {
    id: FileId,
    name: String,
    content: Vec<u8>,
}

/// Drive stand-in keyed by file name
#[derive(Default)]
struct InMemoryStore {
    files: Mutex<Vec<StoredFile>>,
    fail_names: Vec<String>,
    creates: Mutex<usize>,
}

impl InMemoryStore {
    fn failing_on(name: &str) -> Self {
        Self {
            fail_names: vec![name.to_string()],
            ..Default::default()
        }
    }

    fn names(&self) -> Vec<String> {
        self.files.lock().unwrap().iter().map(|f| f.name.clone()).collect()
    }

    fn content_of(&self, name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_files(&self, _: &str, _: &str, name: &str) -> Result<Vec<RemoteFile>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.name == name)
            .map(|f| RemoteFile {
                id: f.id.clone(),
                name: f.name.clone(),
                mime_type: None,
                modified_time: None,
                parents: Vec::new(),
            })
            .collect())
    }

    async fn update_file(&self, file_id: &FileId, local_path: &Path, _: &str) -> Result<FileId> {
        let content = std::fs::read(local_path)?;
        let mut files = self.files.lock().unwrap();
        let file = files
            .iter_mut()
            .find(|f| &f.id == file_id)
            .ok_or_else(|| KioskError::Other(format!("no file {file_id}")))?;
        file.content = content;
        Ok(file_id.clone())
    }

    async fn create_file(&self, request: &NewFileRequest, local_path: &Path) -> Result<FileId> {
        if self.fail_names.contains(&request.name) {
            return Err(DriveError::UploadFailed {
                status: 500,
                message: "backend error".to_string(),
            }
            .into());
        }
        let content = std::fs::read(local_path)?;
        let mut creates = self.creates.lock().unwrap();
        *creates += 1;
        let id = FileId::new(format!("file-{creates}")).unwrap();
        self.files.lock().unwrap().push(StoredFile {
            id: id.clone(),
            name: request.name.clone(),
            content,
        });
        Ok(id)
    }

    async fn delete_file(&self, file_id: &FileId) -> Result<()> {
        self.files.lock().unwrap().retain(|f| &f.id != file_id);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingStorage {
    puts: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put_file(&self, bucket: &str, key: &str, local_path: &Path, content_type: &str) -> Result<()> {
        assert!(local_path.exists(), "local artifact must exist during copy");
        self.puts
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), content_type.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct CapturingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    reject: bool,
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.reject {
            return Err(KioskError::Notification("MessageRejected".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

struct Harness {
    _dir: TempDir,
    config: KioskConfig,
    source: Arc<FakeEmbark>,
    store: Arc<InMemoryStore>,
    storage: Arc<RecordingStorage>,
    mailer: Arc<CapturingMailer>,
}

impl Harness {
    fn new(source: FakeEmbark, store: InMemoryStore, extra_toml: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let toml = format!(
            r#"
[embark]
server_address = "https://embark.example.edu"
mode = "full"

[workspace]
folder = "{}"

[s3]
bucket = "marble-data-broker-publicbucket"
key_prefix = "embark-separated-json-records/"

[notification]
sender = "noreply@example.edu"
recipients = "curator@example.edu"

{extra_toml}
"#,
            dir.path().join("work").display()
        );
        let config = parse_config(&toml).unwrap();

        Self {
            _dir: dir,
            config,
            source: Arc::new(source),
            store: Arc::new(store),
            storage: Arc::new(RecordingStorage::default()),
            mailer: Arc::new(CapturingMailer::default()),
        }
    }

    async fn run(&self) -> HarvestSummary {
        self.run_with(self.config.clone()).await
    }

    async fn run_with(&self, config: KioskConfig) -> HarvestSummary {
        let sinks = HarvestSinks {
            source: self.source.clone(),
            documents: Some(self.store.clone()),
            objects: Some(self.storage.clone()),
            mailer: Some(self.mailer.clone()),
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        HarvestPipeline::new(config, sinks)
            .unwrap()
            .run(now)
            .await
            .unwrap()
    }

    fn workspace_entries(&self) -> Vec<String> {
        match std::fs::read_dir(&self.config.workspace.folder) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[tokio::test]
async fn test_json_missing_field_triggers_one_notification() {
    let harness = Harness::new(
        FakeEmbark {
            json: Some(SINGLE_OBJECT_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[processing]
process_mets = false

[[processing.json_required_fields]]
name = "Title"
path = "title"
"#,
    );

    let summary = harness.run().await;

    assert_eq!(summary.records_seen, 1);
    assert_eq!(summary.records_processed, 1);
    assert_eq!(summary.records_with_missing_fields, 1);
    assert_eq!(summary.digital_assets, 1);
    assert!(summary.notification_sent);
    assert!(summary
        .report
        .as_str()
        .contains("obj1 is missing the following required field(s)"));
    assert!(summary
        .report
        .as_str()
        .contains("Title - at json path location title"));

    let sent = harness.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Metadata is missing required fields");
    assert_eq!(sent[0].recipients, vec!["curator@example.edu".to_string()]);
    assert!(sent[0]
        .html_body
        .contains("obj1 is missing the following required field(s)"));
    assert!(sent[0].text_body.is_empty());

    assert_eq!(harness.store.names(), vec!["obj1.json".to_string()]);
}

#[tokio::test]
async fn test_mets_records_distributed_in_document_order() {
    let harness = Harness::new(
        FakeEmbark {
            xml: Some(COMPOSITE_METS.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[processing]
process_json = false
"#,
    );

    let summary = harness.run().await;

    assert!(summary.is_successful());
    assert_eq!(summary.records_seen, 3);
    assert_eq!(summary.files_created, 3);
    assert_eq!(
        harness.store.names(),
        vec![
            "1976.057.001.xml".to_string(),
            "2001.012.003.xml".to_string(),
            "2010.001.001.xml".to_string(),
        ]
    );

    let uploaded = harness.store.content_of("1976.057.001.xml").unwrap();
    let uploaded = String::from_utf8(uploaded).unwrap();
    assert!(uploaded.starts_with("<?xml version='1.0' encoding='utf-8'?>"));
    assert!(uploaded.contains(r#"xmlns:dcterms="http://purl.org/dc/terms/""#));
    assert!(uploaded.contains("xsi:schemaLocation"));

    let puts = harness.storage.puts.lock().unwrap();
    assert_eq!(puts.len(), 3);
    assert_eq!(puts[0].0, "marble-data-broker-publicbucket");
    assert_eq!(puts[0].1, "embark-separated-json-records/1976.057.001.xml");
    assert_eq!(puts[0].2, "text/xml");

    // No required fields configured, so nothing to report
    assert!(!summary.notification_sent);
    assert!(harness.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_single_record_mode_processes_one_record_per_pass() {
    let harness = Harness::new(
        FakeEmbark {
            xml: Some(COMPOSITE_METS.to_string()),
            json: Some(THREE_OBJECTS_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[application]
single_record_mode = true
"#,
    );

    let summary = harness.run().await;

    assert_eq!(summary.records_seen, 2);
    assert_eq!(summary.records_processed, 2);
    assert_eq!(
        harness.store.names(),
        vec!["1976.057.001.xml".to_string(), "obj1.json".to_string()]
    );
}

#[tokio::test]
async fn test_upsert_failure_does_not_stop_the_run() {
    let harness = Harness::new(
        FakeEmbark {
            json: Some(THREE_OBJECTS_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::failing_on("obj2.json"),
        r#"
[processing]
process_mets = false
"#,
    );

    let summary = harness.run().await;

    assert!(!summary.is_successful());
    assert_eq!(summary.records_seen, 3);
    assert_eq!(summary.records_processed, 2);
    assert_eq!(summary.records_failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, HarvestErrorType::Upsert);
    assert_eq!(
        summary.errors[0].object_id.as_ref().map(|id| id.as_str()),
        Some("obj2")
    );
    assert_eq!(
        harness.store.names(),
        vec!["obj1.json".to_string(), "obj3.json".to_string()]
    );
    // The failed record skipped the secondary copy
    assert_eq!(harness.storage.puts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_repeated_runs_update_instead_of_duplicating() {
    let harness = Harness::new(
        FakeEmbark {
            json: Some(THREE_OBJECTS_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[processing]
process_mets = false
"#,
    );

    let first = harness.run().await;
    let second = harness.run().await;

    assert_eq!(first.files_created, 3);
    assert_eq!(second.files_created, 0);
    assert_eq!(second.files_updated, 3);
    assert_eq!(harness.store.names().len(), 3);
    assert_eq!(*harness.store.creates.lock().unwrap(), 3);
}

#[tokio::test]
async fn test_fetch_failure_skips_only_that_pass() {
    let harness = Harness::new(
        FakeEmbark {
            json: Some(THREE_OBJECTS_JSON.to_string()),
            refuse_xml: true,
            ..Default::default()
        },
        InMemoryStore::default(),
        "",
    );

    let summary = harness.run().await;

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, HarvestErrorType::Fetch);
    assert_eq!(summary.records_processed, 3);

    let requests = harness.source.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].contains("layout=marble_mets&format=xml"));
    assert!(requests[1].contains("layout=marble&format=json"));
    assert!(requests[1].ends_with("&query=_ID=ALL"));
}

#[tokio::test]
async fn test_incremental_query_window() {
    let harness = Harness::new(FakeEmbark::default(), InMemoryStore::default(), "");
    let mut config = harness.config.clone();
    config.embark.mode = kiosk_export::config::HarvestMode::Incremental;
    config.embark.hours_threshold = 72;

    let summary = harness.run_with(config).await;

    // Empty bodies mean nothing to process, not failure
    assert!(summary.is_successful());
    assert_eq!(summary.records_seen, 0);
    let requests = harness.source.requests.lock().unwrap();
    assert!(requests[0].ends_with("&query=mod_date%3E%2203/01/2024%22"));
}

#[tokio::test]
async fn test_invalid_json_payload_is_a_parse_error() {
    let harness = Harness::new(
        FakeEmbark {
            json: Some("<html>Service unavailable</html>".to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[processing]
process_mets = false
"#,
    );

    let summary = harness.run().await;

    assert_eq!(summary.records_seen, 0);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, HarvestErrorType::Parse);
}

#[tokio::test]
async fn test_one_notification_covers_both_passes() {
    let harness = Harness::new(
        FakeEmbark {
            xml: Some(COMPOSITE_METS.to_string()),
            json: Some(SINGLE_OBJECT_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[[processing.xml_required_fields]]
name = "Title"
path = 'mets:dmdSec[@ID="DSC_01_SNITE"]/mets:mdWrap/mets:xmlData/dcterms:title'

[[processing.json_required_fields]]
name = "Title"
path = "title"
"#,
    );

    let summary = harness.run().await;

    assert_eq!(summary.records_with_missing_fields, 2);
    let sent = harness.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .html_body
        .contains("2001.012.003 is missing the following required field(s)"));
    assert!(sent[0]
        .html_body
        .contains("obj1 is missing the following required field(s)"));
    assert!(!sent[0].html_body.contains("1976.057.001 is missing"));
}

#[tokio::test]
async fn test_rejected_notification_is_recorded_not_fatal() {
    let mut harness = Harness::new(
        FakeEmbark {
            json: Some(SINGLE_OBJECT_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[processing]
process_mets = false

[[processing.json_required_fields]]
name = "Title"
path = "title"
"#,
    );
    harness.mailer = Arc::new(CapturingMailer {
        reject: true,
        ..Default::default()
    });

    let summary = harness.run().await;

    assert_eq!(summary.records_processed, 1);
    assert!(!summary.notification_sent);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, HarvestErrorType::Notification);
    assert_eq!(
        summary.errors[0].message,
        "Notification error: MessageRejected"
    );
}

#[tokio::test]
async fn test_local_copies_removed_after_distribution() {
    let harness = Harness::new(
        FakeEmbark {
            xml: Some(COMPOSITE_METS.to_string()),
            json: Some(THREE_OBJECTS_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        "",
    );

    harness.run().await;

    assert!(harness.workspace_entries().is_empty());
}

#[tokio::test]
async fn test_local_copies_kept_when_configured() {
    let harness = Harness::new(
        FakeEmbark {
            json: Some(THREE_OBJECTS_JSON.to_string()),
            ..Default::default()
        },
        InMemoryStore::default(),
        r#"
[processing]
process_mets = false
"#,
    );
    let mut config = harness.config.clone();
    config.workspace.delete_local_copy = false;

    harness.run_with(config).await;

    let mut entries = harness.workspace_entries();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            "obj1.json".to_string(),
            "obj2.json".to_string(),
            "obj3.json".to_string(),
            "web_kiosk_composite_metadata.json".to_string(),
        ]
    );
}
