//! Harvest coordinator - main orchestrator for a harvest run
//!
//! One run is a METS pass followed by a JSON pass. Each pass fetches the
//! composite document, splits it, and for every record validates, writes,
//! uploads and optionally copies the per-object artifact. A single
//! missing-field email is sent once both passes are done.

use super::summary::{HarvestError, HarvestErrorType, HarvestSummary};
use super::workspace::Workspace;
use crate::adapters::embark::{metadata_url, EmbarkClient, MetadataSource};
use crate::adapters::store::{
    create_document_store, create_mailer, create_object_storage, DocumentStore, Mailer,
    ObjectStorage,
};
use crate::config::KioskConfig;
use crate::core::distribute::{RemoteFileUpserter, UpsertAction};
use crate::core::notify::NotificationDispatcher;
use crate::core::split::{JsonObjectSplitter, JsonRecord, NamespaceAwareXmlSplitter, XmlRecord};
use crate::core::validate::{RequiredFieldValidator, XmlPath};
use crate::domain::{KioskError, ObjectId, RecordFormat, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// External collaborators of a run
pub struct HarvestSinks {
    /// Where composite documents come from
    pub source: Arc<dyn MetadataSource + Send + Sync>,

    /// Remote document store, `None` when disabled
    pub documents: Option<Arc<dyn DocumentStore + Send + Sync>>,

    /// Secondary object storage, `None` when disabled
    pub objects: Option<Arc<dyn ObjectStorage + Send + Sync>>,

    /// Missing-field mailer, `None` when disabled
    pub mailer: Option<Arc<dyn Mailer + Send + Sync>>,
}

impl HarvestSinks {
    /// Build the Embark client and every sink enabled in the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be built
    pub async fn from_config(config: &KioskConfig) -> Result<Self> {
        Ok(Self {
            source: Arc::new(EmbarkClient::new(&config.embark)?),
            documents: create_document_store(config)?,
            objects: create_object_storage(config).await,
            mailer: create_mailer(config).await,
        })
    }
}

/// Identifier of a METS record
pub(crate) fn xml_object_id(identifier_path: &XmlPath, record: &XmlRecord) -> Result<ObjectId> {
    let raw = identifier_path
        .first_value(&record.root, &record.namespaces)
        .ok_or_else(|| {
            KioskError::Validation(format!(
                "No identifier at {} in <{}>",
                identifier_path.as_str(),
                record.root.name
            ))
        })?;
    ObjectId::new(raw).map_err(KioskError::Validation)
}

/// Harvest pipeline
///
/// Built fresh for every run from an immutable configuration value.
pub struct HarvestPipeline {
    config: KioskConfig,
    sinks: HarvestSinks,
    workspace: Workspace,
    validator: RequiredFieldValidator,
    identifier_path: XmlPath,
    upserter: Option<RemoteFileUpserter>,
    notifier: NotificationDispatcher,
}

impl HarvestPipeline {
    /// Create a new pipeline
    ///
    /// # Errors
    ///
    /// Returns a validation error if the identifier path or an XML
    /// required-field path doesn't compile
    pub fn new(config: KioskConfig, sinks: HarvestSinks) -> Result<Self> {
        let validator = RequiredFieldValidator::from_config(&config.processing)?;
        let identifier_path = XmlPath::parse(&config.processing.xml_identifier_path)?;
        let upserter = sinks
            .documents
            .as_ref()
            .map(|store| RemoteFileUpserter::new(store.clone(), &config.google.metadata));
        let notifier = NotificationDispatcher::new(sinks.mailer.clone(), &config.notification);

        Ok(Self {
            workspace: Workspace::new(&config.workspace),
            config,
            sinks,
            validator,
            identifier_path,
            upserter,
            notifier,
        })
    }

    /// Execute the harvest
    ///
    /// `now` anchors the incremental query window. Record-level failures
    /// are recorded in the summary and never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error only if the working folder cannot be created
    pub async fn run(&self, now: DateTime<Utc>) -> Result<HarvestSummary> {
        let start_time = Instant::now();
        let mut summary = HarvestSummary::new();

        tracing::info!(
            mode = %self.config.embark.mode,
            process_mets = self.config.processing.process_mets,
            process_json = self.config.processing.process_json,
            single_record_mode = self.config.application.single_record_mode,
            "Starting harvest"
        );

        self.workspace.ensure()?;

        if self.config.processing.process_mets {
            self.harvest_mets(now, &mut summary).await;
        }
        if self.config.processing.process_json {
            self.harvest_json(now, &mut summary).await;
        }

        match self.notifier.dispatch(&summary.report).await {
            Ok(sent) => summary.notification_sent = sent,
            Err(e) => summary.add_error(HarvestError::new(
                HarvestErrorType::Notification,
                e.to_string(),
            )),
        }

        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn harvest_mets(&self, now: DateTime<Utc>, summary: &mut HarvestSummary) {
        let format = RecordFormat::Xml;
        let Some(body) = self.fetch(format, now, summary).await else {
            return;
        };

        let path = match self.workspace.write_composite(format, body.as_bytes()) {
            Ok(path) => path,
            Err(e) => {
                record_error(
                    summary,
                    HarvestError::new(HarvestErrorType::LocalIo, e.to_string()).in_pass(format),
                );
                return;
            }
        };
        drop(body);

        let processing = &self.config.processing;
        match NamespaceAwareXmlSplitter::open(
            &path,
            &processing.xml_record_tag,
            &processing.xsi_schema_location,
        ) {
            Ok(splitter) => {
                for item in splitter {
                    let record = match item {
                        Ok(record) => record,
                        Err(e) => {
                            record_error(
                                summary,
                                HarvestError::new(HarvestErrorType::Parse, e.to_string())
                                    .in_pass(format),
                            );
                            break;
                        }
                    };
                    summary.records_seen += 1;
                    self.process_xml_record(&record, summary).await;

                    if self.config.application.single_record_mode {
                        tracing::info!(
                            format = %format,
                            "Single-record mode; stopping after first record"
                        );
                        break;
                    }
                }
            }
            Err(KioskError::SourceFileMissing(missing)) => record_error(
                summary,
                HarvestError::new(
                    HarvestErrorType::SourceFileMissing,
                    format!("{} is missing; nothing to split", missing.display()),
                )
                .in_pass(format),
            ),
            Err(e) => record_error(
                summary,
                HarvestError::new(HarvestErrorType::LocalIo, e.to_string()).in_pass(format),
            ),
        }

        self.cleanup_composite(&path);
    }

    async fn harvest_json(&self, now: DateTime<Utc>, summary: &mut HarvestSummary) {
        let format = RecordFormat::Json;
        let Some(body) = self.fetch(format, now, summary).await else {
            return;
        };

        let document: Value = match serde_json::from_str(&body) {
            Ok(document) => document,
            Err(e) => {
                record_error(
                    summary,
                    HarvestError::new(
                        HarvestErrorType::Parse,
                        format!("Composite JSON is not valid: {e}"),
                    )
                    .in_pass(format),
                );
                return;
            }
        };
        drop(body);

        let path = match serde_json::to_vec_pretty(&document)
            .map_err(KioskError::from)
            .and_then(|pretty| self.workspace.write_composite(format, &pretty))
        {
            Ok(path) => path,
            Err(e) => {
                record_error(
                    summary,
                    HarvestError::new(HarvestErrorType::LocalIo, e.to_string()).in_pass(format),
                );
                return;
            }
        };

        let splitter =
            JsonObjectSplitter::new(document, &self.config.processing.json_identifier_field);
        for record in splitter {
            summary.records_seen += 1;
            self.process_json_record(&record, summary).await;

            if self.config.application.single_record_mode {
                tracing::info!(
                    format = %format,
                    "Single-record mode; stopping after first record"
                );
                break;
            }
        }

        self.cleanup_composite(&path);
    }

    /// Fetch one composite document; `None` means there is nothing to process
    async fn fetch(
        &self,
        format: RecordFormat,
        now: DateTime<Utc>,
        summary: &mut HarvestSummary,
    ) -> Option<String> {
        let url = metadata_url(&self.config.embark, format, now);
        tracing::info!(
            category = "fetch",
            format = %format,
            url = %url,
            "Fetching composite metadata"
        );

        match self.sinks.source.fetch(&url).await {
            Ok(body) if body.trim().is_empty() => {
                tracing::info!(category = "fetch", format = %format, "No content returned");
                None
            }
            Ok(body) => Some(body),
            Err(e) => {
                record_error(
                    summary,
                    HarvestError::new(HarvestErrorType::Fetch, e.to_string()).in_pass(format),
                );
                None
            }
        }
    }

    async fn process_xml_record(&self, record: &XmlRecord, summary: &mut HarvestSummary) {
        let format = RecordFormat::Xml;
        let object_id = match xml_object_id(&self.identifier_path, record) {
            Ok(id) => id,
            Err(e) => {
                summary.records_failed += 1;
                record_error(
                    summary,
                    HarvestError::new(HarvestErrorType::Parse, e.to_string()).in_pass(format),
                );
                return;
            }
        };
        crate::log_record_start!(format.as_str(), &object_id);

        let missing = self
            .validator
            .validate_xml(&object_id, &record.root, &record.namespaces);
        if !missing.is_empty() {
            summary.records_with_missing_fields += 1;
            summary.report.append(&object_id, format, &missing);
        }

        let outcome = match record.root.to_document() {
            Ok(bytes) => self.distribute(&object_id, format, &bytes, summary).await,
            Err(e) => Err(HarvestError::new(HarvestErrorType::Parse, e.to_string())),
        };
        self.finish_record(&object_id, format, outcome, summary);
    }

    async fn process_json_record(&self, record: &JsonRecord, summary: &mut HarvestSummary) {
        let format = RecordFormat::Json;
        let object_id = match record.id() {
            Ok(id) => id,
            Err(e) => {
                summary.records_failed += 1;
                record_error(
                    summary,
                    HarvestError::new(HarvestErrorType::Parse, e.to_string()).in_pass(format),
                );
                return;
            }
        };
        crate::log_record_start!(format.as_str(), &object_id);

        let assets = record.digital_assets();
        tracing::debug!(
            object_id = %object_id,
            digital_assets = assets.len(),
            "Digital assets referenced"
        );
        summary.digital_assets += assets.len();

        let missing = self.validator.validate_json(&object_id, record);
        if !missing.is_empty() {
            summary.records_with_missing_fields += 1;
            summary.report.append(&object_id, format, &missing);
        }

        let outcome = match record.to_bytes() {
            Ok(bytes) => self.distribute(&object_id, format, &bytes, summary).await,
            Err(e) => Err(HarvestError::new(HarvestErrorType::Parse, e.to_string())),
        };
        self.finish_record(&object_id, format, outcome, summary);
    }

    fn finish_record(
        &self,
        object_id: &ObjectId,
        format: RecordFormat,
        outcome: std::result::Result<(), HarvestError>,
        summary: &mut HarvestSummary,
    ) {
        match outcome {
            Ok(()) => summary.records_processed += 1,
            Err(error) => {
                summary.records_failed += 1;
                record_error(summary, error.in_pass(format).for_object(object_id));
            }
        }
    }

    /// Write the artifact, then hand it to every enabled sink
    ///
    /// The local copy of a failed record is kept for inspection.
    async fn distribute(
        &self,
        object_id: &ObjectId,
        format: RecordFormat,
        contents: &[u8],
        summary: &mut HarvestSummary,
    ) -> std::result::Result<(), HarvestError> {
        let path = self
            .workspace
            .write_artifact(object_id, format, contents)
            .map_err(|e| HarvestError::new(HarvestErrorType::LocalIo, e.to_string()))?;

        if let Some(upserter) = &self.upserter {
            let outcome = upserter
                .upsert(&path, format.mime_type())
                .await
                .map_err(|e| HarvestError::new(HarvestErrorType::Upsert, e.to_string()))?;
            match outcome.action {
                UpsertAction::Created => summary.files_created += 1,
                UpsertAction::Updated => summary.files_updated += 1,
            }
            tracing::debug!(
                category = "upsert",
                object_id = %object_id,
                file_id = %outcome.file_id,
                action = %outcome.action,
                "Remote file written"
            );
        }

        if let Some(storage) = &self.sinks.objects {
            let key = self.config.s3.key_for(&object_id.file_name(format.extension()));
            storage
                .put_file(&self.config.s3.bucket, &key, &path, format.mime_type())
                .await
                .map_err(|e| {
                    HarvestError::new(HarvestErrorType::SecondaryStorage, e.to_string())
                })?;
            summary.objects_copied += 1;
            tracing::debug!(
                category = "secondary_storage",
                object_id = %object_id,
                key = %key,
                "Copied to object storage"
            );
        }

        if self.config.workspace.delete_local_copy {
            self.workspace.remove(&path);
        }
        Ok(())
    }

    fn cleanup_composite(&self, path: &Path) {
        if self.config.workspace.delete_local_copy {
            self.workspace.remove(path);
        }
    }
}

fn record_error(summary: &mut HarvestSummary, error: HarvestError) {
    tracing::error!(
        category = error.error_type.category(),
        format = error.format.map(|f| f.as_str()),
        object_id = error.object_id.as_ref().map(ObjectId::as_str),
        error = %error.message,
        "Harvest step failed"
    );
    summary.add_error(error);
}
