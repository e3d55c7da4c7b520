//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "kiosk.toml")]
    pub output: String,

    /// Include every section with example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Kiosk Export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your Embark server address", self.output);
                println!("  2. Add required fields under [processing]");
                println!("  3. To distribute records, create a .env file with:");
                println!("     - KIOSK_GOOGLE_PRIVATE_KEY (service account key)");
                println!("     - AWS credentials for S3 and SES");
                println!("  4. Validate configuration: kiosk-export validate-config");
                println!("  5. Run a harvest: kiosk-export harvest --single-record");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    pub fn generate_minimal_config() -> String {
        r#"# Kiosk Export Configuration File
# Embark museum metadata harvester

[application]
log_level = "info"
single_record_mode = false

[embark]
server_address = "https://embark.example.edu"
mode = "incremental"
hours_threshold = 72

[workspace]
folder = "/tmp/kiosk-export"
delete_local_copy = true

[processing]
process_mets = true
process_json = true

[[processing.json_required_fields]]
name = "Title"
path = "title"

[google]
enabled = false

[s3]
enabled = false

[notification]
enabled = false

[logging]
local_enabled = true
local_path = "/var/log/kiosk-export"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples
    pub fn generate_config_with_examples() -> String {
        r#"# Kiosk Export Configuration File
# Embark museum metadata harvester
#
# Values may reference environment variables as ${VAR_NAME}; every
# setting can also be overridden with KIOSK_<SECTION>_<KEY>.

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# Stop each pass after its first record (test runs)
single_record_mode = false

[embark]
# Embark server base address
server_address = "https://embark.example.edu"

# Harvest mode: full or incremental
mode = "incremental"

# Incremental look-back window in hours
hours_threshold = 72

# Embark layouts producing composite METS and JSON
mets_layout = "marble_mets"
json_layout = "marble"

# Full exports can take a long time
timeout_seconds = 1800

[workspace]
# Local working folder
folder = "/tmp/kiosk-export"

# Composite document file names
xml_file_name = "web_kiosk_composite_metadata.xml"
json_file_name = "web_kiosk_composite_metadata.json"

# Delete per-object artifacts after distribution
delete_local_copy = true

[processing]
process_mets = true
process_json = true

# Top-level record element of the composite METS document
xml_record_tag = "mets:mets"

# Path of the object identifier inside each METS record
xml_identifier_path = 'mets:dmdSec[@ID="DSC_01_SNITE"]/mets:mdWrap[@MDTYPE="DC"]/mets:xmlData/dcterms:identifier'

# Identifier key of each JSON object
json_identifier_field = "uniqueIdentifier"

# Required fields: display name and path. XML paths are relative to the
# record root; a trailing [@attr] falls back to the attribute when the
# element has no text.
[[processing.xml_required_fields]]
name = "Title"
path = 'mets:dmdSec[@ID="DSC_01_SNITE"]/mets:mdWrap[@MDTYPE="DC"]/mets:xmlData/dcterms:title'

[[processing.xml_required_fields]]
name = "Thumbnail"
path = 'mets:fileSec/mets:fileGrp[@USE="THUMBNAIL"]/mets:file/mets:FLocat[@xlink:href]'

# JSON paths are top-level keys
[[processing.json_required_fields]]
name = "Title"
path = "title"

[[processing.json_required_fields]]
name = "Creator"
path = "creator"

[google]
enabled = false
api_base_url = "https://www.googleapis.com"

[google.credentials]
client_email = "harvester@project.iam.gserviceaccount.com"
# private_key = "${KIOSK_GOOGLE_PRIVATE_KEY}"
token_uri = "https://oauth2.googleapis.com/token"

[google.metadata]
drive_id = "0AASeuQIa42uxUk9PVA"
parent_folder_id = "1F5cgW7ORRGHcpy2fbYiFE528RuDjHnrJ"

[s3]
enabled = false
bucket = "marble-data-broker-publicbucket"
key_prefix = "embark-separated-json-records/"
# region = "us-east-1"

[notification]
enabled = false
sender = "noreply@example.edu"
# Comma-separated
recipients = "curator@example.edu, webmaster@example.edu"
region = "us-east-1"

[logging]
# Enable local file logging
local_enabled = true

# Local log file path
local_path = "/var/log/kiosk-export"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
