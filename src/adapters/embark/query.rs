//! Embark query URL construction

use crate::config::{EmbarkConfig, HarvestMode};
use crate::domain::RecordFormat;
use chrono::{DateTime, Duration, Utc};

/// Start date of the incremental window, formatted `MM/DD/YYYY`
pub fn incremental_since(now: DateTime<Utc>, hours_threshold: u32) -> String {
    let since = now - Duration::hours(i64::from(hours_threshold));
    since.format("%m/%d/%Y").to_string()
}

/// Build the Embark `results.html` URL for one composite document
///
/// `now` is injected so the incremental window can be pinned in tests.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use kiosk_export::adapters::embark::metadata_url;
/// use kiosk_export::config::{EmbarkConfig, HarvestMode};
/// use kiosk_export::domain::RecordFormat;
///
/// let config = EmbarkConfig {
///     server_address: "https://embark.example.edu".to_string(),
///     mode: HarvestMode::Full,
///     ..Default::default()
/// };
/// let url = metadata_url(&config, RecordFormat::Xml, Utc::now());
/// assert!(url.ends_with("&query=_ID=ALL"));
/// ```
pub fn metadata_url(config: &EmbarkConfig, format: RecordFormat, now: DateTime<Utc>) -> String {
    let layout = match format {
        RecordFormat::Xml => &config.mets_layout,
        RecordFormat::Json => &config.json_layout,
    };

    let base_url = format!(
        "{}/results.html?layout={}&format={}&maximumrecords=-1&recordType=objects_1",
        config.server_address.trim_end_matches('/'),
        layout,
        format.as_str()
    );

    match config.mode {
        HarvestMode::Full => format!("{base_url}&query=_ID=ALL"),
        HarvestMode::Incremental => format!(
            "{base_url}&query=mod_date%3E%22{}%22",
            incremental_since(now, config.hours_threshold)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn config(mode: HarvestMode) -> EmbarkConfig {
        EmbarkConfig {
            server_address: "https://embark.example.edu/".to_string(),
            mode,
            ..Default::default()
        }
    }

    #[test_case(2024, 3, 4, 10, 72, "03/01/2024" ; "three days back")]
    #[test_case(2024, 3, 1, 1, 2, "02/29/2024" ; "crosses leap day")]
    #[test_case(2025, 1, 1, 12, 24, "12/31/2024" ; "crosses year")]
    #[test_case(2025, 6, 15, 23, 1, "06/15/2025" ; "same day")]
    fn test_incremental_since(y: i32, m: u32, d: u32, h: u32, hours: u32, expected: &str) {
        let now = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        assert_eq!(incremental_since(now, hours), expected);
    }

    #[test]
    fn test_full_mode_url() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let url = metadata_url(&config(HarvestMode::Full), RecordFormat::Xml, now);
        assert_eq!(
            url,
            "https://embark.example.edu/results.html?layout=marble_mets&format=xml\
             &maximumrecords=-1&recordType=objects_1&query=_ID=ALL"
        );
    }

    #[test]
    fn test_incremental_json_url() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let url = metadata_url(&config(HarvestMode::Incremental), RecordFormat::Json, now);
        assert_eq!(
            url,
            "https://embark.example.edu/results.html?layout=marble&format=json\
             &maximumrecords=-1&recordType=objects_1&query=mod_date%3E%2203/01/2024%22"
        );
    }
}
