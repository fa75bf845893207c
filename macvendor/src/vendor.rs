use chrono::DateTime;
use macvendor_core::record::format_oui;
use macvendor_core::VendorRecord;
use serde::Serialize;

/// Label used when a record carries no category bit.
pub const UNKNOWN_BLOCK: &str = "Unknown";

/// Human-facing vendor entry returned by a lookup.
///
/// Serializes with the field names of the upstream registry feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vendor {
    /// Assignment block size: "MA-L", "MA-M", "MA-S" or "IAB".
    #[serde(rename = "blockType")]
    pub assignment_block_size: String,

    /// Organization that registered the block. Reads "Private" when the
    /// registrant paid IEEE to withhold its details.
    #[serde(rename = "vendorName")]
    pub company_name: String,

    #[serde(rename = "private")]
    pub is_private: bool,

    /// `YYYY/MM/DD`.
    #[serde(rename = "lastUpdate")]
    pub last_update: String,

    /// Registered prefix, e.g. `94:05:bb:9`.
    #[serde(rename = "macPrefix")]
    pub oui: String,
}

impl From<&VendorRecord> for Vendor {
    fn from(record: &VendorRecord) -> Self {
        Vendor {
            assignment_block_size: record
                .block_size()
                .map_or(UNKNOWN_BLOCK, |block| block.label())
                .to_string(),
            company_name: record.company_name().to_string(),
            is_private: record.is_private(),
            last_update: format_date(record.last_update()),
            oui: format_oui(record.oui()),
        }
    }
}

/// Format epoch seconds as `YYYY/MM/DD` (UTC). Out-of-range timestamps
/// render as an empty string.
pub fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y/%m/%d").to_string())
        .unwrap_or_default()
}
