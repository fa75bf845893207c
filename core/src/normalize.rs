//! Upstream registry records → compact [`VendorRecord`]s.
//!
//! The upstream feed is a JSON array in the maclookup.app shape:
//!
//! ```text
//! [{"macPrefix":"54:BF:64","vendorName":"Dell Inc.","private":false,
//!   "blockType":"MA-L","lastUpdate":"2018/02/15"}, ...]
//! ```
//!
//! Extra fields some feed variants carry (company address, country code)
//! are ignored.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::NormalizeError;
use crate::record::{BlockSize, VendorRecord};

/// One entry of the upstream feed, as published.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub block_type: String,
    pub vendor_name: String,
    #[serde(default)]
    pub private: bool,
    pub last_update: String,
    pub mac_prefix: String,
}

enum DateFormat {
    DateTime(&'static str),
    Date(&'static str),
}

/// Tried in order; the first format that parses the whole string wins.
const DATE_FORMATS: [DateFormat; 4] = [
    DateFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    DateFormat::Date("%Y-%m-%d"),
    DateFormat::Date("%Y/%m/%d"),
    DateFormat::DateTime("%Y/%m/%d %H:%M:%S"),
];

/// Parse an upstream date string into seconds since the Unix epoch (UTC).
pub fn parse_date(value: &str) -> Option<i64> {
    DATE_FORMATS.iter().find_map(|format| match format {
        DateFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt)
            .ok()
            .map(|dt| dt.and_utc().timestamp()),
        DateFormat::Date(fmt) => NaiveDate::parse_from_str(value, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp()),
    })
}

/// Parse a colon-separated prefix ("94:05:BB:9") into octets.
///
/// Tokens are one or two hex digits; the prefix has 3 to 5 of them. Widths
/// per block size are enforced separately by [`check_token_widths`].
pub fn parse_oui(oui: &str) -> Result<Vec<u8>, NormalizeError> {
    let invalid = || NormalizeError::InvalidOui {
        oui: oui.to_string(),
    };

    let octets = oui
        .split(':')
        .map(|token| {
            if token.is_empty() || token.len() > 2 || !token.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return None;
            }
            u8::from_str_radix(token, 16).ok()
        })
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(invalid)?;

    if !(3..=5).contains(&octets.len()) {
        return Err(invalid());
    }
    Ok(octets)
}

/// Check that every token but the last is two digits wide and that the last
/// is one digit for MA-M, MA-S and IAB prefixes (the trailing nibble) and two
/// for MA-L. Only then does the trie key line up with the candidate prefixes
/// a lookup derives from a full address.
pub fn check_token_widths(oui: &str, block: BlockSize) -> Result<(), NormalizeError> {
    let last_width = match block {
        BlockSize::Large => 2,
        BlockSize::Medium | BlockSize::Small | BlockSize::Individual => 1,
    };
    let tokens: Vec<&str> = oui.split(':').collect();
    let well_formed = tokens.split_last().is_some_and(|(last, head)| {
        last.len() == last_width && head.iter().all(|token| token.len() == 2)
    });
    if !well_formed {
        return Err(NormalizeError::InvalidOui {
            oui: oui.to_string(),
        });
    }
    Ok(())
}

/// Trie key for a prefix: its hex digits, lowercased, without separators.
pub fn trie_key(oui: &str) -> String {
    oui.split(':').collect::<String>().to_ascii_lowercase()
}

/// Backticks broke the old source-literal embedding; they are still
/// replaced so artifacts stay byte-identical across generator versions.
pub fn sanitize_company_name(name: &str) -> String {
    name.replace('`', "'")
}

/// Normalize a single upstream record into its trie key and compact form.
pub fn normalize(source: &SourceRecord) -> Result<(String, VendorRecord), NormalizeError> {
    let oui = source.mac_prefix.as_str();

    let block =
        BlockSize::from_label(&source.block_type).ok_or_else(|| NormalizeError::UnknownBlockSize {
            oui: oui.to_string(),
            label: source.block_type.clone(),
        })?;

    let octets = parse_oui(oui)?;
    if octets.len() != block.oui_len() {
        return Err(NormalizeError::BlockSizeMismatch {
            oui: oui.to_string(),
            block,
            octets: octets.len(),
            expected: block.oui_len(),
        });
    }
    check_token_widths(oui, block)?;

    let last_update =
        parse_date(&source.last_update).ok_or_else(|| NormalizeError::InvalidDateFormat {
            oui: oui.to_string(),
            value: source.last_update.clone(),
        })?;

    let record = VendorRecord::new(
        block,
        source.private,
        sanitize_company_name(&source.vendor_name),
        last_update,
        octets,
    )?;

    Ok((trie_key(oui), record))
}

/// Normalize a batch of records into a key-sorted map.
///
/// Duplicate prefixes keep the last record. The first invalid record aborts
/// the whole batch.
pub fn normalize_all(
    sources: &[SourceRecord],
) -> Result<BTreeMap<String, VendorRecord>, NormalizeError> {
    let mut records = BTreeMap::new();
    for source in sources {
        let (key, record) = normalize(source)?;
        if records.insert(key, record).is_some() {
            debug!(oui = %source.mac_prefix, "Duplicate prefix in source, keeping last record");
        }
    }
    Ok(records)
}

/// Decode the upstream JSON array from `reader` and normalize every entry.
pub fn load_records<R: Read>(reader: R) -> Result<BTreeMap<String, VendorRecord>, NormalizeError> {
    let sources: Vec<SourceRecord> = serde_json::from_reader(reader)?;
    let records = normalize_all(&sources)?;
    info!(
        source_count = sources.len(),
        count = records.len(),
        "Normalized vendor records"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(block: &str, prefix: &str, date: &str) -> SourceRecord {
        SourceRecord {
            block_type: block.to_string(),
            vendor_name: "Dell Inc.".to_string(),
            private: false,
            last_update: date.to_string(),
            mac_prefix: prefix.to_string(),
        }
    }

    #[test]
    fn test_parse_date_accepts_all_formats() {
        // 2018-02-15T00:00:00Z
        let midnight = 1_518_652_800;
        assert_eq!(parse_date("2018-02-15"), Some(midnight));
        assert_eq!(parse_date("2018/02/15"), Some(midnight));
        assert_eq!(parse_date("2018-02-15 10:30:00"), Some(midnight + 37_800));
        assert_eq!(parse_date("2018/02/15 10:30:00"), Some(midnight + 37_800));
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert_eq!(parse_date("15.02.2018"), None);
        assert_eq!(parse_date("2018-02-15T10:30:00Z"), None);
        assert_eq!(parse_date("2018/02/15 junk"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_oui() {
        assert_eq!(parse_oui("54:BF:64").unwrap(), vec![0x54, 0xbf, 0x64]);
        assert_eq!(parse_oui("94:05:BB:9").unwrap(), vec![0x94, 0x05, 0xbb, 0x09]);
        assert_eq!(
            parse_oui("70:b3:d5:e6:f").unwrap(),
            vec![0x70, 0xb3, 0xd5, 0xe6, 0x0f]
        );
    }

    #[test]
    fn test_parse_oui_rejects_malformed() {
        for bad in ["54:BF", "54:BF:64:00:11:22", "54:BF:6G", "54::64", "54:BF:164", "+5:BF:64", ""] {
            assert!(
                matches!(parse_oui(bad), Err(NormalizeError::InvalidOui { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_token_widths_follow_block_size() {
        assert!(check_token_widths("54:BF:64", BlockSize::Large).is_ok());
        assert!(check_token_widths("94:05:BB:9", BlockSize::Medium).is_ok());
        assert!(check_token_widths("70:B3:D5:E6:F", BlockSize::Small).is_ok());
        assert!(check_token_widths("00:50:C2:00:1", BlockSize::Individual).is_ok());

        for (bad, block) in [
            ("5:BF:64", BlockSize::Large),
            ("54:BF:4", BlockSize::Large),
            ("94:05:BB:90", BlockSize::Medium),
            ("94:5:BB:9", BlockSize::Medium),
            ("70:B3:D5:E6:F0", BlockSize::Small),
        ] {
            assert!(
                matches!(check_token_widths(bad, block), Err(NormalizeError::InvalidOui { .. })),
                "{bad:?} should be rejected for {block}"
            );
        }
    }

    #[test]
    fn test_normalize_rejects_keys_no_address_can_reach() {
        // "5:BF:64" would be keyed 5bf64 but display as 05:bf:64; "94:05:BB:90"
        // would be keyed with 8 digits where MA-M lookups use 7.
        for (block, prefix) in [("MA-L", "5:BF:64"), ("MA-M", "94:05:BB:90")] {
            let err = normalize(&source(block, prefix, "2018/02/15")).unwrap_err();
            assert!(
                matches!(err, NormalizeError::InvalidOui { ref oui } if oui == prefix),
                "{prefix:?} should be rejected, got {err}"
            );
        }
    }

    #[test]
    fn test_trie_key_strips_separators() {
        assert_eq!(trie_key("70:B3:D5:E6:F"), "70b3d5e6f");
        assert_eq!(trie_key("54:bf:64"), "54bf64");
    }

    #[test]
    fn test_normalize_small_block() {
        let mut src = source("MA-S", "70:B3:D5:E6:F", "2019/09/27");
        src.vendor_name = "Amazon Technologies Inc.".to_string();
        src.private = true;

        let (key, record) = normalize(&src).unwrap();
        assert_eq!(key, "70b3d5e6f");
        assert_eq!(record.block_size(), Some(BlockSize::Small));
        assert!(record.is_private());
        assert_eq!(record.company_name(), "Amazon Technologies Inc.");
        assert_eq!(record.oui(), &[0x70, 0xb3, 0xd5, 0xe6, 0x0f]);
        assert_eq!(record.last_update(), 1_569_542_400);
    }

    #[test]
    fn test_normalize_replaces_backticks() {
        let mut src = source("MA-L", "00:11:22", "2015/11/17");
        src.vendor_name = "Xi`an Data`Link".to_string();
        let (_, record) = normalize(&src).unwrap();
        assert_eq!(record.company_name(), "Xi'an Data'Link");
    }

    #[test]
    fn test_normalize_rejects_unknown_block_label() {
        let err = normalize(&source("CID", "54:BF:64", "2018/02/15")).unwrap_err();
        assert!(matches!(err, NormalizeError::UnknownBlockSize { ref label, .. } if label == "CID"));
    }

    #[test]
    fn test_normalize_rejects_category_mismatch() {
        let err = normalize(&source("MA-M", "54:BF:64", "2018/02/15")).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::BlockSizeMismatch {
                block: BlockSize::Medium,
                octets: 3,
                expected: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_normalize_reports_bad_date_with_oui() {
        let err = normalize(&source("MA-L", "54:BF:64", "Feb 15 2018")).unwrap_err();
        match err {
            NormalizeError::InvalidDateFormat { oui, value } => {
                assert_eq!(oui, "54:BF:64");
                assert_eq!(value, "Feb 15 2018");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_records_sorts_and_keeps_last_duplicate() {
        let json = r#"[
            {"macPrefix":"94:05:BB","vendorName":"IEEE Registration Authority","private":false,"blockType":"MA-L","lastUpdate":"2019/11/28"},
            {"macPrefix":"54:BF:64","vendorName":"Dell","private":false,"blockType":"MA-L","lastUpdate":"2018/02/15"},
            {"macPrefix":"54:bf:64","vendorName":"Dell Inc.","private":false,"blockType":"MA-L","lastUpdate":"2018/02/15","countryCode":"US"}
        ]"#;

        let records = load_records(json.as_bytes()).unwrap();
        let keys: Vec<&str> = records.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["54bf64", "9405bb"]);
        assert_eq!(records["54bf64"].company_name(), "Dell Inc.");
    }

    #[test]
    fn test_load_records_aborts_on_first_error() {
        let json = r#"[
            {"macPrefix":"54:BF:64","vendorName":"Dell Inc.","private":false,"blockType":"MA-L","lastUpdate":"2018/02/15"},
            {"macPrefix":"94:05:BB:9","vendorName":"Zimmer GmbH","private":false,"blockType":"MA-M","lastUpdate":"yesterday"}
        ]"#;

        let err = load_records(json.as_bytes()).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidDateFormat { ref oui, .. } if oui == "94:05:BB:9"));
    }

    #[test]
    fn test_load_records_rejects_malformed_json() {
        let err = load_records(&b"{\"macPrefix\": 1}"[..]).unwrap_err();
        assert!(matches!(err, NormalizeError::Json(_)));
    }
}
