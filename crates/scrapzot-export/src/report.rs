use scrapzot_core::BuildStats;
use serde::Serialize;

/// Summary of one conversion, written out by `--report`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub build: BuildStats,
    /// Primary `bib:Document` records.
    pub records: usize,
    /// Payload attachments, one per record.
    pub attachments: usize,
    pub pdf_attachments: usize,
    pub collections: usize,
    /// Ordinals that matched the exclusion set.
    pub excluded: Vec<u64>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub id: String,
    /// Notes are skipped before they are numbered.
    pub ordinal: Option<u64>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedNote,
    MissingPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_skip_reasons_in_snake_case() {
        let report = ExportReport {
            records: 2,
            excluded: vec![3],
            skipped: vec![
                SkippedEntry {
                    id: "20180101000001".into(),
                    ordinal: None,
                    reason: SkipReason::UnsupportedNote,
                },
                SkippedEntry {
                    id: "20180101000002".into(),
                    ordinal: Some(4),
                    reason: SkipReason::MissingPayload,
                },
            ],
            ..ExportReport::default()
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["records"], 2);
        assert_eq!(value["excluded"], json!([3]));
        assert_eq!(
            value["skipped"],
            json!([
                {"id": "20180101000001", "ordinal": null, "reason": "unsupported_note"},
                {"id": "20180101000002", "ordinal": 4, "reason": "missing_payload"},
            ])
        );
        assert_eq!(value["build"]["lost_items"], 0);
    }
}
