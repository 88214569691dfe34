//! Per-frame annotation records in append-only JSONL format.
//!
//! One JSON object per line, keyed by frame ordinal. The same format is
//! written by the pipeline's sidecar log and read back for replaying
//! externally computed annotations. Lines starting with `#` are headers or
//! comments and are skipped on parse.

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;

/// The annotations attached to one frame ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame ordinal within the stream, starting at 0.
    #[serde(rename = "frame")]
    pub frame_index: u64,

    /// Annotations for that frame, in draw order.
    pub annotations: Vec<Annotation>,
}

/// Parse records from JSONL content (one JSON object per line).
pub fn parse_records(jsonl: &str) -> Result<Vec<FrameRecord>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize records to JSONL format.
pub fn serialize_records(records: &[FrameRecord]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnalyzerId;
    use crate::region::Region;

    fn record(frame_index: u64, label: &str) -> FrameRecord {
        FrameRecord {
            frame_index,
            annotations: vec![Annotation {
                region: Region::new(1, 2, 3, 4),
                label: label.to_string(),
                detail: "neutral".to_string(),
                source: AnalyzerId::new("external"),
            }],
        }
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let records = vec![record(0, "Ada"), record(10, "Grace")];
        let jsonl = serialize_records(&records).unwrap();
        let parsed = parse_records(&jsonl).unwrap();
        assert_eq!(records, parsed);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let jsonl = "# produced by an external detector\n\n\
            {\"frame\":0,\"annotations\":[]}\n";
        let parsed = parse_records(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].frame_index, 0);
        assert!(parsed[0].annotations.is_empty());
    }

    #[test]
    fn test_json_format_uses_frame_key() {
        let json = serde_json::to_string(&record(7, "Ada")).unwrap();
        assert!(json.contains("\"frame\":7"));
        assert!(json.contains("\"annotations\""));
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        assert!(parse_records("{\"frame\":}").is_err());
    }
}
