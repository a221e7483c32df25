//! JSON wire format for analysis exports and record imports.
//!
//! Exports are `{ version, timestamp, analyses: [{ name, record, analysis }] }`.
//! Imports accept a single record, an array of records, or `{ "teas": [...] }`,
//! and also read back an export's records.

use serde::{Deserialize, Serialize};

use crate::combiner::ElementAnalysis;
use crate::record::TeaRecord;
use crate::time::now_iso8601;

pub const CURRENT_VERSION: &str = "1.0";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireExport {
    pub version: String,
    #[serde(default)]
    pub timestamp: String,
    pub analyses: Vec<WireAnalysis>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireAnalysis {
    pub name: String,
    pub record: TeaRecord,
    pub analysis: ElementAnalysis,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireInput {
    Export(WireExport),
    Wrapped { teas: Vec<TeaRecord> },
    Many(Vec<TeaRecord>),
    One(TeaRecord),
}

impl WireExport {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a TeaRecord, &'a ElementAnalysis)>) -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            timestamp: now_iso8601(),
            analyses: entries
                .into_iter()
                .map(|(record, analysis)| WireAnalysis {
                    name: record.display_name().to_string(),
                    record: record.clone(),
                    analysis: analysis.clone(),
                })
                .collect(),
        }
    }
}

/// Pretty-printed export of `(record, analysis)` pairs.
pub fn export_json(records: &[TeaRecord], analyses: &[ElementAnalysis]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&WireExport::new(records.iter().zip(analyses)))
}

/// Records from any accepted input shape.
pub fn import_records(json: &str) -> Result<Vec<TeaRecord>, serde_json::Error> {
    let input: WireInput = serde_json::from_str(json)?;
    Ok(match input {
        WireInput::Export(export) => export.analyses.into_iter().map(|a| a.record).collect(),
        WireInput::Wrapped { teas } => teas,
        WireInput::Many(teas) => teas,
        WireInput::One(tea) => vec![tea],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::analyze_batch;
    use crate::combiner::Combiner;

    fn sample() -> Vec<TeaRecord> {
        vec![
            TeaRecord::named("Sencha").with_flavors(["grassy", "umami"]),
            TeaRecord::named("Assam").with_compounds(8.0, 3.0),
        ]
    }

    #[test]
    fn test_export_shape() {
        let recs = sample();
        let analyses = analyze_batch(&Combiner::default(), &recs);
        let json = export_json(&recs, &analyses).unwrap();
        let wire: WireExport = serde_json::from_str(&json).unwrap();
        assert_eq!(wire.version, CURRENT_VERSION);
        assert_eq!(wire.analyses.len(), 2);
        assert_eq!(wire.analyses[0].name, "Sencha");
        assert_eq!(wire.analyses[1].record, recs[1]);
    }

    #[test]
    fn test_import_single_record() {
        let recs = import_records(r#"{"name": "Gyokuro", "flavorProfile": ["umami"]}"#).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name.as_deref(), Some("Gyokuro"));
    }

    #[test]
    fn test_import_array_and_wrapped() {
        let arr = import_records(r#"[{"name": "a"}, {"caffeineLevel": 4}]"#).unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1].caffeine_level, Some(4.0));

        let wrapped = import_records(r#"{"teas": [{"name": "a"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 1);
    }

    #[test]
    fn test_import_reads_export_records() {
        let recs = sample();
        let analyses = analyze_batch(&Combiner::default(), &recs);
        let json = export_json(&recs, &analyses).unwrap();
        assert_eq!(import_records(&json).unwrap(), recs);
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(import_records("42").is_err());
        assert!(import_records("not json").is_err());
    }
}
