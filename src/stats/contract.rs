use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{PlotError, PlotResult};

use super::IterationStatistics;

pub const ITERATION_STATISTICS_JSON_SCHEMA_V1: u32 = 1;

const READER_ORIGIN: &str = "<reader>";
const SCHEMA_VERSION_KEY: &str = "schema_version";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStatisticsJsonContractV1 {
    pub schema_version: u32,
    pub statistics: IterationStatistics,
}

impl IterationStatistics {
    pub fn to_json_contract_v1_pretty(&self) -> PlotResult<String> {
        let payload = IterationStatisticsJsonContractV1 {
            schema_version: ITERATION_STATISTICS_JSON_SCHEMA_V1,
            statistics: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            PlotError::InvalidData(format!("failed to serialize statistics contract v1: {e}"))
        })
    }

    /// Parses a v1 contract document, or a bare statistics object.
    pub fn from_json_compat_slice(input: &[u8]) -> PlotResult<Self> {
        Self::decode(input, Path::new(READER_ORIGIN))
    }

    /// Reads and decodes statistics from `reader`.
    ///
    /// The reader is consumed and dropped before this returns, whether
    /// decoding succeeds or not.
    pub fn from_reader<R: Read>(reader: R) -> PlotResult<Self> {
        Self::read_from(reader, Path::new(READER_ORIGIN))
    }

    /// Opens `path` and decodes the statistics it holds.
    pub fn load_file(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| PlotError::io(path, err))?;
        let statistics = Self::read_from(file, path)?;
        debug!(
            path = %path.display(),
            records = statistics.len(),
            categories = statistics.categories.len(),
            "loaded iteration statistics"
        );
        Ok(statistics)
    }

    /// Writes the statistics to `path` as a v1 contract document.
    pub fn write_file(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        let path = path.as_ref();
        self.validate()?;
        let payload = IterationStatisticsJsonContractV1 {
            schema_version: ITERATION_STATISTICS_JSON_SCHEMA_V1,
            statistics: self.clone(),
        };
        let file = File::create(path).map_err(|err| PlotError::io(path, err))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &payload).map_err(|e| {
            PlotError::InvalidData(format!("failed to serialize statistics contract v1: {e}"))
        })?;
        writer.flush().map_err(|err| PlotError::io(path, err))
    }

    fn read_from<R: Read>(mut reader: R, origin: &Path) -> PlotResult<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|err| PlotError::io(origin, err))?;
        drop(reader);
        Self::decode(&bytes, origin)
    }

    /// A document with a `schema_version` key is read as a contract; any
    /// other document as a bare statistics object. Errors come from the
    /// branch the document selects.
    fn decode(input: &[u8], origin: &Path) -> PlotResult<Self> {
        let decode_error = |source| PlotError::Decode {
            path: origin.to_path_buf(),
            source,
        };
        let document: Value = serde_json::from_slice(input).map_err(decode_error)?;

        let statistics = match document.get(SCHEMA_VERSION_KEY) {
            Some(version) => {
                if let Some(version) = version.as_u64() {
                    if version != u64::from(ITERATION_STATISTICS_JSON_SCHEMA_V1) {
                        return Err(PlotError::UnsupportedSchema(
                            u32::try_from(version).unwrap_or(u32::MAX),
                        ));
                    }
                }
                serde_json::from_value::<IterationStatisticsJsonContractV1>(document)
                    .map_err(decode_error)?
                    .statistics
            }
            None => serde_json::from_value::<IterationStatistics>(document).map_err(decode_error)?,
        };
        statistics.validate()?;
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::{ITERATION_STATISTICS_JSON_SCHEMA_V1, IterationStatistics};
    use crate::error::PlotError;

    #[test]
    fn contract_document_carries_schema_version() {
        let stats = IterationStatistics::new(Some("run".to_owned()));
        let json = stats.to_json_contract_v1_pretty().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");

        assert_eq!(
            value["schema_version"],
            serde_json::json!(ITERATION_STATISTICS_JSON_SCHEMA_V1)
        );
        assert_eq!(value["statistics"]["title"], serde_json::json!("run"));
    }

    #[test]
    fn bare_statistics_object_is_accepted() {
        let input = br#"{
            "title": "bare",
            "epoch_numbers": [0],
            "operation_numbers": [0],
            "iteration_numbers": [0],
            "costs": [12.5]
        }"#;
        let stats = IterationStatistics::from_json_compat_slice(input).expect("bare object");

        assert_eq!(stats.title, "bare");
        assert_eq!(stats.costs, vec![12.5]);
        assert_eq!(stats.word_tokens, 1.0);
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let input = br#"{"schema_version": 7, "statistics": {
            "title": "future",
            "epoch_numbers": [],
            "operation_numbers": [],
            "iteration_numbers": [],
            "costs": []
        }}"#;
        let err = IterationStatistics::from_json_compat_slice(input).expect_err("version 7");
        assert!(matches!(err, PlotError::UnsupportedSchema(7)));
    }

    #[test]
    fn misaligned_document_fails_validation() {
        let input = br#"{
            "title": "broken",
            "epoch_numbers": [0, 0],
            "operation_numbers": [0],
            "iteration_numbers": [0],
            "costs": [1.0]
        }"#;
        let err = IterationStatistics::from_json_compat_slice(input).expect_err("misaligned");
        assert!(matches!(err, PlotError::InvalidData(_)));
    }

    #[test]
    fn contract_with_bad_inner_field_reports_that_field() {
        let input = br#"{"schema_version": 1, "statistics": {
            "title": "partial",
            "epoch_numbers": [],
            "operation_numbers": [],
            "iteration_numbers": []
        }}"#;
        let err = IterationStatistics::from_json_compat_slice(input).expect_err("missing costs");

        assert!(matches!(err, PlotError::Decode { .. }));
        assert!(err.to_string().contains("missing field `costs`"));
    }

    #[test]
    fn future_version_with_new_layout_is_unsupported_not_corrupt() {
        let input = br#"{"schema_version": 2, "runs": [{"records": []}]}"#;
        let err = IterationStatistics::from_json_compat_slice(input).expect_err("version 2");
        assert!(matches!(err, PlotError::UnsupportedSchema(2)));
    }
}
