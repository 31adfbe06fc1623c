use crate::adapters::store::ReferenceStore;
use crate::domain::model::{AltitudeOffsetRange, PostalTemperature, ReferenceSnapshot};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    fn from_path(path: &str) -> Result<Self> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(DatasetFormat::Json),
            Some("csv") => Ok(DatasetFormat::Csv),
            _ => Err(AppError::Dataset {
                path: path.to_string(),
                message: "unsupported dataset format, expected .json or .csv".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub postal_codes: usize,
    pub altitude_ranges: usize,
}

/// Loads both reference datasets and replaces the store's tables.
///
/// Both files are parsed before anything is replaced, so a bad file leaves
/// the current tables untouched.
pub struct DatasetLoader<S: Storage> {
    storage: S,
    temperatures_path: String,
    offsets_path: String,
}

impl<S: Storage> DatasetLoader<S> {
    pub fn new(storage: S, temperatures_path: impl Into<String>, offsets_path: impl Into<String>) -> Self {
        Self {
            storage,
            temperatures_path: temperatures_path.into(),
            offsets_path: offsets_path.into(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(storage: S, config: &C) -> Self {
        Self::new(storage, config.temperatures_dataset(), config.offsets_dataset())
    }

    pub async fn load_into(&self, store: &ReferenceStore) -> Result<LoadSummary> {
        let temperatures: Vec<PostalTemperature> = self
            .read_records(&self.temperatures_path, "postal temperatures")
            .await?;
        let ranges: Vec<AltitudeOffsetRange> = self
            .read_records(&self.offsets_path, "altitude offset ranges")
            .await?;

        for range in ranges.iter().filter(|r| r.from_meters > r.to_meters) {
            tracing::warn!(
                "Altitude range [{}, {}] is inverted and will never match",
                range.from_meters,
                range.to_meters
            );
        }

        // counts after duplicate postal codes collapse, as served
        let snapshot = ReferenceSnapshot::new(temperatures, ranges);
        let summary = LoadSummary {
            postal_codes: snapshot.postal_code_count(),
            altitude_ranges: snapshot.range_count(),
        };

        store.replace(snapshot);

        tracing::info!(
            "✅ Reference data loaded: {} postal temperatures, {} altitude offset ranges",
            summary.postal_codes,
            summary.altitude_ranges
        );
        Ok(summary)
    }

    async fn read_records<T: DeserializeOwned>(&self, path: &str, dataset_name: &str) -> Result<Vec<T>> {
        tracing::info!("Loading {} dataset from {}", dataset_name, path);

        let data = self.storage.read_file(path).await.map_err(|e| AppError::Dataset {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let records = parse_records(path, &data)?;
        tracing::debug!("Parsed {} {}", records.len(), dataset_name);
        Ok(records)
    }
}

/// Parses a dataset by file extension: a JSON array or a CSV file with a header row.
pub fn parse_records<T: DeserializeOwned>(path: &str, data: &[u8]) -> Result<Vec<T>> {
    let dataset_error = |message: String| AppError::Dataset {
        path: path.to_string(),
        message,
    };

    match DatasetFormat::from_path(path)? {
        DatasetFormat::Json => serde_json::from_slice(data).map_err(|e| dataset_error(e.to_string())),
        DatasetFormat::Csv => csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data)
            .deserialize()
            .collect::<std::result::Result<Vec<T>, csv::Error>>()
            .map_err(|e| dataset_error(e.to_string())),
    }
}
