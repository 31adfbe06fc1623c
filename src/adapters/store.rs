use crate::domain::model::{AltitudeOffsetRange, PostalTemperature, ReferenceSnapshot};
use crate::domain::ports::{AltitudeOffsetTable, PostalTemperatureTable, ReferenceTables};
use std::sync::{Arc, RwLock};

/// In-memory reference tables.
///
/// Both tables live in one immutable [`ReferenceSnapshot`] behind an `Arc`.
/// Readers clone the `Arc`; a load swaps in a whole new snapshot, so the two
/// tables always change together.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    current: RwLock<Arc<ReferenceSnapshot>>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(temperatures: Vec<PostalTemperature>, ranges: Vec<AltitudeOffsetRange>) -> Self {
        let store = Self::new();
        store.replace(ReferenceSnapshot::new(temperatures, ranges));
        store
    }

    pub fn replace(&self, snapshot: ReferenceSnapshot) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(snapshot);
    }

    pub fn postal_code_count(&self) -> usize {
        self.snapshot().postal_code_count()
    }

    pub fn range_count(&self) -> usize {
        self.snapshot().range_count()
    }
}

impl ReferenceTables for ReferenceStore {
    fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl PostalTemperatureTable for ReferenceStore {
    fn base_temperature(&self, postal_prefix: &str) -> Option<f64> {
        self.snapshot().temperature(postal_prefix)
    }
}

impl AltitudeOffsetTable for ReferenceStore {
    fn all_ranges_ordered_by_start(&self) -> Vec<AltitudeOffsetRange> {
        self.snapshot().ranges().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_are_returned_by_ascending_start() {
        let store = ReferenceStore::with_data(
            Vec::new(),
            vec![
                AltitudeOffsetRange::new(400, 599, -2.0),
                AltitudeOffsetRange::new(-10000, 0, 2.0),
                AltitudeOffsetRange::new(200, 399, -1.0),
            ],
        );

        let starts: Vec<i32> = store
            .all_ranges_ordered_by_start()
            .iter()
            .map(|range| range.from_meters)
            .collect();
        assert_eq!(starts, vec![-10000, 200, 400]);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = ReferenceStore::with_data(
            vec![
                PostalTemperature::new("75", -5.0),
                PostalTemperature::new("38", -10.0),
            ],
            vec![AltitudeOffsetRange::new(0, 199, 0.0)],
        );
        assert_eq!(store.base_temperature("38"), Some(-10.0));

        store.replace(ReferenceSnapshot::new(
            vec![PostalTemperature::new("13", -5.0)],
            Vec::new(),
        ));

        assert_eq!(store.base_temperature("38"), None);
        assert_eq!(store.base_temperature("13"), Some(-5.0));
        assert_eq!(store.postal_code_count(), 1);
        assert_eq!(store.range_count(), 0);
    }

    #[test]
    fn test_snapshot_taken_before_replace_is_unchanged() {
        let store = ReferenceStore::with_data(
            vec![PostalTemperature::new("75", -5.0)],
            vec![AltitudeOffsetRange::new(0, 199, 0.0)],
        );
        let before = store.snapshot();

        store.replace(ReferenceSnapshot::new(
            vec![PostalTemperature::new("75", -7.0)],
            vec![AltitudeOffsetRange::new(0, 199, -1.0)],
        ));

        assert_eq!(before.temperature("75"), Some(-5.0));
        assert_eq!(before.ranges()[0].offset, 0.0);
        assert_eq!(store.snapshot().temperature("75"), Some(-7.0));
        assert_eq!(store.snapshot().ranges()[0].offset, -1.0);
    }

    #[test]
    fn test_postal_keys_are_trimmed() {
        let store = ReferenceStore::with_data(vec![PostalTemperature::new(" 2A ", -2.0)], Vec::new());
        assert_eq!(store.base_temperature("2A"), Some(-2.0));
    }

    #[test]
    fn test_empty_store() {
        let store = ReferenceStore::new();
        assert_eq!(store.base_temperature("75"), None);
        assert!(store.all_ranges_ordered_by_start().is_empty());
    }
}
