//! Immutable snapshot of the loaded school records.

use serde::Serialize;
use std::sync::Arc;

use crate::aggregate::{Filters, filter};
use crate::record::{RawSchoolRow, SchoolRecord, SchoolType};

/// The full record set, loaded once and never mutated.
///
/// Cloning is cheap; reloading means building a new `Dataset`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Arc<[SchoolRecord]>,
}

/// Dropdown choices, in order of first appearance.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub regions: Vec<String>,
    pub school_types: Vec<SchoolType>,
}

impl Dataset {
    pub fn new(records: Vec<SchoolRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Builds a snapshot from raw rows, keeping only operating schools.
    pub fn from_rows(rows: &[RawSchoolRow]) -> Self {
        Self::new(
            rows.iter()
                .filter(|r| r.is_operational())
                .map(SchoolRecord::from_raw)
                .collect(),
        )
    }

    pub fn records(&self) -> &[SchoolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching `filters`.
    pub fn view(&self, filters: &Filters) -> Vec<&SchoolRecord> {
        filter(&self.records, filters)
    }

    pub fn options(&self) -> FilterOptions {
        let mut opts = FilterOptions::default();

        for r in self.records.iter() {
            if !r.state.is_empty() && !opts.states.contains(&r.state) {
                opts.states.push(r.state.clone());
            }
            if !r.region.is_empty() && !opts.regions.contains(&r.region) {
                opts.regions.push(r.region.clone());
            }
            if !opts.school_types.contains(&r.school_type) {
                opts.school_types.push(r.school_type);
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_drops_non_operational() {
        let rows = vec![
            raw("DF", "Centro-Oeste", 1, Some(1)),
            raw("DF", "Centro-Oeste", 1, Some(2)),
            raw("DF", "Centro-Oeste", 1, None),
        ];
        let dataset = Dataset::from_rows(&rows);

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].operational_status, 1);
    }

    #[test]
    fn test_options_first_appearance_order() {
        let rows = vec![
            raw("SP", "Sudeste", 4, Some(1)),
            raw("DF", "Centro-Oeste", 2, Some(1)),
            raw("SP", "Sudeste", 2, Some(1)),
            raw("", "", 2, Some(1)),
        ];
        let opts = Dataset::from_rows(&rows).options();

        assert_eq!(opts.states, vec!["SP", "DF"]);
        assert_eq!(opts.regions, vec!["Sudeste", "Centro-Oeste"]);
        assert_eq!(
            opts.school_types,
            vec![SchoolType::Private, SchoolType::Public]
        );
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();

        assert!(dataset.is_empty());
        assert!(dataset.view(&Filters::default()).is_empty());
        assert_eq!(dataset.options(), FilterOptions::default());
    }

    // Helper functions for tests
    fn raw(state: &str, region: &str, dependency: i64, status: Option<i64>) -> RawSchoolRow {
        RawSchoolRow {
            state: Some(state.to_string()),
            region: Some(region.to_string()),
            dependency: Some(dependency),
            operational_status: status,
            ..Default::default()
        }
    }
}
