//! Data types produced by the aggregation pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::record::{Indicator, SchoolType};

/// Optional filters chosen in the dashboard dropdowns.
///
/// An empty string is treated the same as no selection.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub state: Option<String>,
    pub region: Option<String>,
    pub school_type: Option<SchoolType>,
}

impl Filters {
    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn with_school_type(mut self, school_type: SchoolType) -> Self {
        self.school_type = Some(school_type);
        self
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref().filter(|s| !s.is_empty())
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns `true` when no filter is active.
    pub fn is_empty(&self) -> bool {
        self.state().is_none() && self.region().is_none() && self.school_type.is_none()
    }
}

/// Headline counters for a filtered view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_schools: usize,
    pub total_fully_accessible: usize,
    pub total_no_accessibility: usize,
}

/// Internet bucket. Ordered `No` before `Yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum InternetAccess {
    No,
    Yes,
}

impl InternetAccess {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            InternetAccess::Yes
        } else {
            InternetAccess::No
        }
    }

    /// Chart label.
    pub fn label(self) -> &'static str {
        match self {
            InternetAccess::No => "Não",
            InternetAccess::Yes => "Sim",
        }
    }
}

/// Row counts per internet bucket. Buckets with no rows are absent.
pub type InternetDistribution = BTreeMap<InternetAccess, usize>;

/// Share of rows with and without one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorCoverage {
    pub indicator: Indicator,
    pub percent_true: f64,
    pub percent_false: f64,
}

/// Number of rows with one indicator present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorTotal {
    pub indicator: Indicator,
    pub count_true: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strings_are_inactive() {
        let filters = Filters::default().with_state("").with_region("");
        assert!(filters.is_empty());
        assert_eq!(filters.state(), None);
    }

    #[test]
    fn test_internet_distribution_serializes_labels() {
        let mut dist = InternetDistribution::new();
        dist.insert(InternetAccess::Yes, 3);
        dist.insert(InternetAccess::No, 1);

        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"No":1,"Yes":3}"#);
    }
}
