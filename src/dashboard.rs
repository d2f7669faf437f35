//! Per-interaction rendering of the dashboard.
//!
//! A [`Dashboard`] wraps the loaded [`Dataset`]. Each call to
//! [`Dashboard::render`] filters the snapshot and produces a fresh
//! [`DashboardView`]; nothing is cached between calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::utility::format_thousands;
use crate::aggregate::{
    Filters, Summary, indicator_coverage, indicator_totals, internet_distribution, summarize,
};
use crate::charts::{ChartSpec, coverage_bars, indicator_treemap, internet_pie};
use crate::dataset::{Dataset, FilterOptions};
use crate::record::SchoolRecord;

/// Counter texts shown on the three summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub total_schools: String,
    pub fully_accessible: String,
    pub no_accessibility: String,
}

impl From<Summary> for Counters {
    fn from(s: Summary) -> Self {
        Counters {
            total_schools: format_thousands(s.total_schools),
            fully_accessible: format_thousands(s.total_fully_accessible),
            no_accessibility: format_thousands(s.total_no_accessibility),
        }
    }
}

/// Everything the UI needs for one filter combination.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub generated_at: DateTime<Utc>,
    pub filters: Filters,
    pub summary: Summary,
    pub counters: Counters,
    pub internet_chart: ChartSpec,
    pub coverage_chart: ChartSpec,
    pub treemap_chart: ChartSpec,
}

/// One row of the per-indicator table, used for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub indicator: String,
    pub count_true: usize,
    pub percent_true: f64,
    pub percent_false: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    dataset: Dataset,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        if dataset.is_empty() {
            warn!("Dashboard built over an empty dataset, all views will be empty");
        }
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> FilterOptions {
        self.dataset.options()
    }

    #[tracing::instrument(skip(self), fields(rows = tracing::field::Empty))]
    pub fn render(&self, filters: &Filters) -> DashboardView {
        let rows = self.view(filters);
        tracing::Span::current().record("rows", rows.len());

        let summary = summarize(&rows);
        let distribution = internet_distribution(&rows);
        let coverage = indicator_coverage(&rows);
        let totals = indicator_totals(&rows);

        DashboardView {
            generated_at: Utc::now(),
            filters: filters.clone(),
            summary,
            counters: summary.into(),
            internet_chart: internet_pie(&distribution, rows.len()),
            coverage_chart: coverage_bars(&coverage, rows.len()),
            treemap_chart: indicator_treemap(&totals, rows.len()),
        }
    }

    /// Joins coverage and totals into one table, in indicator order.
    pub fn indicator_table(&self, filters: &Filters) -> Vec<IndicatorRow> {
        let rows = self.view(filters);
        let coverage = indicator_coverage(&rows);
        let totals = indicator_totals(&rows);

        coverage
            .iter()
            .zip(totals.iter())
            .map(|(c, t)| IndicatorRow {
                indicator: c.indicator.label().to_string(),
                count_true: t.count_true,
                percent_true: c.percent_true,
                percent_false: c.percent_false,
            })
            .collect()
    }

    fn view(&self, filters: &Filters) -> Vec<&SchoolRecord> {
        let rows = self.dataset.view(filters);

        info!(
            state = filters.state().unwrap_or("-"),
            region = filters.region().unwrap_or("-"),
            school_type = filters.school_type.map(|t| t.label()).unwrap_or("-"),
            matched = rows.len(),
            "Filters applied"
        );

        if rows.is_empty() && !self.dataset.is_empty() {
            warn!("No schools match the selected filters");
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Indicator, RawSchoolRow, SchoolType};

    #[test]
    fn test_render_counts_and_charts() {
        let dashboard = Dashboard::new(sample());
        let view = dashboard.render(&Filters::default());

        assert_eq!(view.summary.total_schools, 3);
        assert_eq!(view.counters.total_schools, "3");
        assert!(matches!(view.internet_chart, ChartSpec::Pie(_)));
        assert!(matches!(view.coverage_chart, ChartSpec::StackedBar(_)));
        assert!(matches!(view.treemap_chart, ChartSpec::Treemap(_)));
    }

    #[test]
    fn test_render_no_match_is_empty_not_error() {
        let dashboard = Dashboard::new(sample());
        let view = dashboard.render(&Filters::default().with_state("ZZ"));

        assert_eq!(view.summary, Summary::default());
        assert_eq!(view.counters.total_schools, "0");
        assert!(view.internet_chart.is_empty());
        assert!(view.coverage_chart.is_empty());
        assert!(view.treemap_chart.is_empty());
    }

    #[test]
    fn test_render_by_school_type() {
        let dashboard = Dashboard::new(sample());
        let view = dashboard.render(&Filters::default().with_school_type(SchoolType::Private));

        assert_eq!(view.summary.total_schools, 1);
        assert_eq!(view.summary.total_fully_accessible, 1);
    }

    #[test]
    fn test_counters_use_thousands_separator() {
        let counters = Counters::from(Summary {
            total_schools: 181_339,
            total_fully_accessible: 1_024,
            total_no_accessibility: 12,
        });

        assert_eq!(counters.total_schools, "181,339");
        assert_eq!(counters.fully_accessible, "1,024");
        assert_eq!(counters.no_accessibility, "12");
    }

    #[test]
    fn test_indicator_table() {
        let dashboard = Dashboard::new(sample());
        let table = dashboard.indicator_table(&Filters::default());

        assert_eq!(table.len(), 8);
        assert_eq!(table[0].indicator, "Corrimão");
        assert_eq!(table[0].count_true, 1);
        let rampas = &table[Indicator::Rampas.index()];
        assert_eq!(rampas.count_true, 2);
    }

    // Helper functions for tests
    fn sample() -> Dataset {
        let mut full = raw("SP", "Sudeste", 4, Some(1));
        for indicator in Indicator::ALL {
            full.set_indicator(indicator, Some(1));
        }
        let mut ramp_only = raw("DF", "Centro-Oeste", 2, Some(0));
        ramp_only.rampas = Some(1);
        let bare = raw("DF", "Centro-Oeste", 2, None);

        Dataset::from_rows(&[full, ramp_only, bare])
    }

    fn raw(state: &str, region: &str, dependency: i64, internet: Option<i64>) -> RawSchoolRow {
        RawSchoolRow {
            state: Some(state.to_string()),
            region: Some(region.to_string()),
            dependency: Some(dependency),
            internet,
            operational_status: Some(1),
            ..Default::default()
        }
    }
}
