//! Chart descriptions handed to the rendering layer.
//!
//! These are plain serializable values; nothing here draws. Each builder
//! returns [`ChartSpec::Empty`] for an empty view so the renderer can show a
//! blank figure instead of an error.

use serde::Serialize;

use crate::aggregate::{IndicatorCoverage, IndicatorTotal, InternetAccess, InternetDistribution};

pub const COLOR_NO: &str = "#d62728";
pub const COLOR_YES: &str = "#2ca02c";

pub const PIE_TITLE: &str = "Distribuição de Acesso à Internet";
pub const BAR_TITLE: &str = "Acessibilidade das Escolas";
pub const TREEMAP_TITLE: &str = "Proporção de Indicadores de Acessibilidade";

const PIE_HOLE: f64 = 0.4;
const PIE_PULL_FIRST: f64 = 0.1;
const TREEMAP_COLOR_SCALE: &str = "Blues";

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 30,
            bottom: 0,
            left: 0,
            right: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub color: String,
    /// Fraction of the radius the slice is pulled out by.
    pub pull: f64,
}

/// Donut chart of internet access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub hole: f64,
    pub text_info: String,
    pub show_legend: bool,
    pub margin: Margin,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    pub values: Vec<f64>,
    /// Per-bar label, e.g. `"62.5%"`.
    pub text: Vec<String>,
    pub text_position: String,
}

/// Percentage bars per indicator, stacked "Não" under "Sim".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBarChart {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    pub margin: Margin,
    pub transparent_background: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapNode {
    pub label: String,
    pub value: usize,
}

/// Area-proportional view of how many schools have each indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapChart {
    pub title: String,
    pub color_scale: String,
    pub margin: Margin,
    pub nodes: Vec<TreemapNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Empty,
    Pie(PieChart),
    StackedBar(StackedBarChart),
    Treemap(TreemapChart),
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartSpec::Empty)
    }
}

/// Builds the internet pie. `total_rows` is the size of the view the
/// distribution came from.
pub fn internet_pie(dist: &InternetDistribution, total_rows: usize) -> ChartSpec {
    if total_rows == 0 {
        return ChartSpec::Empty;
    }

    let slices = dist
        .iter()
        .enumerate()
        .map(|(i, (&access, &value))| PieSlice {
            label: access.label().to_string(),
            value,
            color: presence_color(access == InternetAccess::Yes).to_string(),
            pull: if i == 0 { PIE_PULL_FIRST } else { 0.0 },
        })
        .collect();

    ChartSpec::Pie(PieChart {
        title: PIE_TITLE.to_string(),
        hole: PIE_HOLE,
        text_info: "percent+label".to_string(),
        show_legend: false,
        margin: Margin::default(),
        slices,
    })
}

pub fn coverage_bars(coverage: &[IndicatorCoverage], total_rows: usize) -> ChartSpec {
    if total_rows == 0 {
        return ChartSpec::Empty;
    }

    let categories = coverage
        .iter()
        .map(|c| c.indicator.label().to_string())
        .collect();

    let series = [false, true]
        .into_iter()
        .map(|present| {
            let values: Vec<f64> = coverage
                .iter()
                .map(|c| {
                    if present {
                        c.percent_true
                    } else {
                        c.percent_false
                    }
                })
                .collect();
            let text = values.iter().map(|v| format!("{v:.1}%")).collect();

            BarSeries {
                name: presence_label(present).to_string(),
                color: presence_color(present).to_string(),
                values,
                text,
                text_position: "outside".to_string(),
            }
        })
        .collect();

    ChartSpec::StackedBar(StackedBarChart {
        title: BAR_TITLE.to_string(),
        categories,
        series,
        margin: Margin::default(),
        transparent_background: true,
    })
}

pub fn indicator_treemap(totals: &[IndicatorTotal], total_rows: usize) -> ChartSpec {
    if total_rows == 0 {
        return ChartSpec::Empty;
    }

    ChartSpec::Treemap(TreemapChart {
        title: TREEMAP_TITLE.to_string(),
        color_scale: TREEMAP_COLOR_SCALE.to_string(),
        margin: Margin::default(),
        nodes: totals
            .iter()
            .map(|t| TreemapNode {
                label: t.indicator.label().to_string(),
                value: t.count_true,
            })
            .collect(),
    })
}

fn presence_label(present: bool) -> &'static str {
    if present { "Sim" } else { "Não" }
}

fn presence_color(present: bool) -> &'static str {
    if present { COLOR_YES } else { COLOR_NO }
}
