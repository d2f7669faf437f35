use tracing::debug;

use crate::aggregate::types::{
    IndicatorCoverage, IndicatorTotal, InternetAccess, InternetDistribution, Summary,
};
use crate::aggregate::utility::pct;
use crate::record::{INDICATOR_COUNT, Indicator, SchoolRecord};

/// Counts schools, fully accessible schools and schools with no accessibility.
pub fn summarize(rows: &[&SchoolRecord]) -> Summary {
    let mut s = Summary {
        total_schools: rows.len(),
        ..Default::default()
    };

    for r in rows {
        if r.has_all_accessibility {
            s.total_fully_accessible += 1;
        }

        if r.has_no_accessibility {
            s.total_no_accessibility += 1;
        }
    }

    s
}

/// Groups rows by internet access.
///
/// Rows without an internet flag are skipped, so the counts can sum to less
/// than [`Summary::total_schools`].
pub fn internet_distribution(rows: &[&SchoolRecord]) -> InternetDistribution {
    let mut dist = InternetDistribution::new();

    for r in rows {
        if let Some(flag) = r.has_internet {
            *dist.entry(InternetAccess::from_flag(flag)).or_default() += 1;
        }
    }

    let skipped = rows.len() - dist.values().sum::<usize>();
    if skipped > 0 {
        debug!(skipped, "Rows without internet flag left out of distribution");
    }

    dist
}

/// Per-indicator share of rows with and without the indicator, in
/// [`Indicator::ALL`] order. Both shares are 0.0 for an empty view.
pub fn indicator_coverage(rows: &[&SchoolRecord]) -> Vec<IndicatorCoverage> {
    let counts = count_true(rows);
    let total = rows.len();

    if total == 0 {
        debug!("Empty view, indicator coverage is zeroed");
    }

    Indicator::ALL
        .iter()
        .map(|&indicator| {
            let present = counts[indicator.index()];
            IndicatorCoverage {
                indicator,
                percent_true: pct(present, total),
                percent_false: pct(total - present, total),
            }
        })
        .collect()
}

/// Per-indicator count of rows with the indicator, in [`Indicator::ALL`] order.
pub fn indicator_totals(rows: &[&SchoolRecord]) -> Vec<IndicatorTotal> {
    let counts = count_true(rows);

    Indicator::ALL
        .iter()
        .map(|&indicator| IndicatorTotal {
            indicator,
            count_true: counts[indicator.index()],
        })
        .collect()
}

fn count_true(rows: &[&SchoolRecord]) -> [usize; INDICATOR_COUNT] {
    let mut counts = [0usize; INDICATOR_COUNT];

    for r in rows {
        for (count, &flag) in counts.iter_mut().zip(r.indicators.iter()) {
            if flag {
                *count += 1;
            }
        }
    }

    counts
}
