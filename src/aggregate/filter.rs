use crate::aggregate::types::Filters;
use crate::record::SchoolRecord;

/// Keeps the records that match every active filter exactly.
///
/// With no active filter every record is returned, in input order.
pub fn filter<'a>(records: &'a [SchoolRecord], filters: &Filters) -> Vec<&'a SchoolRecord> {
    let state = filters.state();
    let region = filters.region();
    let school_type = filters.school_type;

    records
        .iter()
        .filter(|r| state.is_none_or(|s| r.state == s))
        .filter(|r| region.is_none_or(|s| r.region == s))
        .filter(|r| school_type.is_none_or(|t| r.school_type == t))
        .collect()
}
