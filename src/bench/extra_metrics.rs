use std::collections::BTreeMap;

use super::record::STANDARD_UNITS;

/// Non-standard metrics reported through `b.ReportMetric`, keyed by their escaped unit.
pub type ExtraMetrics = BTreeMap<String, f64>;

/// Extract the `<value> <unit>` columns of a benchmark line that are not one of the
/// four standard measurements.
///
/// The line is split on tabs and the first three columns (name, iterations and ns/op)
/// are skipped. Columns that are not a parseable `<value> <unit>` pair are ignored, and
/// `/` in units is replaced by `_` so the key can be used as a field name. Returns
/// `None` rather than an empty map when nothing was found.
pub fn parse_extra_metrics(line: &str) -> Option<ExtraMetrics> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < 3 {
        return None;
    }

    let mut metrics = ExtraMetrics::new();
    for column in &columns[3..] {
        let parts: Vec<&str> = column.trim().split(' ').collect();
        if parts.len() < 2 {
            continue;
        }
        let Ok(value) = parts[0].trim().parse::<f64>() else {
            continue;
        };
        let unit = parts[1].trim();
        if STANDARD_UNITS.contains(&unit) {
            continue;
        }
        metrics.insert(unit.replace('/', "_"), value);
    }

    (!metrics.is_empty()).then_some(metrics)
}
