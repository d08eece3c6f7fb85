// Presenter stages as pure functions over a loaded table
use super::chart::{Bar, ChartPoint, LineChart, SeriesData};
use super::error::{SchemaError, UnknownMetric};
use super::kpi::{mean, KpiSummary};
use super::schema::{validate_schema, CATEGORY_COLUMN, PRICE_COLUMN, REQUIRED_COLUMNS};
use super::table::Table;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Columns selectable as line chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceMetric {
    Price,
    OfferPrice,
    ReferencePrice,
}

impl PriceMetric {
    pub const ALL: [PriceMetric; 3] = [
        PriceMetric::Price,
        PriceMetric::OfferPrice,
        PriceMetric::ReferencePrice,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            PriceMetric::Price => "price",
            PriceMetric::OfferPrice => "offer_price",
            PriceMetric::ReferencePrice => "reference_price",
        }
    }
}

impl FromStr for PriceMetric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        PriceMetric::ALL
            .into_iter()
            .find(|m| m.column() == name)
            .ok_or_else(|| UnknownMetric(name.to_string()))
    }
}

/// Resolve the multi-select state. `None` selects the default `[price]`;
/// an explicit empty list stays empty. Duplicates keep their first position.
pub fn resolve_metrics(selection: Option<&[String]>) -> Result<Vec<PriceMetric>, UnknownMetric> {
    let Some(names) = selection else {
        return Ok(vec![PriceMetric::Price]);
    };

    let mut metrics = Vec::new();
    for name in names {
        let metric: PriceMetric = name.parse()?;
        if !metrics.contains(&metric) {
            metrics.push(metric);
        }
    }
    Ok(metrics)
}

/// Sub-table of the required columns in required order.
pub fn column_subset(table: &Table) -> Result<Table, SchemaError> {
    validate_schema(table)?;
    Ok(table.select(&REQUIRED_COLUMNS))
}

/// One series per metric, x = row position. Cells without a number are gaps.
pub fn line_chart(table: &Table, metrics: &[PriceMetric]) -> LineChart {
    let series = metrics
        .iter()
        .filter_map(|metric| {
            let cells = table.column(metric.column())?;
            let points = cells
                .enumerate()
                .map(|(x, value)| ChartPoint::new(x, value.numeric()))
                .collect();
            Some(SeriesData::new(
                metric.column().to_string(),
                metric.column().to_string(),
                points,
            ))
        })
        .collect();

    LineChart { series }
}

/// Distinct category values in first-seen order, `None` without a category column.
pub fn distinct_categories(table: &Table) -> Option<Vec<String>> {
    let mut seen = Vec::new();
    for key in table.column(CATEGORY_COLUMN)?.filter_map(|v| v.as_key()) {
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    Some(seen)
}

/// Records whose category equals `category` exactly.
pub fn filter_by_category(table: &Table, category: &str) -> Option<Table> {
    let idx = table.column_index(CATEGORY_COLUMN)?;
    Some(table.filter_rows(|row| row[idx].as_key().as_deref() == Some(category)))
}

/// Record count per category, by count descending, ties in first-seen order.
/// Missing categories are not counted.
pub fn category_counts(table: &Table) -> Option<Vec<Bar>> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for key in table.column(CATEGORY_COLUMN)?.filter_map(|v| v.as_key()) {
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    let mut bars: Vec<Bar> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            Bar { label, count }
        })
        .collect();
    // Stable sort preserves first-seen order among equal counts
    bars.sort_by(|a, b| b.count.cmp(&a.count));
    Some(bars)
}

/// Record count and mean of the `price` cells that hold a number.
pub fn compute_kpis(table: &Table) -> KpiSummary {
    let average_price = table
        .column(PRICE_COLUMN)
        .and_then(|cells| mean(cells.filter_map(|v| v.numeric())));
    KpiSummary::new(table.row_count(), average_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Value;

    fn inventory(rows: &[(&str, &str)]) -> Table {
        let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let raw = rows
            .iter()
            .enumerate()
            .map(|(i, (category, price))| {
                REQUIRED_COLUMNS
                    .iter()
                    .map(|c| match *c {
                        "id" => i.to_string(),
                        "category" => category.to_string(),
                        "price" => price.to_string(),
                        "offer_price" => "1.5".to_string(),
                        _ => format!("{}-{}", c, i),
                    })
                    .collect()
            })
            .collect();
        Table::from_raw(columns, raw)
    }

    fn partial(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_raw(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_resolve_metrics() {
        assert_eq!(resolve_metrics(None).unwrap(), vec![PriceMetric::Price]);
        assert!(resolve_metrics(Some(&[][..])).unwrap().is_empty());

        let names = vec![
            "reference_price".to_string(),
            "price".to_string(),
            "reference_price".to_string(),
        ];
        assert_eq!(
            resolve_metrics(Some(names.as_slice())).unwrap(),
            vec![PriceMetric::ReferencePrice, PriceMetric::Price]
        );

        let bad = vec!["cost".to_string()];
        assert_eq!(resolve_metrics(Some(bad.as_slice())), Err(UnknownMetric("cost".to_string())));
    }

    #[test]
    fn test_column_subset_uses_required_order() {
        let mut columns: Vec<&str> = REQUIRED_COLUMNS.iter().rev().copied().collect();
        columns.push("extra");
        let table = partial(&columns, &[]);

        let subset = column_subset(&table).unwrap();
        assert_eq!(subset.columns(), REQUIRED_COLUMNS.map(String::from).as_slice());
    }

    #[test]
    fn test_column_subset_reports_missing() {
        let table = partial(&["id", "category"], &[&["1", "A"]]);
        let err = column_subset(&table).unwrap_err();
        assert_eq!(err.missing.len(), 14);
        assert!(!err.missing.contains(&"category".to_string()));
    }

    #[test]
    fn test_line_chart_series_follow_selection() {
        let table = inventory(&[("A", "10"), ("B", "")]);
        let chart = line_chart(&table, &[PriceMetric::OfferPrice, PriceMetric::Price]);

        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].id, "offer_price");
        assert_eq!(
            chart.series[1].points,
            vec![ChartPoint::new(0, Some(10.0)), ChartPoint::new(1, None)]
        );
    }

    #[test]
    fn test_line_chart_mixed_column_keeps_numeric_points() {
        let table = partial(&["price"], &[&["4"], &["n/a"], &["8"]]);
        let chart = line_chart(&table, &[PriceMetric::Price]);
        assert_eq!(
            chart.series[0].points,
            vec![
                ChartPoint::new(0, Some(4.0)),
                ChartPoint::new(1, None),
                ChartPoint::new(2, Some(8.0)),
            ]
        );
    }

    #[test]
    fn test_distinct_categories_first_seen() {
        let table = inventory(&[("B", "1"), ("A", "1"), ("B", "1")]);
        assert_eq!(distinct_categories(&table).unwrap(), vec!["B", "A"]);
        assert!(distinct_categories(&partial(&["id"], &[])).is_none());
    }

    #[test]
    fn test_filter_matches_independent_count() {
        let table = inventory(&[("A", "1"), ("B", "2"), ("A", "3"), ("C", "4")]);
        for category in distinct_categories(&table).unwrap() {
            let filtered = filter_by_category(&table, &category).unwrap();
            let expected = table
                .column("category")
                .unwrap()
                .filter(|v| **v == Value::Text(category.clone()))
                .count();
            assert_eq!(filtered.row_count(), expected);
        }
        assert_eq!(filter_by_category(&table, "Z").unwrap().row_count(), 0);
    }

    #[test]
    fn test_category_counts() {
        let table = inventory(&[("A", "1"), ("B", "1"), ("C", "1"), ("B", "1"), ("A", "1"), ("B", "1")]);
        let bars = category_counts(&table).unwrap();
        assert_eq!(
            bars,
            vec![
                Bar { label: "B".into(), count: 3 },
                Bar { label: "A".into(), count: 2 },
                Bar { label: "C".into(), count: 1 },
            ]
        );
        assert_eq!(bars.iter().map(|b| b.count).sum::<usize>(), table.row_count());
    }

    #[test]
    fn test_category_counts_skip_missing() {
        let table = partial(&["category"], &[&["A"], &[""], &["A"]]);
        assert_eq!(
            category_counts(&table).unwrap(),
            vec![Bar { label: "A".into(), count: 2 }]
        );
    }

    #[test]
    fn test_compute_kpis() {
        let table = inventory(&[("A", "10.00"), ("B", "20.00")]);
        let kpis = compute_kpis(&table);
        assert_eq!(kpis.total_records, 2);
        assert_eq!(kpis.formatted_average_price(), "$15.00");
    }

    #[test]
    fn test_compute_kpis_ignores_missing_prices() {
        let table = partial(&["price"], &[&["4"], &[""], &["8"]]);
        assert_eq!(compute_kpis(&table), KpiSummary::new(3, Some(6.0)));

        let mixed = partial(&["price"], &[&["4"], &["n/a"], &["8"]]);
        assert_eq!(compute_kpis(&mixed).formatted_average_price(), "$6.00");

        let text_prices = partial(&["price"], &[&["n/a"], &["x"]]);
        assert_eq!(compute_kpis(&text_prices).average_price, None);
        assert_eq!(compute_kpis(&partial(&["id"], &[&["1"]])).average_price, None);
    }
}
