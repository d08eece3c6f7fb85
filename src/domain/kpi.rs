// Management indicators
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_records: usize,
    pub average_price: Option<f64>,
}

impl KpiSummary {
    pub fn new(total_records: usize, average_price: Option<f64>) -> Self {
        Self {
            total_records,
            average_price,
        }
    }

    /// Average price as a two-decimal currency string, `N/A` when undefined.
    pub fn formatted_average_price(&self) -> String {
        match self.average_price {
            Some(mean) => format!("${:.2}", mean),
            None => "N/A".to_string(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total de Registros: {}", self.total_records),
            format!("Promedio de Precios: {}", self.formatted_average_price()),
        ]
    }
}

/// Arithmetic mean of the defined values; `None` when there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
