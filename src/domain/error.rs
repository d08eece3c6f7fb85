// Error taxonomy for loading and validating the inventory dataset
use std::path::PathBuf;
use thiserror::Error;

/// Raised when the bytes are not valid under an encoding.
/// The loader recovers from it by decoding with the fallback encoding.
#[derive(Debug, Error)]
#[error("file is not valid {encoding}")]
pub struct DecodeError {
    pub encoding: &'static str,
}

/// Any load failure other than a recoverable decode error.
/// Terminal for the dashboard: no stage runs without a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("file could not be decoded: {0}")]
    Decode(#[from] DecodeError),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file has no header row")]
    MissingHeader,

    #[error("row {row} has {found} fields but the header has {expected}")]
    RowTooLong {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// User-facing cause of a load failure
pub fn load_error_detail(error: &LoadError) -> String {
    format!("Error al cargar el archivo: {}", error)
}

/// One or more required columns are absent from the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No se encontraron todas las columnas necesarias: {}", format_columns(.missing))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

/// A chart series name outside the selectable price metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Métrica desconocida '{0}'. Opciones válidas: price, offer_price, reference_price")]
pub struct UnknownMetric(pub String);

fn format_columns(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}
