// Required column set for the inventory dataset
use super::error::SchemaError;
use super::table::Table;

pub const REQUIRED_COLUMNS: [&str; 16] = [
    "id",
    "url",
    "supermarket",
    "zip_code",
    "category",
    "name",
    "description",
    "trademark",
    "trademark_propietary_flag",
    "price",
    "reference_price",
    "reference_unit",
    "offer_flag",
    "offer_price",
    "offer_type",
    "insert_date",
];

pub const CATEGORY_COLUMN: &str = "category";
pub const PRICE_COLUMN: &str = "price";

/// Required columns absent from the table, in required order.
pub fn missing_columns(table: &Table) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect()
}

pub fn validate_schema(table: &Table) -> Result<(), SchemaError> {
    let missing = missing_columns(table);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}
