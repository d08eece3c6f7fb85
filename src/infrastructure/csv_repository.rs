// CSV repository implementation with encoding fallback
use crate::application::inventory_repository::InventoryRepository;
use crate::domain::error::{DecodeError, LoadError};
use crate::domain::schema::CATEGORY_COLUMN;
use crate::domain::table::Table;
use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CsvInventoryRepository {
    primary: &'static Encoding,
    fallback: &'static Encoding,
    delimiter: u8,
}

impl CsvInventoryRepository {
    /// Encodings are WHATWG labels such as `utf-8` or `latin1`.
    pub fn new(primary: &str, fallback: &str, delimiter: u8) -> Result<Self, LoadError> {
        Ok(Self {
            primary: encoding_for_label(primary)?,
            fallback: encoding_for_label(fallback)?,
            delimiter,
        })
    }

    /// Decode with the primary encoding, retrying once with the fallback.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<(Cow<'a, str>, &'static Encoding), LoadError> {
        match decode_strict(self.primary, bytes) {
            Ok(text) => Ok((text, self.primary)),
            Err(e) => {
                tracing::warn!("{}, retrying as {}", e, self.fallback.name());
                Ok((decode_strict(self.fallback, bytes)?, self.fallback))
            }
        }
    }

    /// Parse delimited text with a header row into a table.
    pub fn parse(&self, text: &str) -> Result<Table, LoadError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() || columns.iter().all(String::is_empty) {
            return Err(LoadError::MissingHeader);
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > columns.len() {
                return Err(LoadError::RowTooLong {
                    row: index + 1,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        // Categories are labels, never numbers, so keys match the source text
        Ok(Table::from_raw_with_text(columns, rows, &[CATEGORY_COLUMN]))
    }
}

#[async_trait]
impl InventoryRepository for CsvInventoryRepository {
    async fn load_table(&self, path: &Path) -> Result<Table, LoadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (text, encoding) = self.decode(&bytes)?;
        let table = self.parse(&text)?;

        tracing::info!(
            "Loaded {} rows x {} columns from {} ({})",
            table.row_count(),
            table.columns().len(),
            path.display(),
            encoding.name()
        );
        Ok(table)
    }
}

fn encoding_for_label(label: &str) -> Result<&'static Encoding, LoadError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))
}

fn decode_strict<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Result<Cow<'a, str>, DecodeError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(DecodeError {
            encoding: encoding.name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const INVENTORY_CSV: &str = "\
id,category,name,price
1,Lácteos,Leche entera,1.20
2,Panadería,Pan de molde,2.35
3,Lácteos,Queso,
";

    fn repository() -> CsvInventoryRepository {
        CsvInventoryRepository::new("utf-8", "latin1", b',').unwrap()
    }

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    /// Latin-1 bytes for text that only uses code points below U+0100
    fn latin1_bytes(text: &str) -> Vec<u8> {
        text.chars().map(|c| c as u32 as u8).collect()
    }

    #[tokio::test]
    async fn test_loads_utf8_file() {
        let file = write_temp(INVENTORY_CSV.as_bytes());
        let table = repository().load_table(file.path()).await.unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns(), &["id", "category", "name", "price"].map(String::from));
        assert_eq!(table.rows()[0][1], Value::Text("Lácteos".into()));
        assert_eq!(table.rows()[2][3], Value::Missing);
    }

    #[tokio::test]
    async fn test_latin1_file_loads_through_fallback() {
        let bytes = latin1_bytes(INVENTORY_CSV);
        assert!(std::str::from_utf8(&bytes).is_err());

        let native = repository()
            .load_table(write_temp(INVENTORY_CSV.as_bytes()).path())
            .await
            .unwrap();
        let fallback = repository().load_table(write_temp(&bytes).path()).await.unwrap();

        assert_eq!(native, fallback);
    }

    #[test]
    fn test_decode_reports_encoding_used() {
        let repo = repository();
        let (_, used) = repo.decode("añil".as_bytes()).unwrap();
        assert_eq!(used, encoding_rs::UTF_8);

        let (text, used) = repo.decode(&[b'a', 0xF1, b'o']).unwrap();
        assert_eq!(text, "año");
        assert_eq!(used, encoding_rs::WINDOWS_1252);
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let err = repository()
            .load_table(Path::new("/nonexistent/microdato.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = CsvInventoryRepository::new("utf-8", "klingon", b',').unwrap_err();
        assert!(matches!(err, LoadError::UnknownEncoding(label) if label == "klingon"));
    }

    #[test]
    fn test_strips_bom_and_honours_delimiter() {
        let repo = CsvInventoryRepository::new("utf-8", "latin1", b';').unwrap();
        let table = repo.parse("\u{feff}id;price\n1;3,5\n").unwrap();
        assert_eq!(table.columns()[0], "id");
        assert_eq!(table.rows()[0][1], Value::Text("3,5".into()));
    }

    #[test]
    fn test_numeric_looking_categories_keep_source_text() {
        let table = repository().parse("category,price\n1.10,3\n1.10,5\n2,4\n").unwrap();

        assert_eq!(table.rows()[0][0], Value::Text("1.10".into()));
        assert_eq!(
            crate::domain::stages::distinct_categories(&table).unwrap(),
            vec!["1.10", "2"]
        );
        let filtered = crate::domain::stages::filter_by_category(&table, "1.10").unwrap();
        assert_eq!(filtered.row_count(), 2);
    }

    #[test]
    fn test_rejects_rows_longer_than_header() {
        let err = repository().parse("id,price\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::RowTooLong { row: 1, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn test_empty_file_has_no_header() {
        assert!(matches!(repository().parse(""), Err(LoadError::MissingHeader)));
    }
}
