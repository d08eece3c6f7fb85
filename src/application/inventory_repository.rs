// Repository trait for inventory data access
use crate::domain::error::LoadError;
use crate::domain::table::Table;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Load the whole dataset at `path` into memory
    async fn load_table(&self, path: &Path) -> Result<Table, LoadError>;
}
