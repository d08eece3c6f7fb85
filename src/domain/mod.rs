// Domain layer - Inventory table, stage logic and dashboard models
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod kpi;
pub mod schema;
pub mod stages;
pub mod table;
