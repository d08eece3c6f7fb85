// Application layer - Use cases over the loaded inventory
pub mod dashboard_service;
pub mod inventory_repository;
pub mod streaming_service;
pub mod table_cache;
