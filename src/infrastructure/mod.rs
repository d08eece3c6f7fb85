// Infrastructure layer - External dependencies and adapters
pub mod chunked_stream;
pub mod config;
pub mod csv_repository;
pub mod http_response;
