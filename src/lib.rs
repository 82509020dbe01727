pub mod api;
pub mod chart;
pub mod config;
pub mod query;
pub mod server;
pub mod storage;
