pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod reading;
pub mod report;
pub mod source;
