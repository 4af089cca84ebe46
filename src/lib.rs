pub mod config;
pub mod error;
pub mod fetch;
pub mod listings;
pub mod metrics;
pub mod output;
pub mod parser;
pub mod registry;
pub mod scoring;
pub mod value;
