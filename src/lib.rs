pub mod config;
pub mod datasets;
pub mod error;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod snapshot;
