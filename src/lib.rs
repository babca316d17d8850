pub mod classifier;
pub mod config;
pub mod elapsed;
pub mod filter;
pub mod model;
pub mod report;
pub mod source;
pub mod watch;
