pub mod cli;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod vault;
