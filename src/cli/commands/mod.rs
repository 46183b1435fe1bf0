//! Command implementations, one module per subcommand.

pub mod completions;
pub mod export;
pub mod report;
