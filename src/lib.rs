pub mod chain;
pub mod driver;
pub mod error;
pub mod identity;
pub mod probe;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use error::HarnessError;
pub use report::generate_report;
pub use runner::Orchestrator;
