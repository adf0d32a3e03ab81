pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod host;
pub mod preflight;
pub mod process;
pub mod ui;
pub mod version;
pub mod workflow;

pub use error::{ReleaseError, Result};
