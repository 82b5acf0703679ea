pub mod boundary;
pub mod config;
pub mod error;
pub mod projects;
pub mod runner;
pub mod ui;
pub mod version;

pub use error::{ReleaseError, Result};
