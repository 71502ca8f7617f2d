pub mod bump;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod locator;
pub mod ops;
pub mod report;
pub mod tag;
pub mod ui;
pub mod update;

pub use error::{GitUtilsError, Result};
