//! Presentation layer rendering search results for a terminal.

/// Console front-end.
pub mod console;

pub use console::{Console, ConsoleOptions};
