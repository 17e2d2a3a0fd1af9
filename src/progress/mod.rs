//! Progress reporting for verification runs

mod console;
mod handler;
mod logging;

pub use console::ConsoleHandler;
pub use handler::{NoOpHandler, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
