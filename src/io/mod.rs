pub mod output;
pub mod progress;

pub use output::{create_writer, OutputWriter};
pub use progress::ProgressReporter;
