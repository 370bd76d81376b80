//! Process lifecycle management.

mod output_half;
mod process_runner;
mod terminate;

pub use output_half::OutputHalf;
pub use process_runner::ProcessRunner;
