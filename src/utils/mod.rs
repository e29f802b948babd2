pub mod error;
pub mod filesystem;
pub mod logging;
pub mod progress;
pub mod tool_runner;

pub use error::{Error, Result};
pub use filesystem::{create_work_dir, find_rip_outputs, format_file_size, move_file, unique_path};
pub use logging::setup_logging;
pub use progress::RipProgress;
pub use tool_runner::{ToolOutput, ToolRunner};
