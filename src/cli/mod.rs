pub mod args;
pub mod commands;

pub use args::{CliArgs, DiscTypeArg, RipMode};
pub use commands::handle_commands;
