//! CLI module - argument parsing, startup and interactive prompts

mod args;
mod prompts;
mod setup;

pub use args::{Cli, Commands};
pub use prompts::*;
pub use setup::*;
