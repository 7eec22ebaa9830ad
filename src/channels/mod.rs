//! Renderers that draw the message log and feed user input to the controller.

pub mod cli;

pub use cli::CliChannel;
