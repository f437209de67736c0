//! Command-line interface.
//!
//! All CLI logic lives here rather than in `main.rs`, so it can be tested.
//! `main` only parses arguments, installs logging and calls [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{
    Args, Command, CommonArgs, ExactArgs, GraspArgs, GreedyArgs, TwoOptArgs, DEFAULT_MATRIX_PATH,
    LONG_VERSION,
};
pub use commands::{execute, run_cli};
pub use output::{
    render_json, render_text, CommandReport, ExactReport, GreedyReport, TwoOptReport,
};
