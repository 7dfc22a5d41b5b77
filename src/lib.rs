// Library root
// -----------
// The binary (`main.rs`) parses arguments, loads the configuration and
// hands off to `commands`.
//
// Module responsibilities:
// - `api`: HTTP interactions with YouTrack behind the `IssueService` trait.
// - `config`: settings merged from files and `YOUTRACK_*` variables.
// - `logging`: tracing subscriber set-up.
// - `terminal`: styled output, prompts and raw key input.
// - `stopwatch`: the interactive timing loop.
// - `duration`: minimum-duration policy and formatting.
// - `submit`: confirmation and work item submission.
// - `commands`: the list / show / capture flows.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod duration;
pub mod error;
pub mod git;
pub mod issue;
pub mod logging;
pub mod stopwatch;
pub mod submit;
pub mod terminal;

pub use cli::{Cli, Commands};
pub use config::Config;
