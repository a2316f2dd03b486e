use std::path::PathBuf;

use clap::Parser;

use crate::jump::{DEFAULT_EDITORS, JumpRequest};
use crate::shared::config::Config;

const DEFAULT_TMUX: &str = "tmux";

/// Jump to a position in a file that is open in vim inside a tmux window.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "synctex-jump", version)]
pub struct Cli {
    /// Append logging information to the given file
    #[arg(long, value_name = "LOGFILE")]
    pub log: Option<PathBuf>,

    /// Path to the tmux executable [default: tmux]
    #[arg(long, value_name = "PATH")]
    pub tmux: Option<PathBuf>,

    /// Also treat NAME as a vim-compatible editor (repeatable)
    #[arg(long = "editor", value_name = "NAME")]
    pub editors: Vec<String>,

    /// Line to jump to
    #[arg(value_name = "LINE_NR", value_parser = clap::value_parser!(u32).range(1..))]
    pub line_number: u32,

    /// File that is open in the editor, relative to the current directory
    #[arg(value_name = "TEXFILE")]
    pub file: PathBuf,
}

/// Resolved settings for one run: CLI flags, then config file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub request: JumpRequest,
    pub log: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(cli: Cli, config: Config) -> Self {
        let tmux = cli
            .tmux
            .or(config.tmux)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TMUX));

        let mut editors: Vec<String> = DEFAULT_EDITORS.iter().map(|s| s.to_string()).collect();
        for editor in config.editors.into_iter().chain(cli.editors) {
            if !editors.contains(&editor) {
                editors.push(editor);
            }
        }

        Self {
            request: JumpRequest {
                line_number: cli.line_number,
                file: cli.file,
                tmux,
                editors,
            },
            log: cli.log.or(config.log),
        }
    }
}
