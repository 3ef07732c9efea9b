//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Live gemtext and Markdown previewer
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: gempeek.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = crate::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Preview a file in the browser, re-rendering on every save
    #[command(visible_alias = "s")]
    Serve {
        /// File to preview (.gmi/.gemini as gemtext, anything else as Markdown)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Open the preview in the default browser
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        open: Option<bool>,

        /// Quiet interval in milliseconds before a change triggers a render
        #[arg(short, long, value_name = "MS")]
        debounce: Option<u64>,

        /// Enable verbose output for debugging
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// Render a file once and print the HTML fragment to stdout
    #[command(visible_alias = "r")]
    Render {
        /// File to render
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Earlier version of the file; changed gemtext blocks are flagged
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        previous: Option<PathBuf>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_render(&self) -> bool {
        matches!(self.command, Commands::Render { .. })
    }

    /// The source file named by the subcommand.
    pub fn file(&self) -> &std::path::Path {
        match &self.command {
            Commands::Serve { file, .. } | Commands::Render { file, .. } => file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from(["gempeek", "serve", "notes.gmi", "-p", "8000", "--open=false"]);
        let Commands::Serve {
            file, port, open, ..
        } = &cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(file, &PathBuf::from("notes.gmi"));
        assert_eq!(*port, Some(8000));
        assert_eq!(*open, Some(false));
        assert!(cli.is_serve());
    }

    #[test]
    fn test_open_flag_without_value() {
        let cli = Cli::parse_from(["gempeek", "s", "notes.gmi", "--open"]);
        let Commands::Serve { open, .. } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(open, Some(true));
    }

    #[test]
    fn test_render_alias_and_previous() {
        let cli = Cli::parse_from(["gempeek", "r", "new.gmi", "--previous", "old.gmi"]);
        assert!(cli.is_render());
        assert_eq!(cli.file(), std::path::Path::new("new.gmi"));
        let Commands::Render { previous, .. } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(previous, Some(PathBuf::from("old.gmi")));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["gempeek", "serve", "a.md", "-C", "other.toml"]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }
}
