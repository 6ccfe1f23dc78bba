use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-transcript",
    about = "YouTube Transcript Relay - Extract spoken dialogue from YouTube videos using Gemini",
    version,
    long_about = "Runs a small HTTP relay that validates YouTube URLs and forwards them to the Gemini API, and a client that submits URLs to that relay, prints the transcript and remembers the last result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (defaults to ./config.yaml or the user config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay endpoint (POST /api/extract-transcript)
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Submit a YouTube URL to the relay and print the transcript
    Extract {
        /// YouTube video URL
        #[arg(value_name = "URL")]
        url: String,

        /// Relay base URL (overrides the config file)
        #[arg(short, long, value_name = "URL", env = "YT_TRANSCRIPT_RELAY")]
        relay: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Copy the transcript to the clipboard
        #[arg(long)]
        copy: bool,

        /// Do not remember this result
        #[arg(long)]
        no_persist: bool,
    },

    /// Print the last remembered transcript
    Last {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Forget the last remembered transcript
    Clear,

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Metadata header followed by the transcript
    Text,
    /// The transcript result as JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::parse_from([
            "yt-transcript",
            "extract",
            "https://youtu.be/abc",
            "--format",
            "json",
            "--copy",
            "--relay",
            "http://relay:5000",
        ]);

        match cli.command {
            Commands::Extract { url, relay, format, copy, no_persist } => {
                assert_eq!(url, "https://youtu.be/abc");
                assert_eq!(relay.as_deref(), Some("http://relay:5000"));
                assert_eq!(format.to_string(), "json");
                assert!(copy);
                assert!(!no_persist);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::parse_from(["yt-transcript", "serve", "--bind", "0.0.0.0:8080", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Serve { bind: Some(ref b) } if b == "0.0.0.0:8080"));
    }
}
