use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tos")]
#[command(about = "Summarize Terms of Service documents with an LLM", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one document and print the report as JSON
    #[command(group(ArgGroup::new("input").required(true).args(["text", "url", "file"])))]
    Analyze {
        /// Document text
        #[arg(long)]
        text: Option<String>,

        /// URL to fetch the document from
        #[arg(long)]
        url: Option<String>,

        /// Local file (.pdf, .docx, or any text file)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Show the config file location and resolved settings
    Config,
}
