//! # inkwell CLI
//!
//! Command-line interface for the inkwell publishing core.

mod commands;
mod site;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inkwell")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "inkwell.yml", env = "INKWELL_CONFIG")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles, most recent first
    List {
        /// Include drafts and undated articles
        #[arg(long)]
        all: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the rendered HTML of one article
    Show {
        /// Article permalink (e.g. /2012/10/first-blog-post.html)
        permalink: String,
    },

    /// Write the Atom feed of published articles
    Feed {
        /// Output file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render every published article and the feed into the output directory
    Build,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::List { all, json } => commands::list_articles(&cli.config, all, json),
        Commands::Show { permalink } => commands::show_article(&cli.config, &permalink),
        Commands::Feed { output } => commands::write_feed(&cli.config, output.as_deref()),
        Commands::Build => commands::build_site(&cli.config),
    }
}
