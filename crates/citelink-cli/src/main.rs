use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod input;
mod output;

use input::{DocumentInput, load_config};
use output::ColorMode;

/// Structured-content and citation-link extraction for scientific documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a classified document (JSON blocks + references) to JATS XML
    Convert {
        /// Path to the JSON document produced by the extraction pipeline
        input: PathBuf,

        /// Write the XML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a TOML config with matching thresholds
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit only the <body> fragment, without <article> and <back>
        #[arg(long)]
        body_only: bool,
    },

    /// Show the detected citation style and resolved references
    Inspect {
        /// Path to the JSON document produced by the extraction pipeline
        input: PathBuf,

        /// Path to a TOML config with matching thresholds
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            input,
            output,
            config,
            body_only,
        } => convert(input, output, config, body_only),
        Command::Inspect {
            input,
            config,
            no_color,
        } => inspect(input, config, no_color),
    }
}

fn convert(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    body_only: bool,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let (blocks, bibliography) = DocumentInput::from_path(&input)?.into_parts();

    let mut tree = citelink_content::build_tree(&blocks);
    citelink_content::link_citations(&mut tree, &bibliography, &config)?;

    let xml = if body_only {
        citelink_jats::body_to_string(&tree, &bibliography)?
    } else {
        citelink_jats::article_to_string(&tree, &bibliography)?
    };

    match output {
        Some(path) => std::fs::write(&path, xml)?,
        None => println!("{xml}"),
    }
    Ok(())
}

fn inspect(input: PathBuf, config: Option<PathBuf>, no_color: bool) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let (blocks, bibliography) = DocumentInput::from_path(&input)?.into_parts();

    let mut tree = citelink_content::build_tree(&blocks);
    let outcome = citelink_content::link_citations(&mut tree, &bibliography, &config)?;

    let color = ColorMode(!no_color);
    let mut stdout = std::io::stdout().lock();
    output::print_summary(&mut stdout, &tree, &bibliography, &outcome, color)?;
    output::print_references(&mut stdout, &tree, &bibliography, color)?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
