use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treemerge::{syntax, ConfigLoader, Pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "treemerge",
    version,
    about = "Flatten a project directory into a single document",
    long_about = "Flatten a project directory into a single document.\n\n\
    Files whose names end with an allowed extension are concatenated in \
    depth-first order, each wrapped in a fenced block with a file header. \
    Lines holding only an inline comment are dropped.\n\n\
    Settings are read from a configuration directory holding \
    project_config.json, skip_folders.json, skip_files.json and \
    allowed_extensions.json.\n\n\
    USAGE EXAMPLES:\n  \
      # Use ./config\n  \
      treemerge\n\n  \
      # Merge another project with the same lists\n  \
      treemerge --project ../other --language rust\n\n  \
      # Show what would be merged\n  \
      treemerge --dry-run -v"
)]
struct Cli {
    /// Directory holding the JSON configuration files
    #[arg(short, long, default_value = "config", value_name = "PATH")]
    config_dir: PathBuf,

    /// Override the root path the project directory is resolved against
    #[arg(long, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Override the project directory
    #[arg(short, long, value_name = "PATH")]
    project: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Override the project language used for comment syntax
    #[arg(short, long, value_name = "LANG")]
    language: Option<String>,

    /// Visit directory entries in file-name order
    #[arg(long)]
    sort: bool,

    /// Dry run (don't write the output file)
    #[arg(long)]
    dry_run: bool,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    stats_json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let mut builder = ConfigLoader::new(&cli.config_dir)
        .builder()
        .with_context(|| format!("Failed to load configuration from {}", cli.config_dir.display()))?;

    if let Some(root) = cli.root {
        builder = builder.root_path(root);
    }

    if let Some(project) = cli.project {
        builder = builder.project_dir(project);
    }

    if let Some(out) = cli.out {
        builder = builder.output_dir(out);
    }

    if let Some(language) = cli.language {
        builder = builder.syntax(syntax::lookup(&language));
    }

    if cli.sort {
        builder = builder.sort_entries(true);
    }

    let config = builder
        .dry_run(cli.dry_run)
        .build()
        .context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Merge failed")?;

    if cli.stats_json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?;
        println!("{json}");
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("treemerge=info"),
        1 => EnvFilter::new("treemerge=debug"),
        _ => EnvFilter::new("treemerge=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
