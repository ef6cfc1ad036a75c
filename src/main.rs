//! gdl CLI: load triple graphs and change files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use graph_delta_loader::changes::load_changes_from_path;
use graph_delta_loader::config::LoaderConfig;
use graph_delta_loader::export::{ChangeSummary, LoadExport};
use graph_delta_loader::ingest::{DbpediaLoader, FileStatus, ImdbLoader};

#[derive(Parser)]
#[command(name = "gdl", version, about = "Typed graph and change-record loader")]
struct Cli {
    /// Loader config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read sources from the remote object store.
    #[arg(long, global = true)]
    remote: bool,

    /// Object store region.
    #[arg(long, global = true)]
    region: Option<String>,

    /// Only load allow-listed types and attributes.
    #[arg(long, global = true)]
    optimize: bool,

    /// Allowed type (repeatable); implies --optimize.
    #[arg(long = "valid-type", global = true)]
    valid_types: Vec<String>,

    /// Allowed attribute (repeatable); implies --optimize.
    #[arg(long = "valid-attribute", global = true)]
    valid_attributes: Vec<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Also print every loaded vertex and edge.
    #[arg(long, global = true)]
    dump: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load DBpedia type files, then data files.
    Dbpedia {
        /// Type files (rdf:type statements).
        #[arg(long = "types", required = true)]
        type_paths: Vec<String>,

        /// Data files.
        #[arg(long = "data")]
        data_paths: Vec<String>,
    },

    /// Load simplified IMDB files.
    Imdb {
        /// Graph files.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Load and summarise a JSON change file.
    Changes {
        /// Path to the change file.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    match cli.command {
        Commands::Dbpedia {
            type_paths,
            data_paths,
        } => {
            let mut loader = DbpediaLoader::from_config(&config)?;
            let summary = loader.load(type_paths.as_slice(), data_paths.as_slice());
            report_load(LoadExport::new(summary, loader.graph(), cli.dump), cli.json)?;
        }

        Commands::Imdb { paths } => {
            let mut loader = ImdbLoader::from_config(&config)?;
            let summary = loader.load(paths.as_slice());
            report_load(LoadExport::new(summary, loader.graph(), cli.dump), cli.json)?;
        }

        Commands::Changes { file } => {
            let changes = load_changes_from_path(&file)?;
            let summary = ChangeSummary::of(&changes);
            if cli.json {
                let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
                println!("{json}");
            } else {
                println!("Changes in {} ({}):", file.display(), summary.total);
                for (kind, count) in &summary.by_type {
                    println!("  {kind}: {count}");
                }
            }
        }
    }

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn effective_config(cli: &Cli) -> Result<LoaderConfig> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::load(path)?,
        None => LoaderConfig::default(),
    };
    if cli.remote {
        config.storage.remote = true;
    }
    if let Some(region) = &cli.region {
        config.storage.region = region.clone();
    }
    if cli.optimize || !cli.valid_types.is_empty() || !cli.valid_attributes.is_empty() {
        let schema = &mut config.schema;
        schema.optimize = true;
        schema.types.extend(cli.valid_types.iter().cloned());
        schema.attributes.extend(cli.valid_attributes.iter().cloned());
    }
    Ok(config)
}

fn report_load(export: LoadExport, json: bool) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(&export).into_diagnostic()?;
        println!("{json}");
        return Ok(());
    }

    for file in &export.files.files {
        match &file.status {
            FileStatus::Loaded { report } => println!(
                "  {:?} {}: {} statements, {} admitted, {} subjects / {} objects not found",
                file.pass,
                file.path,
                report.statements,
                report.graph_size,
                report.subjects_not_found,
                report.objects_not_found
            ),
            FileStatus::Skipped => println!("  {:?} (no path): skipped", file.pass),
            FileStatus::Failed { message } => {
                println!("  {:?} {}: FAILED ({message})", file.pass, file.path)
            }
        }
    }
    println!(
        "Done. Nodes: {}, Edges: {}, Attributes: {}",
        export.graph.vertices, export.graph.edges, export.graph.attributes
    );
    println!("Number of types: {}", export.graph.types.len());

    if let Some(dump) = &export.dump {
        for vertex in &dump.vertices {
            println!("  {} [{}]", vertex.id, vertex.types.join(", "));
            for (name, value) in &vertex.attributes {
                println!("    {name} = {value}");
            }
        }
        for edge in &dump.edges {
            println!("  {} -[{}]-> {}", edge.source, edge.label, edge.target);
        }
    }
    Ok(())
}
