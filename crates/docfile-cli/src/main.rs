//! docfile CLI: template-driven storage paths for document archives
//!
//! Commands: preview, docs, filename, relocate, migrate
//!
//! Every command prints JSON on stdout. Logs go to stderr, filtered by
//! `DOCFILE_LOG` (default `warn`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use docfile_core::{Catalog, DocfileError, Settings};
use docfile_legacy::{migrate_storage_paths, Direction};
use docfile_storage::{relocate, FilenameGenerator, LocalFs};
use docfile_template::{Templater, ValidationResult};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DOCFILE_LOG";

#[derive(Parser)]
#[command(name = "docfile")]
#[command(version)]
#[command(about = "Template-driven storage paths for document archives")]
struct Cli {
    /// Settings file (TOML); missing means defaults
    #[arg(long, global = true, default_value = "docfile.toml")]
    config: PathBuf,

    /// Catalog of documents and storage paths (YAML)
    #[arg(long, global = true, default_value = "catalog.yaml")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Validate a template and preview its output
    Preview {
        /// Template to check
        #[arg(long)]
        template: String,
        /// Render against this document instead of placeholder values
        #[arg(long)]
        doc_id: Option<i64>,
        /// Drop newlines from the output
        #[arg(long)]
        remove_new_lines: bool,
    },
    /// List documents available for previews
    Docs,
    /// Print the filename a document would be stored under
    Filename {
        #[arg(long)]
        doc_id: i64,
        /// Name of the archived PDF copy instead of the original
        #[arg(long)]
        archive: bool,
        /// Avoid names of files that already exist
        #[arg(long)]
        unique: bool,
        /// Leave out the `.gpg` suffix of encrypted documents
        #[arg(long)]
        no_gpg: bool,
    },
    /// Move a document's files to their generated names
    Relocate {
        #[arg(long)]
        doc_id: i64,
    },
    /// Convert storage paths between the legacy and current syntax
    Migrate {
        /// `upgrade` or `downgrade`
        direction: Direction,
    },
}

#[derive(Serialize)]
struct PreviewResponse<'a> {
    #[serde(flatten)]
    validation: ValidationResult,
    input: &'a str,
    doc_id: Option<i64>,
    result: &'static str,
}

#[derive(Serialize)]
struct DocsResponse {
    #[serde(rename = "DocsForPreview")]
    docs_for_preview: Vec<(i64, String)>,
}

#[derive(Serialize)]
struct FilenameResponse {
    doc_id: i64,
    filename: String,
}

#[derive(Serialize)]
struct MigrateResponse {
    direction: String,
    changed: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    tracing::debug!(config = %cli.config.display(), catalog = %cli.catalog.display(), "settings loaded");

    match cli.command {
        Commands::Preview {
            template,
            doc_id,
            remove_new_lines,
        } => cmd_preview(&cli.catalog, &settings, &template, doc_id, remove_new_lines),
        Commands::Docs => cmd_docs(&cli.catalog),
        Commands::Filename {
            doc_id,
            archive,
            unique,
            no_gpg,
        } => cmd_filename(&cli.catalog, &settings, doc_id, archive, unique, !no_gpg),
        Commands::Relocate { doc_id } => cmd_relocate(&cli.catalog, &settings, doc_id),
        Commands::Migrate { direction } => cmd_migrate(&cli.catalog, direction),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("failed to load catalog {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_preview(
    catalog_path: &Path,
    settings: &Settings,
    template: &str,
    doc_id: Option<i64>,
    remove_new_lines: bool,
) -> Result<()> {
    let catalog = match doc_id {
        Some(_) => load_catalog(catalog_path)?,
        None => Catalog::default(),
    };
    let doc = match doc_id {
        Some(id) => match catalog.document(id) {
            Ok(doc) => Some(doc),
            Err(DocfileError::DocumentNotFound(id)) => {
                anyhow::bail!("Document (id={id}) for preview does not exists!")
            }
            Err(err) => return Err(err.into()),
        },
        None => None,
    };

    let validation = Templater::from_settings(settings).validate(template, false, remove_new_lines, doc);
    print_json(&PreviewResponse {
        validation,
        input: template,
        doc_id,
        result: "OK",
    })
}

fn cmd_docs(catalog_path: &Path) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let docs_for_preview = catalog
        .documents
        .iter()
        .map(|doc| (doc.id, doc.title.clone()))
        .collect();
    print_json(&DocsResponse { docs_for_preview })
}

fn cmd_filename(
    catalog_path: &Path,
    settings: &Settings,
    doc_id: i64,
    archive: bool,
    unique: bool,
    append_gpg: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let doc = catalog.document(doc_id)?;
    let generator = FilenameGenerator::new(settings);

    let filename = if unique {
        generator.generate_unique_filename(doc, archive, &LocalFs)
    } else {
        generator.generate_filename(doc, 0, append_gpg, archive)
    };
    print_json(&FilenameResponse { doc_id, filename })
}

fn cmd_relocate(catalog_path: &Path, settings: &Settings, doc_id: i64) -> Result<()> {
    let mut catalog = load_catalog(catalog_path)?;
    let doc = catalog.document_mut(doc_id)?;
    let relocation = relocate(doc, settings, &LocalFs)
        .with_context(|| format!("failed to relocate document {doc_id}"))?;
    if relocation.moved {
        catalog
            .save(catalog_path)
            .with_context(|| format!("failed to write catalog {}", catalog_path.display()))?;
    }
    print_json(&relocation)
}

fn cmd_migrate(catalog_path: &Path, direction: Direction) -> Result<()> {
    let mut catalog = load_catalog(catalog_path)?;
    let changed = migrate_storage_paths(&mut catalog.storage_paths, direction);
    if changed > 0 {
        catalog.resolve_storage_paths()?;
        catalog
            .save(catalog_path)
            .with_context(|| format!("failed to write catalog {}", catalog_path.display()))?;
    }
    print_json(&MigrateResponse {
        direction: direction.to_string(),
        changed,
    })
}
