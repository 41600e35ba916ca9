use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use wodlog_core::config::DataConfig;
use wodlog_core::*;

#[derive(Parser)]
#[command(name = "wodlog")]
#[command(about = "Import Wodify workout performance exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User to import for
    #[arg(long, global = true)]
    user_id: Option<i64>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an export without writing anything
    Preview {
        /// Wodify performance export (CSV)
        file: PathBuf,

        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import an export into the library
    Confirm {
        /// Wodify performance export (CSV)
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    wodlog_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut data = config.data.clone();
    if let Some(dir) = cli.data_dir {
        data.data_dir = dir;
    }
    let user_id = cli.user_id.unwrap_or(config.import.user_id);
    tracing::debug!("Using data directory {:?} for user {}", data.data_dir, user_id);
    let importer = Importer::from_config(&config);

    match cli.command {
        Commands::Preview { file, json } => cmd_preview(&importer, &data, &file, user_id, json),
        Commands::Confirm { file, json } => cmd_confirm(&importer, &data, &file, user_id, json),
    }
}

fn open_export(file: &Path) -> Result<BufReader<File>> {
    let handle = File::open(file).map_err(|e| {
        Error::Other(format!("cannot open export {}: {}", file.display(), e))
    })?;
    Ok(BufReader::new(handle))
}

fn cmd_preview(
    importer: &Importer,
    data: &DataConfig,
    file: &Path,
    user_id: i64,
    json: bool,
) -> Result<()> {
    let library = Library::load(&data.library_path())?;
    let preview = importer.preview(&library, open_export(file)?, user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        display_preview(&preview);
    }

    Ok(())
}

fn cmd_confirm(
    importer: &Importer,
    data: &DataConfig,
    file: &Path,
    user_id: i64,
    json: bool,
) -> Result<()> {
    let input = open_export(file)?;

    // Held until the library is saved
    let _lock = LibraryLock::acquire(&data.lock_path())?;

    let path = data.library_path();
    let mut library = Library::load(&path)?;

    match importer.confirm(&mut library, input, user_id) {
        Ok(result) => {
            library.save(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\n✓ Import complete");
                display_result(&result);
            }
            Ok(())
        }
        Err(Error::ImportAborted {
            date,
            applied,
            rolled_back,
            source,
        }) => {
            // Workouts before the failure are committed, keep them
            library.save(&path)?;
            eprintln!("\n✗ Import stopped at the workout for {}", date);
            if !rolled_back {
                eprintln!("  The partial session for {} could not be removed", date);
            }
            eprintln!("  Kept everything imported before it:");
            display_result_to_stderr(&applied);
            Err(Error::ImportAborted {
                date,
                applied,
                rolled_back,
                source,
            })
        }
        Err(e) => Err(e),
    }
}

fn display_preview(preview: &ImportPreview) {
    println!("\nImport preview");
    println!("─────────────────────────────────────────");
    println!(
        "  Rows: {} total, {} valid, {} invalid",
        preview.total_rows, preview.valid_rows, preview.invalid_rows
    );
    println!("  Workout dates: {}", preview.unique_workout_dates);
    println!("  Sessions to create: {}", preview.sessions_to_create);
    println!("  Performances to create: {}", preview.performances_to_create);
    println!("  New movements: {}", preview.movements_to_create);
    for name in &preview.new_movements {
        println!("    + {}", name);
    }
    println!("  New WODs: {}", preview.wods_to_create);
    for name in &preview.new_wods {
        println!("    + {}", name);
    }

    if !preview.workout_summary.is_empty() {
        println!();
        for summary in &preview.workout_summary {
            let types: Vec<&str> = summary.component_types.iter().map(|t| t.as_str()).collect();
            println!(
                "  {}  {} movements, {} WODs{}  [{}]",
                summary.date,
                summary.movement_count,
                summary.wod_count,
                if summary.has_prs { ", PR" } else { "" },
                types.join(", ")
            );
        }
    }

    if !preview.errors.is_empty() {
        println!();
        println!("  Row errors:");
        for error in &preview.errors {
            println!("    - {}", error);
        }
    }

    println!();
}

fn display_result(result: &ImportResult) {
    for line in result_lines(result) {
        println!("{}", line);
    }
}

fn display_result_to_stderr(result: &ImportResult) {
    for line in result_lines(result) {
        eprintln!("{}", line);
    }
}

fn result_lines(result: &ImportResult) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(id) = result.import_id {
        lines.push(format!("  Import: {}", id));
    }
    lines.push(format!("  Sessions: {}", result.sessions_created));
    lines.push(format!("  Performances: {}", result.performances_created));
    lines.push(format!("  New movements: {}", result.movements_created));
    lines.push(format!("  New WODs: {}", result.wods_created));
    lines.push(format!("  PRs: {}", result.prs_flagged));
    lines
}
