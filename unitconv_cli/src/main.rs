use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use unitconv_core::*;

/// Notice shown for unknown categories or units
const INVALID_CONVERSION: &str = "Invalid unit conversion. Please check your inputs.";

#[derive(Parser)]
#[command(name = "unitconv")]
#[command(about = "Unit conversion calculator with session history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a value between two units of a category
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Source unit (e.g. "Metre")
        from: String,

        /// Target unit (e.g. "Foot")
        to: String,

        /// Category the units belong to
        #[arg(long, short = 'c')]
        category: String,

        /// Additional target units for a multi-unit conversion
        #[arg(long = "also")]
        also: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories, or the units of one category
    List {
        category: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a short description of a unit
    Info { unit: String },

    /// Interactive session with conversion history
    Session {
        /// Default path for the `export` command
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() {
    unitconv_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if e.is_lookup() {
            tracing::debug!("Lookup failed: {}", e);
            eprintln!("{}", INVALID_CONVERSION);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut engine = config.build_engine()?;

    match cli.command {
        Commands::Convert {
            value,
            from,
            to,
            category,
            also,
            json,
        } => cmd_convert(&engine, value, &from, &to, &category, &also, json, config.history.precision),
        Commands::List { category, json } => cmd_list(&engine, category.as_deref(), json),
        Commands::Info { unit } => {
            cmd_info(&unit);
            Ok(())
        }
        Commands::Session { export } => {
            let export_path = export.unwrap_or_else(|| config.history.export_path.clone());
            let mut history = config.build_history();
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_session(
                &mut engine,
                &mut history,
                &export_path,
                config.history.precision,
                stdin.lock(),
                stdout.lock(),
            )
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_convert(
    engine: &ConversionEngine,
    value: f64,
    from: &str,
    to: &str,
    category: &str,
    also: &[String],
    json: bool,
    precision: usize,
) -> Result<()> {
    let mut targets = vec![to.to_string()];
    targets.extend(also.iter().cloned());
    let results = engine.convert_many(value, from, &targets, category)?;

    if json {
        let rows: Vec<_> = results
            .iter()
            .map(|(unit, converted)| json!({ "unit": unit, "value": converted }))
            .collect();
        let output = json!({
            "category": category,
            "value": value,
            "from": from,
            "results": rows,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let [(unit, converted)] = results.as_slice() {
        println!("{} {} = {:.*} {}", value, from, precision, converted, unit);
    } else {
        println!("{} {} ({}):", value, from, category);
        for (unit, converted) in &results {
            println!("  {:<14} {:.*}", unit, precision, converted);
        }
    }

    Ok(())
}

fn cmd_list(engine: &ConversionEngine, category: Option<&str>, json: bool) -> Result<()> {
    let names = match category {
        Some(category) => engine.units(category)?,
        None => engine.categories(),
    };

    if json {
        println!("{}", serde_json::to_string(&names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }

    Ok(())
}

fn cmd_info(unit: &str) {
    match unit_info(unit) {
        Some(text) => println!("{}", text),
        None => println!("No information available for '{}'.", unit),
    }
}

// ============================================================================
// Interactive session
// ============================================================================

/// The most recent successful conversion, waiting for `save`
struct LastConversion {
    category: String,
    value: f64,
    from: String,
    to: String,
    converted: f64,
}

/// Run the interactive loop until `quit` or end of input
///
/// The session owns its history; it is dropped when the loop ends unless
/// exported first.
fn run_session<R: BufRead, W: Write>(
    engine: &mut ConversionEngine,
    history: &mut HistoryLog,
    export_path: &Path,
    precision: usize,
    input: R,
    mut out: W,
) -> Result<()> {
    let mut last: Option<LastConversion> = None;

    writeln!(out, "unitconv session. Type 'help' for commands.")?;
    for line in input.lines() {
        let line = line?;
        let args = match split_args(&line) {
            Ok(args) => args,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };
        let Some((command, rest)) = args.split_first() else {
            continue;
        };

        match (command.as_str(), rest) {
            ("quit" | "exit", _) => break,
            ("help", _) => print_help(&mut out)?,
            ("convert", [value, from, to, category]) => {
                // Only a successful conversion can be saved
                last = None;
                let Ok(value) = value.parse::<f64>() else {
                    writeln!(out, "Not a number: {}", value)?;
                    continue;
                };
                match engine.convert(value, from, to, category) {
                    Ok(converted) => {
                        writeln!(out, "{} {} = {:.*} {}", value, from, precision, converted, to)?;
                        last = Some(LastConversion {
                            category: category.clone(),
                            value,
                            from: from.clone(),
                            to: to.clone(),
                            converted,
                        });
                    }
                    Err(e) if e.is_lookup() => {
                        tracing::debug!("Lookup failed: {}", e);
                        writeln!(out, "{}", INVALID_CONVERSION)?;
                    }
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            ("custom", [from, to, factor]) => {
                let Ok(factor) = factor.parse::<f64>() else {
                    writeln!(out, "Not a number: {}", factor)?;
                    continue;
                };
                match engine.register_custom_unit(from, to, factor) {
                    Ok(()) => writeln!(
                        out,
                        "Added custom conversion: 1 {} = {} {}",
                        from.trim(),
                        factor,
                        to.trim()
                    )?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            ("save", []) => match last {
                Some(ref conversion) => {
                    history.record(HistoryEntry::new(
                        conversion.category.clone(),
                        conversion.value,
                        conversion.from.clone(),
                        conversion.to.clone(),
                        conversion.converted,
                    ));
                    writeln!(out, "Saved to history ({} entries).", history.len())?;
                }
                None => writeln!(out, "Nothing to save yet.")?,
            },
            ("history", []) => print_history(&mut out, history, precision)?,
            ("export", []) => export_history(&mut out, history, export_path)?,
            ("export", [path]) => export_history(&mut out, history, Path::new(path))?,
            ("list", []) => {
                for name in engine.categories() {
                    writeln!(out, "{}", name)?;
                }
            }
            ("list", [category]) => match engine.units(category) {
                Ok(units) => {
                    for unit in units {
                        writeln!(out, "{}", unit)?;
                    }
                }
                Err(_) => writeln!(out, "{}", INVALID_CONVERSION)?,
            },
            ("info", [unit]) => match unit_info(unit) {
                Some(text) => writeln!(out, "{}", text)?,
                None => writeln!(out, "No information available for '{}'.", unit)?,
            },
            _ => writeln!(out, "Unrecognised command: {}. Type 'help'.", line.trim())?,
        }
        out.flush()?;
    }

    tracing::info!("Session ended with {} history entries", history.len());
    Ok(())
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  convert <value> <from> <to> <category>")?;
    writeln!(out, "  custom <from> <to> <factor>   (1 from = factor to)")?;
    writeln!(out, "  save                          record the last conversion")?;
    writeln!(out, "  history                       show saved conversions")?;
    writeln!(out, "  export [path]                 write history as CSV")?;
    writeln!(out, "  list [category]")?;
    writeln!(out, "  info <unit>")?;
    writeln!(out, "  quit")?;
    writeln!(out, "Quote names containing spaces, e.g. \"Square Metre\".")
}

fn print_history<W: Write>(out: &mut W, history: &HistoryLog, precision: usize) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "History is empty.");
    }
    for entry in history.entries() {
        writeln!(
            out,
            "{}  {:<12} {} {} -> {:.*} {}",
            entry.timestamp.format(unitconv_core::history::DATE_FORMAT),
            entry.category,
            entry.value,
            entry.from_unit,
            precision,
            entry.converted,
            entry.to_unit
        )?;
    }
    Ok(())
}

fn export_history<W: Write>(out: &mut W, history: &HistoryLog, path: &Path) -> Result<()> {
    match history.export_csv(path) {
        Ok(()) => writeln!(out, "History exported to {}", path.display())?,
        Err(e) => {
            tracing::warn!("Export to {:?} failed: {}", path, e);
            writeln!(out, "Export failed: {}", e)?;
        }
    }
    Ok(())
}

/// Split a command line on whitespace, keeping double-quoted runs together
fn split_args(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quote".to_string());
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}
