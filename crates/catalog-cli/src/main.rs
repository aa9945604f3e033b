//! Catalog Search - command-line front end for catalog keyword search.
//!
//! Wraps catalog-core: searches the locale's index and prints a fixed-width
//! result table, reports the index age, or installs a freshly built index
//! document.

use anyhow::{Context, Result};
use catalog_core::store::atomic_read_json;
use catalog_core::{
    CatalogError, Index, SearchConfig, SearchEngine, SearchHit, SearchOutcome, StorageConfig,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "catalog-search")]
#[command(about = "Keyword search over a locale-scoped catalog index")]
struct Args {
    /// Directory holding the index files (defaults to the user data directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Index locale: TR or ENG
    #[arg(short, long, default_value = "TR")]
    locale: String,

    /// Scoring time budget in seconds
    #[arg(long, default_value_t = SearchConfig::DEFAULT_TIME_BUDGET.as_secs_f64())]
    budget_secs: f64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the entries whose names best match the keywords
    Search {
        /// Keywords, in any order
        #[arg(required = true)]
        keyword: Vec<String>,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = SearchConfig::DEFAULT_LIMIT)]
        limit: usize,

        /// Print only the matching codes, one per line
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show how many days ago the index was written
    Age,
    /// Install a JSON index document as the locale's index
    Install {
        /// File holding a `{code: [name, frequency, start date, ...]}` object
        file: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        let code = e
            .downcast_ref::<CatalogError>()
            .map_or(1, CatalogError::exit_code);
        process::exit(code);
    }
}

fn run(args: Args) -> Result<()> {
    let data_dir = match args.data_dir {
        Some(path) => path,
        None => dirs::data_dir()
            .map(|dir| dir.join(StorageConfig::DATA_DIR_NAME))
            .context("Could not determine a data directory; pass --data-dir")?,
    };
    debug!("Data directory: {}", data_dir.display());

    let budget = Duration::try_from_secs_f64(args.budget_secs).map_err(|_| {
        CatalogError::Config {
            message: format!("invalid time budget: {} seconds", args.budget_secs),
        }
    })?;

    let engine = SearchEngine::builder(&data_dir)
        .locale(args.locale)
        .time_budget(budget)
        .build()?;

    match args.command {
        Command::Search {
            keyword,
            limit,
            quiet,
        } => {
            let keyword = keyword.join(" ");
            let outcome = engine.search(&keyword, limit, args.debug)?;
            if quiet {
                for code in outcome.codes() {
                    println!("{}", code);
                }
            } else {
                print_table(&outcome);
            }
        }
        Command::Age => {
            let days = engine.age_in_days();
            if days < 0 {
                println!(
                    "No {} index at {}",
                    engine.locale(),
                    engine.index_path().display()
                );
            } else {
                println!("{} index is {} days old", engine.locale(), days);
            }
        }
        Command::Install { file } => {
            let index: Index = atomic_read_json(&file)?
                .with_context(|| format!("No index document at {}", file.display()))?;
            engine.storage().replace(&index)?;
            println!(
                "Installed {} entries into {}",
                index.len(),
                engine.index_path().display()
            );
        }
    }

    Ok(())
}

const CODE_WIDTH: usize = 20;
const NAME_WIDTH: usize = 63;
const FREQUENCY_WIDTH: usize = 16;
const DATE_WIDTH: usize = 11;
const TABLE_WIDTH: usize = CODE_WIDTH + NAME_WIDTH + FREQUENCY_WIDTH + DATE_WIDTH;

fn print_table(outcome: &SearchOutcome) {
    if outcome.is_empty() {
        println!("No results.");
        return;
    }

    println!("{}", rule());
    println!(
        "{:<cw$}{:<nw$}{:<fw$}{:<dw$}",
        "Code",
        "Name",
        "Frequency",
        "Start Date",
        cw = CODE_WIDTH,
        nw = NAME_WIDTH,
        fw = FREQUENCY_WIDTH,
        dw = DATE_WIDTH,
    );
    println!("{}", rule());
    for hit in &outcome.hits {
        println!("{}", table_row(hit));
    }
    println!("{}", rule());
}

fn rule() -> String {
    "-".repeat(TABLE_WIDTH)
}

fn table_row(hit: &SearchHit) -> String {
    format!(
        "{:<cw$}{:<nw$}{:<fw$}{:<dw$}",
        clip(&hit.code, CODE_WIDTH),
        clip(&hit.name, NAME_WIDTH),
        clip(&hit.frequency, FREQUENCY_WIDTH),
        clip(&hit.start_date, DATE_WIDTH),
        cw = CODE_WIDTH,
        nw = NAME_WIDTH,
        fw = FREQUENCY_WIDTH,
        dw = DATE_WIDTH,
    )
}

/// Cut `text` to fit a column, leaving one space before the next column.
fn clip(text: &str, width: usize) -> String {
    let limit = width.saturating_sub(1);
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(limit.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_keeps_short_text() {
        assert_eq!(clip("MONTHLY", FREQUENCY_WIDTH), "MONTHLY");
    }

    #[test]
    fn test_clip_marks_cut_text() {
        let clipped = clip("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(clipped, "abcdefgh~");
        assert_eq!(clipped.chars().count(), 9);
    }

    #[test]
    fn test_row_width() {
        let hit = SearchHit {
            code: "TP.FG.J0".to_string(),
            score: 4,
            name: "Tüketici Fiyat Endeksi".to_string(),
            frequency: "MONTHLY".to_string(),
            start_date: "2003-01".to_string(),
        };
        let row = table_row(&hit);
        assert_eq!(row.chars().count(), TABLE_WIDTH);
        assert_eq!(rule().chars().count(), row.chars().count());
        assert!(row.starts_with("TP.FG.J0"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "catalog-search",
            "--locale",
            "ENG",
            "search",
            "price",
            "index",
            "-n",
            "3",
        ])
        .unwrap();
        assert_eq!(args.locale, "ENG");
        match args.command {
            Command::Search { keyword, limit, quiet } => {
                assert_eq!(keyword, vec!["price", "index"]);
                assert_eq!(limit, 3);
                assert!(!quiet);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
