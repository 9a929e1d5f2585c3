//! vacancy-scout CLI
//!
//! Searches hh.ru, stores results per keyword and prints them ranked by salary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vacancy_scout::{
    console::{Console, run_session},
    error::Result,
    models::Config,
    pipeline::{SearchPipeline, SearchQuery},
    storage::RemoveOutcome,
    utils::{parse_salary_input, parse_top_n},
};

/// vacancy-scout - hh.ru vacancy search ranked by salary
#[derive(Parser, Debug)]
#[command(
    name = "vacancy-scout",
    version,
    about = "hh.ru vacancy search ranked by salary"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Override the directory the store files live in
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask for the query interactively, repeat until told to stop
    Interactive,

    /// Search once and print the results
    Search {
        /// Search text sent to hh.ru
        keyword: String,

        /// Keep only vacancies mentioning one of these words
        #[arg(short, long = "filter", num_args = 1..)]
        filter: Vec<String>,

        /// Lowest acceptable salary
        #[arg(long)]
        min: Option<String>,

        /// Highest acceptable salary
        #[arg(long)]
        max: Option<String>,

        /// How many vacancies the top list shows
        #[arg(short, long, value_parser = parse_top)]
        top: Option<usize>,

        /// Also print the vacancies after the top list
        #[arg(long)]
        all: bool,
    },

    /// Print the vacancies stored for a keyword
    List {
        keyword: String,
    },

    /// Remove a stored vacancy by id
    Remove {
        keyword: String,
        id: String,
    },

    /// Validate the configuration file
    Validate,
}

fn parse_top(input: &str) -> std::result::Result<usize, String> {
    parse_top_n(input).ok_or_else(|| format!("expected a positive number, got '{input}'"))
}

/// Initialize logging with a default filter; `RUST_LOG` still wins.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging needs the configured level, so read config before reporting on it
    let loaded = Config::load(&cli.config);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.logging.level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    init_logging(&level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });
    if let Some(dir) = cli.storage_dir {
        config.storage.dir = dir;
    }

    match cli.command {
        Command::Interactive => {
            let pipeline = SearchPipeline::from_config(&config)?;
            let mut console = Console::stdio();
            let searches = run_session(&mut console, &pipeline, config.display.top_n)?;
            log::info!("Session finished after {} searches", searches);
        }

        Command::Search {
            keyword,
            filter,
            min,
            max,
            top,
            all,
        } => {
            let pipeline = SearchPipeline::from_config(&config)?;
            let query = SearchQuery::new(keyword, top.unwrap_or(config.display.top_n))
                .with_filter_words(filter)
                .with_salary(
                    parse_salary_input(min.as_deref().unwrap_or_default()),
                    parse_salary_input(max.as_deref().unwrap_or_default()),
                );

            let outcome = pipeline.run(&query)?;
            let mut console = Console::stdio();
            console.show_outcome(&outcome)?;
            console.offer_remainder(&outcome, Some(all))?;
        }

        Command::List { keyword } => {
            let pipeline = SearchPipeline::from_config(&config)?;
            let stored = pipeline.stored(&keyword);

            let mut console = Console::stdio();
            console.message(&format!("Найдено {} вакансий\n", stored.len()))?;
            console.show_vacancies(&stored)?;
        }

        Command::Remove { keyword, id } => {
            let pipeline = SearchPipeline::from_config(&config)?;
            let mut console = Console::stdio();

            for (location, outcome) in pipeline.remove(&keyword, &id) {
                let line = match outcome {
                    Ok(RemoveOutcome::Removed { .. }) => {
                        format!("Вакансия {id} успешно удалена из {location}")
                    }
                    Ok(RemoveOutcome::NotFound) => {
                        format!("Вакансия {id} не найдена в {location}")
                    }
                    Err(e) => {
                        log::error!("Removing {} from {} failed: {}", id, location, e);
                        format!("Не удалось изменить {location}: {e}")
                    }
                };
                console.message(&line)?;
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", cli.config.display());
        }
    }

    Ok(())
}
