//! ONI Rocket Calculator
//!
//! Finds fuel tank, oxidizer tank and booster counts that carry an Oxygen
//! Not Included rocket to a requested distance.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;

use oni_rocket_calculator::calculator::{format_modules, format_solution};
use oni_rocket_calculator::{
    config, db, extract, normalize, Balance, Calculator, Command, Controller, HistoryLog, Outcome,
    RawQuery, SolutionSet,
};

#[derive(Parser)]
#[command(name = "oni-rocket-calculator")]
#[command(about = "Rocket loadout calculator for Oxygen Not Included")]
struct Cli {
    /// Path to the SQLite database holding balance overrides
    #[arg(short, long, default_value = "oni_rocket.db")]
    database: PathBuf,

    /// TOML balance file applied over the database overrides
    #[arg(short, long)]
    balance: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract rocket balance data from decompiled C# source
    Extract {
        /// Path to decompiled source directory
        source_dir: PathBuf,

        /// Clear stored overrides before extraction
        #[arg(long)]
        clear: bool,
    },

    /// Calculate loadouts for a target distance
    Calc {
        #[command(flatten)]
        query: QueryArgs,

        /// Show every figure for each plan
        #[arg(short, long)]
        verbose: bool,
    },

    /// Read commands from stdin, keeping a history of queries
    Session,

    /// Show the effective balance table
    Balance {
        /// Print as TOML, ready to edit and pass with --balance
        #[arg(long)]
        toml: bool,
    },

    /// Initialize empty database with schema
    Init,

    /// Store the built-in balance table in the database
    LoadDefaults,
}

#[derive(Args, Debug, Clone)]
struct QueryArgs {
    /// Engine type: steam, oil or hydrogen
    #[arg(short, long)]
    engine: Option<String>,

    /// Oxidizer type: solid or liquid (ignored for steam)
    #[arg(short, long)]
    oxidizer: Option<String>,

    /// Distance to reach in km
    #[arg(short = 'k', long, allow_hyphen_values = true)]
    distance: Option<String>,

    /// Keep plans that only add extra parts
    #[arg(short, long)]
    waste: bool,

    #[arg(long, allow_hyphen_values = true)]
    research: Option<String>,

    /// Cargo bays
    #[arg(long, allow_hyphen_values = true)]
    warehouse: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    gas: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    liquid: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    creature: Option<String>,

    /// Sight-seeing modules
    #[arg(long, allow_hyphen_values = true)]
    visitor_room: Option<String>,
}

impl QueryArgs {
    fn to_raw(&self) -> RawQuery {
        RawQuery {
            engine: self.engine.clone(),
            oxidizer: self.oxidizer.clone(),
            distance: self.distance.clone(),
            allow_waste: Some(self.waste.to_string()),
            research: self.research.clone(),
            warehouse: self.warehouse.clone(),
            gas: self.gas.clone(),
            liquid: self.liquid.clone(),
            creature: self.creature.clone(),
            visitor_room: self.visitor_room.clone(),
        }
    }
}

/// One line of input in a session
#[derive(Parser)]
#[command(no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Solve a query and add it to the history
    Calc {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// List past queries
    History,
    /// Solve a past query again
    Replay { index: usize },
    /// Remove a past query
    Remove { index: usize },
    /// Forget all past queries
    Clear,
    Quit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Extract { ref source_dir, clear } => {
            if clear {
                println!("Clearing stored balance overrides...");
                db::clear_balance(&conn)?;
            }

            let stats = extract::extract_to_database(&conn, source_dir)?;
            println!("\n{}", stats);
        }

        Commands::Calc { ref query, verbose } => {
            let (balance, _) = resolve_balance(&cli, &conn)?;
            let calculator = Calculator::new(balance)?;
            let query = normalize(&query.to_raw())?;

            println!("Query: {}", query);
            if verbose {
                println!("Modules: {}", format_modules(&query.modules));
                println!("Searched {} loadouts", calculator.search_space(&query));
            }
            println!();
            let solutions = calculator.calculate(&query)?;
            print_solutions(&solutions, verbose);
        }

        Commands::Session => {
            let (balance, _) = resolve_balance(&cli, &conn)?;
            run_session(Controller::new(Calculator::new(balance)?))?;
        }

        Commands::Balance { toml } => {
            let (balance, from_file) = resolve_balance(&cli, &conn)?;
            if toml {
                print!("{}", config::to_toml(&balance)?);
            } else {
                let stored = db::list_entries(&conn)?;
                println!("{:<40} {:>12}  {}", "Key", "Value", "Source");
                println!("{}", "-".repeat(70));
                for (key, value) in balance.entries() {
                    let source = match stored.iter().find(|e| e.key == key) {
                        _ if from_file.iter().any(|k| k == key) => "file".to_string(),
                        Some(entry) => entry.source.clone().unwrap_or_else(|| "database".to_string()),
                        None => "default".to_string(),
                    };
                    println!("{:<40} {:>12}  {}", key, value, source);
                }
            }
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadDefaults => {
            db::store_balance(&conn, &Balance::default(), "default")?;
            println!("Default balance table stored ({} values)", Balance::default().entries().len());
        }
    }

    Ok(())
}

/// Defaults, then database overrides, then the TOML file if given.
/// Also returns the keys the file set.
fn resolve_balance(cli: &Cli, conn: &Connection) -> Result<(Balance, Vec<String>)> {
    let mut balance = db::load_balance(conn)?;
    let Some(path) = &cli.balance else {
        return Ok((balance, Vec::new()));
    };

    let overrides = config::read_overrides(path)
        .with_context(|| format!("Failed to load balance file {}", path.display()))?;
    config::apply_overrides(&mut balance, &overrides)
        .with_context(|| format!("Invalid balance file {}", path.display()))?;
    Ok((balance, overrides.into_iter().map(|(key, _)| key).collect()))
}

fn print_solutions(solutions: &SolutionSet, verbose: bool) {
    print!("{}", solutions);

    if verbose {
        for (index, solution) in solutions.iter().enumerate() {
            println!("\nPlan {}:", index + 1);
            print!("{}", format_solution(solution, 1));
        }
    }
}

fn run_session(controller: Controller) -> Result<()> {
    let mut history = HistoryLog::default();
    let stdin = io::stdin();

    println!("Commands: calc [flags], history, replay <n>, remove <n>, clear, quit");
    prompt()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            prompt()?;
            continue;
        }

        let parsed = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("{}", e);
                prompt()?;
                continue;
            }
        };

        let command = match parsed.command {
            SessionCommand::Quit => break,
            SessionCommand::History => {
                print_history(&history);
                prompt()?;
                continue;
            }
            SessionCommand::Calc { query } => match normalize(&query.to_raw()) {
                Ok(query) => Command::Submit { query },
                Err(e) => {
                    eprintln!("{}", e);
                    prompt()?;
                    continue;
                }
            },
            // History is shown 1-based
            SessionCommand::Replay { index } => {
                match index.checked_sub(1).and_then(|i| history.get(i)) {
                    Some(query) => Command::Replay {
                        query: query.clone(),
                    },
                    None => {
                        eprintln!("No history entry {}", index);
                        prompt()?;
                        continue;
                    }
                }
            }
            SessionCommand::Remove { index } => Command::RemoveHistoryEntry {
                index: index.wrapping_sub(1),
            },
            SessionCommand::Clear => Command::ClearHistory,
        };

        match controller.handle(&mut history, command) {
            Ok(Outcome::Solved(solutions)) => print_solutions(&solutions, false),
            Ok(Outcome::Removed(Some(query))) => println!("Removed {}", query),
            Ok(Outcome::Removed(None)) => eprintln!("No such history entry"),
            Ok(Outcome::Cleared) => println!("History cleared"),
            Err(e) => eprintln!("{}", e),
        }
        prompt()?;
    }

    Ok(())
}

fn print_history(history: &HistoryLog) {
    if history.is_empty() {
        println!("No history yet.");
        return;
    }
    for (index, query) in history.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, query);
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
