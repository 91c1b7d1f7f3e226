use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use toread_lib::{
    Repository,
    repository::{IdSourceKind, config::Overrides},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

mod book;
mod pace;
mod shelf;

#[derive(Parser, Debug)]
#[command(name = "toread")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Keep the list in memory only, nothing is read or written
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Override how ids are assigned to new books
    #[arg(long, global = true, value_enum)]
    ids: Option<IdSourceKind>,

    /// Log more, repeat for trace output
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Operate on the to-read list
    #[command(subcommand)]
    Book(book::Command),
    /// Show the list as a bookshelf
    Shelf,
    /// Work out how many pages a day finish a book in time
    Pace(pace::Args),
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    let cli = Cli::parse();

    init_logging(cli.verbose);

    // The estimator doesn't touch the list
    if let Command::Pace(args) = &cli.command {
        return pace::handle(args);
    }

    // The list is fully restored before any command sees it
    let repo = match Repository::new(&cli.overrides()) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return sysexits::ExitCode::IoErr.into();
        }
    };

    match &cli.command {
        Command::Book(cmd) => book::handle(&repo, cmd),
        Command::Shelf => shelf::handle(&repo),
        Command::Pace(args) => pace::handle(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            database: self.database.clone(),
            id_source: self.ids,
            ephemeral: self.ephemeral,
        }
    }
}
