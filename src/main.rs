use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use room_tracker::db::{establish_connection_pool, run_pending_migrations};
use room_tracker::domain::types::{RoomId, UserId};
use room_tracker::dto::checklist::ChecklistDto;
use room_tracker::models::config::{StoreBackend, TrackerConfig};
use room_tracker::repository::{DieselRepository, RestRepository};
use room_tracker::services::progress::{show_checklist, toggle_room};
use room_tracker::services::seed::{SeedReport, load_checklist, seed_checklist};

#[derive(Parser)]
#[command(name = "room-tracker")]
#[command(about = "Track completion of checklist rooms grouped by category")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace stored categories and rooms with those in the checklist document
    Seed {
        /// Checklist document (defaults to the configured readme_path)
        #[arg(long, short)]
        readme: Option<PathBuf>,
    },

    /// Show the checklist with a user's progress
    Rooms {
        /// User identity
        #[arg(long, short)]
        user: String,
    },

    /// Toggle completion of a room for a user
    Toggle {
        /// User identity
        #[arg(long, short)]
        user: String,

        /// Room identity
        room: String,
    },
}

enum Store {
    Rest(RestRepository),
    Sqlite(DieselRepository),
}

/// Run `$body` with `$repo` bound to whichever store is configured.
macro_rules! with_store {
    ($store:expr, |$repo:ident| $body:expr) => {
        match $store {
            Store::Rest(ref $repo) => $body,
            Store::Sqlite(ref $repo) => $body,
        }
    };
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = TrackerConfig::load()?;
    let backend = config.backend()?;

    match cli.command {
        Commands::Seed { readme } => {
            let path = readme.unwrap_or_else(|| config.readme_path.clone());
            let categories = load_checklist(&path)?;

            let store = open_store(backend, &config.store_key)?;
            let report = with_store!(store, |repo| seed_checklist(&categories, repo))?;
            print_report(&report, cli.json)?;
        }

        Commands::Rooms { user } => {
            let user = UserId::new(user)?;
            let store = open_store(backend, &config.store_key)?;
            let checklist = with_store!(store, |repo| show_checklist(&user, repo))?;
            print_checklist(&checklist, cli.json)?;
        }

        Commands::Toggle { user, room } => {
            let user = UserId::new(user)?;
            let room = RoomId::new(room)?;
            let store = open_store(backend, &config.store_key)?;
            let progress = with_store!(store, |repo| toggle_room(&user, &room, repo))?;
            if cli.json {
                println!("{}", serde_json::to_string(&progress)?);
            } else if progress.completed {
                println!("Room {} marked completed", progress.room_id);
            } else {
                println!("Room {} marked not completed", progress.room_id);
            }
        }
    }

    Ok(())
}

fn open_store(backend: StoreBackend, store_key: &str) -> Result<Store, Box<dyn Error>> {
    match backend {
        StoreBackend::Rest { base_url } => {
            log::info!("Using hosted store at {base_url}");
            Ok(Store::Rest(RestRepository::new(&base_url, store_key)?))
        }
        StoreBackend::Sqlite { database_url } => {
            log::info!("Using SQLite store at {database_url}");
            let pool = establish_connection_pool(&database_url)?;
            run_pending_migrations(&pool)?;
            Ok(Store::Sqlite(DieselRepository::new(pool)))
        }
    }
}

fn print_report(report: &SeedReport, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    println!("Total categories: {}", report.categories);
    println!("Total rooms: {}", report.rooms_parsed);
    println!(
        "Inserted {} categories and {} rooms",
        report.categories_inserted, report.rooms_inserted
    );
    for row in &report.errors {
        eprintln!("Failed {:?} {}: {}", row.kind, row.name, row.message);
    }
    Ok(())
}

fn print_checklist(checklist: &ChecklistDto, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(checklist)?);
        return Ok(());
    }

    if checklist.categories.is_empty() {
        println!("No rooms found. Run `room-tracker seed` first.");
        return Ok(());
    }

    println!(
        "{} / {} rooms completed",
        checklist.completed, checklist.total
    );
    for category in &checklist.categories {
        println!();
        println!(
            "{} ({}/{})",
            category.name, category.completed_rooms, category.total_rooms
        );
        for room in &category.rooms {
            let mark = if room.completed { "x" } else { " " };
            println!("  [{mark}] {}  {}  ({})", room.title, room.url, room.id);
        }
    }
    Ok(())
}
