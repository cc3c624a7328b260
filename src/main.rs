//! liftlog - Weekly weight training planner and workout log

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use liftlog::db::Database;
use liftlog::web::{self, AppState};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version, about = "Weekly weight training planner and workout log")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "LIFTLOG_DB", default_value = "weight_training_tracker.db")]
    db: PathBuf,

    /// Folder of <table>.csv files used to seed an empty database
    #[arg(long, global = true, env = "LIFTLOG_SEED_DIR", default_value = "baseline_data")]
    seed_dir: PathBuf,

    /// Address the web UI listens on
    #[arg(long, global = true, env = "LIFTLOG_ADDR", default_value = "127.0.0.1:5000")]
    addr: SocketAddr,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web UI (default)
    Serve,

    /// Load reference data into an empty database
    Seed {
        /// Folder with one CSV per table; defaults to --seed-dir
        dir: Option<PathBuf>,
    },

    /// Print the weekly schedule
    Schedule,

    /// Stage today's workout if needed and print it
    Today,

    /// Discard the staged workout
    Clear,

    /// Archive the staged workout into history
    Finish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut db = Database::open(&cli.db)?;

    let seed_dir = match &cli.command {
        Some(Commands::Seed { dir: Some(dir) }) => dir.clone(),
        _ => cli.seed_dir.clone(),
    };
    let seeded = db.seed_if_empty(&seed_dir)?;
    if seeded {
        info!("Seeded reference data into {}", cli.db.display());
    }

    match cli.command {
        Some(Commands::Seed { .. }) => {
            if seeded {
                println!("Seeded {} from {}", cli.db.display(), seed_dir.display());
            } else {
                println!("{} already holds reference data, nothing to do", cli.db.display());
            }
        }

        Some(Commands::Schedule) => {
            println!("Weekly schedule");
            println!("{:-<40}", "");
            for day in db.get_planned_workouts()? {
                if day.exercises.is_empty() {
                    println!("{:10} rest", day.weekday.name());
                    continue;
                }
                for (i, e) in day.exercises.iter().enumerate() {
                    let label = if i == 0 { day.weekday.name() } else { "" };
                    println!("{:10} {:25} {}x{}", label, e.exercise_name, e.sets, e.reps);
                }
            }
        }

        Some(Commands::Today) => {
            let workout = db.view_current_workout(Local::now().date_naive())?;
            if let Some(date) = workout.date {
                println!("Workout for {}", date);
            }
            println!("{:-<40}", "");
            if workout.exercises.is_empty() {
                println!("Nothing planned, rest day");
            }
            for e in &workout.exercises {
                println!(
                    "{:25} {}x{} @ {}",
                    e.exercise_name,
                    e.sets.or(e.target_sets).unwrap_or(0),
                    e.reps.or(e.target_reps).unwrap_or(0),
                    e.weight.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string())
                );
            }
            let groups: Vec<&str> = workout.muscle_groups.iter().map(|g| g.muscle_group.as_str()).collect();
            if !groups.is_empty() {
                println!("Muscle groups: {}", groups.join(", "));
            }
        }

        Some(Commands::Clear) => {
            db.clear_current_workout()?;
            println!("Current workout cleared");
        }

        Some(Commands::Finish) => {
            let id = db.finish_current_workout()?;
            println!("Workout saved (id: {})", id);
        }

        Some(Commands::Serve) | None => web::serve(cli.addr, AppState::new(db)).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_is_shared_by_serve_and_default() {
        let cli = Cli::try_parse_from(["liftlog", "serve", "--addr", "0.0.0.0:8080"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());

        let cli = Cli::try_parse_from(["liftlog", "--addr", "127.0.0.1:6000"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.addr.port(), 6000);
    }
}
