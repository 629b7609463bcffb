//! HabitChallenge CLI entry point

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use habitchallenge::cli::{Cli, Command, OutputFormat};
use habitchallenge::config::Config;
use habitchallenge::validation::{self, NewChallenge};
use habitchallenge::{
    Challenge, ChallengeId, ChallengeProgressTracker, ChallengeStore, DayLabel, StoreError, TrackerError,
    ValidationError, ZoneDayLabeler,
};

/// Exit code for requests the user got wrong (unknown participant, bad input)
const EXIT_CLIENT_ERROR: i32 = 2;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("habitchallenge")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("hc.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    match run(cli) {
        Ok(()) => Ok(()),
        Err(e) if is_client_error(&e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(EXIT_CLIENT_ERROR);
        }
        Err(e) => Err(e),
    }
}

fn is_client_error(err: &eyre::Report) -> bool {
    if err.downcast_ref::<ValidationError>().is_some() || err.downcast_ref::<TrackerError>().is_some() {
        return true;
    }
    err.downcast_ref::<StoreError>().is_some_and(StoreError::is_client_error)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    let tz = config.timezone()?;
    let tracker = ChallengeProgressTracker::new(ZoneDayLabeler::new(tz));
    let store = ChallengeStore::open(&config.store_path).context("Failed to open challenge store")?;
    info!(store = %config.store_path.display(), %tz, "habitchallenge starting");

    debug!(command = ?cli.command, "run: dispatching command");
    match cli.command {
        Command::Create {
            name,
            start,
            days,
            participants,
        } => {
            let start_date = match start {
                Some(s) => s.parse::<DayLabel>()?.date(),
                None => tracker.today().date(),
            };
            let challenge = NewChallenge {
                name,
                start_date,
                duration_days: days,
                participants,
            }
            .validate()?;
            store.create(&challenge)?;
            println!(
                "{} Created challenge: {} ({} to {})",
                "✓".green(),
                challenge.id().to_string().cyan(),
                challenge.start_date(),
                challenge.end_date()
            );
        }
        Command::Join { challenge_id, user_id } => {
            let id = ChallengeId::from(challenge_id);
            let user_id = validation::validate_user_id(&user_id)?;
            let participant = store.update(&id, |c| Ok::<_, TrackerError>(tracker.add_participant(c, &user_id).clone()))?;
            println!(
                "{} {} is in {} ({} days recorded)",
                "✓".green(),
                participant.user_id().to_string().yellow(),
                id.to_string().cyan(),
                participant.days_recorded()
            );
        }
        Command::Leave { challenge_id, user_id } => {
            let id = ChallengeId::from(challenge_id);
            let user_id = validation::validate_user_id(&user_id)?;
            match store.update(&id, |c| Ok::<_, TrackerError>(tracker.remove_participant(c, &user_id)))? {
                Some(_) => println!("{} Removed {} from {}", "✓".green(), user_id, id.to_string().cyan()),
                None => println!("{} is not part of {}", user_id, id.to_string().cyan()),
            }
        }
        Command::Record {
            challenge_id,
            user_id,
            pct,
            day,
        } => {
            let id = ChallengeId::from(challenge_id);
            let user_id = validation::validate_user_id(&user_id)?;
            let pct = validation::validate_pct(pct)?;
            let day = day.map(|d| d.parse::<DayLabel>()).transpose()?;
            let label = store.update(&id, |c| tracker.record_daily_pct(c, &user_id, pct, day))?;
            println!(
                "{} Recorded {}% for {} on {}",
                "✓".green(),
                pct,
                user_id.to_string().yellow(),
                label.to_string().cyan()
            );
        }
        Command::Extend { challenge_id, days } => {
            let id = ChallengeId::from(challenge_id);
            let duration = store.update(&id, |c| -> Result<u32, StoreError> {
                validation::validate_extension(c, days)?;
                Ok(tracker.extend_duration(c, days)?)
            })?;
            println!(
                "{} {} now runs {} days",
                "✓".green(),
                id.to_string().cyan(),
                duration
            );
        }
        Command::Show { challenge_id, format } => {
            let challenge = store.get(&ChallengeId::from(challenge_id))?;
            print_challenge(&tracker, &challenge, format)?;
        }
        Command::Winner { challenge_id, format } => {
            let challenge = store.get(&ChallengeId::from(challenge_id))?;
            let winner = tracker.winner(&challenge);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&winner)?),
                OutputFormat::Text => match winner {
                    Some(w) => println!("{} ({}%)", w.user_id.to_string().green(), w.avg),
                    None => println!("No participants yet"),
                },
            }
        }
        Command::List { format } => {
            let challenges = store.list()?;
            match format {
                OutputFormat::Json => {
                    let summaries: Vec<_> = challenges.iter().map(|c| summary(&tracker, c)).collect();
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                }
                OutputFormat::Text if challenges.is_empty() => println!("No challenges found"),
                OutputFormat::Text => {
                    let today = tracker.today().date();
                    for c in &challenges {
                        let state = if c.is_active(today) {
                            format!("{} days left", c.days_remaining(today)).green()
                        } else {
                            "inactive".dimmed()
                        };
                        println!(
                            "{} {} [{}] {} participants",
                            c.id().to_string().cyan(),
                            c.name(),
                            state,
                            c.participants().len()
                        );
                    }
                }
            }
        }
        Command::Delete { challenge_id } => {
            let id = ChallengeId::from(challenge_id);
            if store.delete(&id)? {
                println!("{} Deleted challenge: {}", "✓".green(), id);
            } else {
                println!("No challenge {}", id);
            }
        }
    }

    Ok(())
}

/// Detail view: the stored document plus derived fields
fn summary(tracker: &ChallengeProgressTracker, challenge: &Challenge) -> serde_json::Value {
    let today = tracker.today().date();
    serde_json::json!({
        "id": challenge.id(),
        "name": challenge.name(),
        "startDate": challenge.start_date(),
        "durationDays": challenge.duration_days(),
        "endDate": challenge.end_date(),
        "isActive": challenge.is_active(today),
        "daysRemaining": challenge.days_remaining(today),
        "standings": tracker.standings(challenge),
        "winner": tracker.winner(challenge),
    })
}

fn print_challenge(tracker: &ChallengeProgressTracker, challenge: &Challenge, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let mut value = summary(tracker, challenge);
        value["participants"] = serde_json::to_value(challenge.participants())?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let today = tracker.today().date();
    println!("Challenge: {} ({})", challenge.name().bold(), challenge.id().to_string().cyan());
    println!(
        "  {} to {} ({} days, {} remaining)",
        challenge.start_date(),
        challenge.end_date(),
        challenge.duration_days(),
        challenge.days_remaining(today)
    );
    for participant in challenge.participants() {
        println!(
            "  {} {}% across {} days",
            participant.user_id().to_string().yellow(),
            participant.average_pct(),
            participant.days_recorded()
        );
        for snapshot in participant.daily_snapshots() {
            println!("    {} {}%", snapshot.date_label.to_string().dimmed(), snapshot.pct);
        }
    }
    match tracker.winner(challenge) {
        Some(w) => println!("  Leader: {} ({}%)", w.user_id.to_string().green(), w.avg),
        None => println!("  Leader: {}", "none".dimmed()),
    }
    Ok(())
}
