//! Command line entry point for the Huddle engine
//!
//! Operates on a JSON session file holding the roster and the match ledger
//! of one play group. Every command loads the file into in-memory stores,
//! runs through the [`MatchService`] and prints its result as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huddle::config::{AppConfig, BalanceStrategy, StaticConfigProvider};
use huddle::service::MatchService;
use huddle::store::SessionSnapshot;
use huddle::types::{MatchSubmission, PlayerId, TeamLabel};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Huddle - balanced teams and streak-aware ratings for game nights
#[derive(Parser)]
#[command(
    name = "huddle",
    version,
    about = "Balance teams and settle match results for a casual play group",
    long_about = "Huddle splits a roster into two teams of near-equal power and, after a match, \
                 adjusts each player's power with a streak- and underdog-aware rule. State lives \
                 in a JSON session file with the roster and the match ledger."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        global = true,
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Balancing strategy override
    #[arg(
        long,
        value_name = "STRATEGY",
        global = true,
        help = "Override balancing strategy (exact, greedy, auto)"
    )]
    strategy: Option<BalanceStrategy>,

    /// Enable debug mode
    #[arg(
        short,
        long,
        global = true,
        help = "Enable debug mode with verbose logging"
    )]
    debug: bool,

    /// Dump collected metrics after the command
    #[arg(long, global = true, help = "Print Prometheus metrics to stderr")]
    print_metrics: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Propose two balanced teams
    Balance {
        /// Session file
        #[arg(short, long, value_name = "FILE")]
        session: PathBuf,

        /// Players to split; the whole roster when omitted
        #[arg(short, long, value_delimiter = ',', value_name = "IDS")]
        players: Vec<PlayerId>,
    },

    /// Record a finished match and adjust ratings
    Settle {
        /// Session file
        #[arg(short, long, value_name = "FILE")]
        session: PathBuf,

        #[arg(long, value_delimiter = ',', required = true, value_name = "IDS")]
        team_a: Vec<PlayerId>,

        #[arg(long, value_delimiter = ',', required = true, value_name = "IDS")]
        team_b: Vec<PlayerId>,

        /// Winning side, A or B
        #[arg(short, long)]
        winner: TeamLabel,

        /// Write the updated roster and ledger back to the session file
        #[arg(long)]
        save: bool,
    },

    /// Show the roster ranked by power
    Leaderboard {
        #[arg(short, long, value_name = "FILE")]
        session: PathBuf,
    },

    /// Show past matches, or one player's power over time
    History {
        #[arg(short, long, value_name = "FILE")]
        session: PathBuf,

        #[arg(short, long, value_name = "ID")]
        player: Option<PlayerId>,
    },

    /// Add a player to the session
    Register {
        #[arg(short, long, value_name = "FILE")]
        session: PathBuf,

        #[arg(short, long)]
        name: String,

        /// Starting power; the configured default when omitted
        #[arg(long)]
        power: Option<f64>,
    },

    /// Remove a player from the session; their match records stay
    Remove {
        #[arg(short, long, value_name = "FILE")]
        session: PathBuf,

        #[arg(short, long, value_name = "ID")]
        player: PlayerId,
    },
}

impl Command {
    fn session_path(&self) -> &Path {
        match self {
            Command::Balance { session, .. }
            | Command::Settle { session, .. }
            | Command::Leaderboard { session }
            | Command::History { session, .. }
            | Command::Register { session, .. }
            | Command::Remove { session, .. } => session,
        }
    }
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display effective configuration
fn display_config_summary(config: &AppConfig) {
    info!("Huddle {}", huddle::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!(
        "   Balancing: {} (exact up to {} players)",
        config.balancing.strategy, config.balancing.exact_max_players
    );
    info!(
        "   Rating: win {}, loss {}, streak bonus {} after {}, underdog bonus {} at gap {}",
        config.rating.win_delta,
        config.rating.loss_delta,
        config.rating.streak_bonus,
        config.rating.streak_threshold,
        config.rating.underdog_bonus,
        config.rating.power_difference_threshold
    );
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(strategy) = args.strategy {
        config.balancing.strategy = strategy;
    }

    huddle::config::validate_config(&config)?;
    Ok(config)
}

/// In-memory stores loaded from a session file, plus the service over them
struct Session {
    roster: Arc<huddle::InMemoryRoster>,
    ledger: Arc<huddle::InMemoryLedger>,
    service: MatchService,
}

impl Session {
    fn open(path: &Path, config: &AppConfig) -> Result<Self> {
        let snapshot = SessionSnapshot::load(path)?;
        info!(
            "Loaded session {} - {} players, {} ledger records",
            path.display(),
            snapshot.players.len(),
            snapshot.records.len()
        );

        let (roster, ledger) = snapshot.into_stores();
        let roster = Arc::new(roster);
        let ledger = Arc::new(ledger);

        let provider = StaticConfigProvider::new(config.rating.clone(), config.balancing.clone())?;
        let service = MatchService::new(
            roster.clone(),
            ledger.clone(),
            ledger.clone(),
            Arc::new(provider),
        )?;

        Ok(Self {
            roster,
            ledger,
            service,
        })
    }

    fn save(&self, path: &Path) -> Result<()> {
        SessionSnapshot::capture(&self.roster, &self.ledger)?.save(path)?;
        info!("Saved session {}", path.display());
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}

async fn run(command: Command, config: &AppConfig, print_metrics: bool) -> Result<()> {
    let path = command.session_path().to_path_buf();
    let session = Session::open(&path, config)?;
    let service = session.service.clone();

    match command {
        Command::Balance { players, .. } => {
            let proposal = if players.is_empty() {
                service.propose_roster_teams().await?
            } else {
                service.propose_teams(&players).await?
            };
            print_json(&proposal)?;
        }
        Command::Settle {
            team_a,
            team_b,
            winner,
            save,
            ..
        } => {
            let outcome = service
                .settle_match(MatchSubmission {
                    team_a,
                    team_b,
                    winner,
                })
                .await?;
            print_json(&outcome)?;

            if save {
                session.save(&path)?;
            }
        }
        Command::Leaderboard { .. } => {
            print_json(&service.leaderboard().await?)?;
        }
        Command::History { player, .. } => match player {
            Some(player_id) => print_json(&service.power_history(&player_id).await?)?,
            None => print_json(&service.match_history().await?)?,
        },
        Command::Register { name, power, .. } => {
            let player = service.register_player(&name, power).await?;
            session.save(&path)?;
            print_json(&player)?;
        }
        Command::Remove { player, .. } => {
            let removed = service.remove_player(&player).await?;
            if removed {
                session.save(&path)?;
            }
            print_json(&removed)?;
        }
    }

    if print_metrics {
        eprintln!("{}", service.metrics().gather_text()?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        display_config_summary(&config);
        info!("Configuration validation successful");
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let Some(command) = args.command else {
        eprintln!("No command given, see `huddle --help`");
        std::process::exit(2);
    };

    display_config_summary(&config);

    if let Err(e) = run(command, &config, args.print_metrics).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
