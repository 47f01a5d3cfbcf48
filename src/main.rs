use clap::{Args, Parser, Subcommand, ValueEnum};
use mmr_climb::calculator::{CalcError, Calculator};
use mmr_climb::config::{ClimbProfile, ProfileConfig};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_ARGUMENT: i32 = 2;
const EXIT_INSUFFICIENT_GAMES: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Win rate required to finish the climb within a number of games
    Winrate {
        /// Total number of games you are willing to play
        #[arg(short, long, allow_negative_numbers = true)]
        games: f64,
    },
    /// Games required to finish the climb at one or more win rates
    Games {
        /// Win rate between 0.0 and 1.0 (repeatable)
        #[arg(
            short,
            long = "winrate",
            required = true,
            num_args = 1..,
            allow_negative_numbers = true
        )]
        winrate: Vec<f64>,
    },
    /// Write a starter config file (defaults to ~/.config/mmr-climb/config.yaml)
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Profile values given on the command line. Each one overrides the config file.
#[derive(Args, Debug)]
struct ProfileArgs {
    /// Rating points per division
    #[arg(long, global = true, allow_negative_numbers = true)]
    mmr_per_division: Option<f64>,

    /// Your current rating
    #[arg(long, global = true, allow_negative_numbers = true)]
    current_mmr: Option<f64>,

    /// Number of divisions to climb
    #[arg(long, global = true)]
    divisions: Option<u32>,

    /// Rating gained per win
    #[arg(long, global = true, allow_negative_numbers = true)]
    win_mmr: Option<f64>,

    /// Rating change per loss, negative when rating is lost (e.g. --loss-mmr -15)
    #[arg(long, global = true, allow_negative_numbers = true)]
    loss_mmr: Option<f64>,
}

impl From<ProfileArgs> for ProfileConfig {
    fn from(args: ProfileArgs) -> Self {
        ProfileConfig {
            mmr_per_division: args.mmr_per_division,
            current_mmr: args.current_mmr,
            divisions: args.divisions,
            win_mmr: args.win_mmr,
            loss_mmr: args.loss_mmr,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "mmr-climb")]
#[command(about = "Win rate and game count calculator for ranked climbs", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/mmr-climb/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(flatten)]
    profile: ProfileArgs,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &CalcError) -> i32 {
    match err {
        CalcError::InvalidArgument(_) => EXIT_INVALID_ARGUMENT,
        CalcError::InsufficientGames { .. } => EXIT_INSUFFICIENT_GAMES,
    }
}

/// Merge the config file with command line overrides and validate the result.
/// Exits with `EXIT_CONFIG` on any problem.
fn resolve_profile(config_path: Option<PathBuf>, overrides: ProfileConfig) -> ClimbProfile {
    let config = match mmr_climb::config::load_config_or_default(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let merged = config.profile.merge(overrides);
    match mmr_climb::config::validate_profile(&merged) {
        Ok(profile) => profile,
        Err(errors) => {
            eprintln!("Profile errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    }
}

/// Write the starter config to `--config` or the default path.
fn run_init(config_path: Option<PathBuf>, force: bool) {
    let path = match config_path {
        Some(p) => p,
        None => match mmr_climb::config::get_config_path() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    };
    if let Err(e) = mmr_climb::config::write_default_config(&path, force) {
        eprintln!("Config error: {:#}", e);
        std::process::exit(EXIT_CONFIG);
    }
    println!("Wrote default config to {}", path.display());
}

fn build_calculator(config_path: Option<PathBuf>, overrides: ProfileConfig) -> Calculator {
    let profile = resolve_profile(config_path, overrides);
    let calculator = profile.calculator();
    debug!(
        total_mmr_needed = calculator.total_mmr_needed(),
        "resolved profile"
    );
    calculator
}

fn print_or_exit(output: anyhow::Result<String>) {
    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    let use_colors = mmr_climb::output::should_use_colors();

    match cli.command {
        Commands::Init { force } => run_init(config_path, force),
        Commands::Winrate { games } => {
            let calculator = build_calculator(config_path, cli.profile.into());
            let report = match calculator.required_win_rate(games) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(exit_code(&e));
                }
            };

            match cli.format {
                OutputFormat::Text => println!(
                    "{}",
                    mmr_climb::output::format_win_rate(&report, use_colors)
                ),
                OutputFormat::Json => print_or_exit(mmr_climb::output::format_json(&report)),
                OutputFormat::Tsv => {
                    println!("{}", mmr_climb::output::format_tsv_win_rate(&report))
                }
            }
        }
        Commands::Games { winrate } => {
            let calculator = build_calculator(config_path, cli.profile.into());
            // All rates must succeed before anything is printed
            let reports: Result<Vec<_>, _> = winrate
                .iter()
                .map(|&rate| calculator.required_games(rate))
                .collect();
            let reports = match reports {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(exit_code(&e));
                }
            };

            match cli.format {
                OutputFormat::Text => println!(
                    "{}",
                    mmr_climb::output::format_games_list(&reports, use_colors)
                ),
                OutputFormat::Json => print_or_exit(mmr_climb::output::format_json(&reports)),
                OutputFormat::Tsv => {
                    println!("{}", mmr_climb::output::format_tsv_games(&reports))
                }
            }
        }
    }

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}
