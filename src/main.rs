use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use podium::betting::{self, BetError, BetSubmission};
use podium::config::Config;
use podium::output;
use podium::schedule::StatusCalculator;
use podium::season::{DriverId, Picks, Position, RaceResult, RaceStatus, SeasonData, SeasonStore};
use podium::standings::{self, StandingsError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show betting status for every race, or details for one (default if no subcommand)
    Status {
        /// Race to show in detail
        #[arg(long)]
        race: Option<u32>,
    },
    /// Place or update a bet on an open race
    Bet {
        #[arg(long)]
        user: String,
        #[arg(long)]
        race: u32,
        #[command(flatten)]
        picks: PickArgs,
        /// Spend the season's one double-points bet on this race
        #[arg(long)]
        double_points: bool,
    },
    /// Record the official result of a race (marks it finished)
    #[command(name = "result")]
    RecordResult {
        #[arg(long)]
        race: u32,
        #[command(flatten)]
        picks: PickArgs,
    },
    /// Override a race's status; `scheduled` hands it back to the calendar
    RaceStatus {
        #[arg(long)]
        race: u32,
        #[arg(value_parser = parse_status)]
        status: RaceStatus,
    },
    /// Set or clear the variable driver of a race
    VariableDriver {
        #[arg(long)]
        race: u32,
        /// Driver id or name fragment
        #[arg(long, conflicts_with = "clear", required_unless_present = "clear")]
        driver: Option<String>,
        #[arg(long)]
        clear: bool,
    },
    /// Season standings
    Leaderboard,
    /// One player's race-by-race history
    Performance {
        #[arg(long)]
        user: String,
    },
    /// Every player's picks and points for one race
    Dashboard {
        #[arg(long)]
        race: u32,
    },
    /// Export all bets as CSV
    Export {
        /// Output file (defaults to bets_export_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Picks shared by bets and results. Drivers are given by id or name fragment.
#[derive(Args, Debug, Clone, Default)]
struct PickArgs {
    #[arg(long)]
    pole: Option<String>,
    #[arg(long)]
    p1: Option<String>,
    #[arg(long)]
    p2: Option<String>,
    #[arg(long)]
    p3: Option<String>,
    #[arg(long)]
    p4: Option<String>,
    #[arg(long)]
    p5: Option<String>,
    /// Finishing position of the special driver
    #[arg(long, value_parser = parse_position)]
    special_pos: Option<Position>,
    /// Finishing position of the race's variable driver
    #[arg(long, value_parser = parse_position)]
    variable_pos: Option<Position>,
}

#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(about = "F1 prediction league: betting windows, scoring and standings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/podium/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Season file, overriding the config
    #[arg(long, global = true)]
    season: Option<PathBuf>,

    /// Evaluate as if it were this instant (RFC 3339)
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_status(s: &str) -> Result<RaceStatus, String> {
    s.parse()
}

fn parse_position(s: &str) -> Result<Position, String> {
    s.parse()
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

/// Why a command stopped, mapped onto an exit code.
enum Failure {
    Rejected(String),
    Data(String),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Rejected(_) => EXIT_REJECTED,
            Failure::Data(_) => EXIT_DATA,
        }
    }

    fn message(&self) -> &str {
        match self {
            Failure::Rejected(m) | Failure::Data(m) => m,
        }
    }
}

impl From<BetError> for Failure {
    fn from(e: BetError) -> Self {
        match &e {
            BetError::RaceDate(_) => Failure::Data(e.to_string()),
            _ => Failure::Rejected(e.to_string()),
        }
    }
}

impl From<StandingsError> for Failure {
    fn from(e: StandingsError) -> Self {
        Failure::Rejected(e.to_string())
    }
}

/// Everything a command needs, resolved once at startup.
struct Context {
    config: Config,
    calculator: StatusCalculator,
    store: SeasonStore,
    now: DateTime<Utc>,
    use_colors: bool,
    verbose: bool,
}

impl Context {
    fn load_season(&self) -> Result<SeasonData, Failure> {
        self.store
            .load()
            .map_err(|e| Failure::Data(format!("{:#}", e)))
    }

    fn save_season(&self, season: &SeasonData) -> Result<(), Failure> {
        self.store
            .save(season)
            .map_err(|e| Failure::Data(format!("{:#}", e)))
    }

    /// The configured special driver, if it is part of this season.
    fn special_driver(&self, season: &SeasonData) -> Option<DriverId> {
        let name = self.config.special_driver.as_deref()?;
        let found = season.find_driver(name).map(|d| d.id.clone());
        if found.is_none() {
            tracing::warn!(special_driver = name, "Special driver not found in season; skipping its checks");
        }
        found
    }
}

fn main() {
    let cli = Cli::parse();
    podium::logging::init_tracing(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Status { race: None });

    // Load config
    let config = match podium::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = podium::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let calculator = match config.calculator() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let season_path = cli.season.unwrap_or_else(|| config.season_path());
    tracing::debug!(season = %season_path.display(), offset = %calculator.offset(), "Starting");

    let ctx = Context {
        config,
        calculator,
        store: SeasonStore::new(season_path),
        now: cli.now.unwrap_or_else(Utc::now),
        use_colors: output::should_use_colors(),
        verbose: cli.verbose,
    };

    let outcome = match command {
        Commands::Status { race } => run_status(&ctx, race),
        Commands::Bet {
            user,
            race,
            picks,
            double_points,
        } => run_bet(&ctx, user, race, picks, double_points),
        Commands::RecordResult { race, picks } => run_result(&ctx, race, picks),
        Commands::RaceStatus { race, status } => run_race_status(&ctx, race, status),
        Commands::VariableDriver { race, driver, clear } => {
            run_variable_driver(&ctx, race, if clear { None } else { driver })
        }
        Commands::Leaderboard => run_leaderboard(&ctx),
        Commands::Performance { user } => run_performance(&ctx, &user),
        Commands::Dashboard { race } => run_dashboard(&ctx, race),
        Commands::Export { output } => run_export(&ctx, output),
    };

    match outcome {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(failure) => {
            eprintln!("Error: {}", failure.message());
            std::process::exit(failure.exit_code());
        }
    }
}

fn resolve_driver(season: &SeasonData, arg: Option<&str>) -> Result<Option<DriverId>, Failure> {
    let Some(arg) = arg else {
        return Ok(None);
    };
    season
        .find_driver(arg)
        .map(|d| Some(d.id.clone()))
        .ok_or_else(|| Failure::Rejected(format!("Unknown driver: {}", arg)))
}

fn build_picks(season: &SeasonData, args: &PickArgs) -> Result<Picks, Failure> {
    Ok(Picks {
        pole: resolve_driver(season, args.pole.as_deref())?,
        p1: resolve_driver(season, args.p1.as_deref())?,
        p2: resolve_driver(season, args.p2.as_deref())?,
        p3: resolve_driver(season, args.p3.as_deref())?,
        p4: resolve_driver(season, args.p4.as_deref())?,
        p5: resolve_driver(season, args.p5.as_deref())?,
        special_position: args.special_pos,
        variable_position: args.variable_pos,
    })
}

fn run_status(ctx: &Context, race_id: Option<u32>) -> Result<(), Failure> {
    let season = ctx.load_season()?;

    if let Some(race_id) = race_id {
        let race = season
            .race(race_id)
            .ok_or_else(|| Failure::Rejected(format!("Unknown race: {}", race_id)))?;
        let info = ctx
            .calculator
            .betting_info(&race.date, Some(race.status), ctx.now)
            .map_err(|e| Failure::Data(format!("Race {}: {}", race.id, e)))?;
        let remaining = ctx
            .calculator
            .window(&race.date)
            .ok()
            .and_then(|w| w.remaining(ctx.now));
        let variable = race
            .variable_driver_id
            .as_ref()
            .map(|id| output::driver_label(&season, Some(id)));
        println!(
            "{}",
            output::format_race_detail(race, &info, remaining, variable.as_deref(), ctx.use_colors)
        );
        return Ok(());
    }

    let lines: Vec<output::StatusLine> = ctx
        .calculator
        .races_oldest_first(&season.races)
        .into_iter()
        .map(|race| {
            let info = ctx
                .calculator
                .betting_info(&race.date, Some(race.status), ctx.now);
            if let Err(e) = &info {
                tracing::warn!(race = race.id, error = %e, "Race has no usable date");
            }
            output::StatusLine { race, info }
        })
        .collect();
    println!("{}", output::format_status_table(&lines, ctx.use_colors));
    Ok(())
}

fn run_bet(
    ctx: &Context,
    user: String,
    race_id: u32,
    args: PickArgs,
    double_points: bool,
) -> Result<(), Failure> {
    let mut season = ctx.load_season()?;
    let picks = build_picks(&season, &args)?;
    let special = ctx.special_driver(&season);

    let submission = BetSubmission {
        user_id: user,
        race_id,
        picks,
        double_points,
    };
    let outcome = betting::submit_bet(&mut season, &ctx.calculator, ctx.now, submission, special.as_ref())?;
    ctx.save_season(&season)?;
    println!("Bet {} for race {}", outcome, race_id);
    Ok(())
}

fn run_result(ctx: &Context, race_id: u32, args: PickArgs) -> Result<(), Failure> {
    let mut season = ctx.load_season()?;
    let picks = build_picks(&season, &args)?;
    let outcome = betting::submit_result(
        &mut season,
        RaceResult {
            race_id,
            picks,
            recorded_at: Some(ctx.now),
        },
    )?;
    ctx.save_season(&season)?;
    println!("Result {} for race {}; race marked finished", outcome, race_id);
    Ok(())
}

fn run_race_status(ctx: &Context, race_id: u32, status: RaceStatus) -> Result<(), Failure> {
    let mut season = ctx.load_season()?;
    let previous = betting::set_race_status(&mut season, race_id, status)?;
    ctx.save_season(&season)?;
    println!("Race {}: {} -> {}", race_id, previous, status);
    Ok(())
}

fn run_variable_driver(ctx: &Context, race_id: u32, driver: Option<String>) -> Result<(), Failure> {
    let mut season = ctx.load_season()?;
    let driver_id = resolve_driver(&season, driver.as_deref())?;
    betting::set_variable_driver(&mut season, race_id, driver_id.clone())?;
    ctx.save_season(&season)?;
    match driver_id {
        Some(id) => println!(
            "Race {}: variable driver is {}",
            race_id,
            output::driver_label(&season, Some(&id))
        ),
        None => println!("Race {}: variable driver cleared", race_id),
    }
    Ok(())
}

fn run_leaderboard(ctx: &Context) -> Result<(), Failure> {
    let season = ctx.load_season()?;
    let policy = ctx.config.scoring().leaderboard_policy();
    let entries = standings::leaderboard(&season, &policy);
    println!("{}", output::format_leaderboard(&entries, ctx.use_colors));
    Ok(())
}

fn run_performance(ctx: &Context, user: &str) -> Result<(), Failure> {
    let season = ctx.load_season()?;
    let policy = ctx.config.scoring().missing_bet_policy();
    let rows = standings::performance(&season, &ctx.calculator, user, &policy)?;
    let summary = standings::summarize(&rows);
    println!("{}", output::format_performance(&rows, &summary, ctx.use_colors));

    if ctx.verbose {
        for row in &rows {
            if let Some(result) = row.score.score_result() {
                println!("\n  {}:", row.race.name);
                println!("{}", output::format_breakdown(result));
            }
        }
    }
    Ok(())
}

fn run_dashboard(ctx: &Context, race_id: u32) -> Result<(), Failure> {
    let season = ctx.load_season()?;
    let policy = ctx.config.scoring().missing_bet_policy();
    let (race, rows) = standings::race_dashboard(&season, race_id, &policy)?;
    println!("{}", output::format_dashboard(&season, race, &rows, ctx.use_colors));
    Ok(())
}

fn run_export(ctx: &Context, path: Option<PathBuf>) -> Result<(), Failure> {
    let season = ctx.load_season()?;
    let policy = ctx.config.scoring().missing_bet_policy();
    let csv = output::export_csv(&season, &ctx.calculator, &policy);

    let today = ctx.now.with_timezone(&ctx.calculator.offset()).date_naive();
    let path = path.unwrap_or_else(|| PathBuf::from(output::default_export_filename(today)));
    output::write_export(&path, &csv).map_err(|e| Failure::Data(format!("{:#}", e)))?;
    tracing::info!(path = %path.display(), "Exported bets");
    println!("Exported to {}", path.display());
    Ok(())
}
