mod app;
mod render;
mod stats;
mod theme;

use app::{App, AppAction, GameOptions};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use stats::StatsManager;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use switches_core::{PuzzleConfig, PuzzleSeeds, SwitchModule, DEFAULT_RULE_SEED};

/// Flip switches from a start arrangement to the goal without ever passing
/// through a forbidden one.
#[derive(Parser)]
#[command(name = "switches")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Rule seed shared with the manual
    #[arg(long, default_value_t = DEFAULT_RULE_SEED, allow_negative_numbers = true, global = true)]
    rule_seed: i32,

    /// Instance seed for the first puzzle (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of forbidden configurations
    #[arg(long, default_value_t = PuzzleConfig::classic().forbidden_count, global = true)]
    forbidden: usize,

    /// Draw a new random rule seed for every puzzle
    #[arg(long, conflicts_with = "rule_seed", global = true)]
    random_rules: bool,

    /// Where to write the log while playing
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal (default)
    Play,
    /// Print the manual page, goal and a solution, then exit
    Describe,
}

impl Cli {
    fn options(&self) -> GameOptions {
        GameOptions {
            rule_seed: self.rule_seed,
            random_rules: self.random_rules,
            instance_seed: self.seed,
            config: PuzzleConfig::with_forbidden(self.forbidden),
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let options = cli.options();

    match cli.command {
        Some(Commands::Describe) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            describe(options)
        }
        Some(Commands::Play) | None => {
            init_file_logging(cli.log_file);
            play(options)
        }
    }
}

/// Log to a file so output never lands on the alternate screen
fn init_file_logging(path: Option<PathBuf>) {
    let path = path.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("switches.log")
    });
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.target(env_logger::Target::Pipe(Box::new(io::sink())));
        }
    }
    builder.init();
}

fn describe(options: GameOptions) -> io::Result<()> {
    let seeds = PuzzleSeeds {
        rule_seed: options.rule_seed,
        instance_seed: options
            .instance_seed
            .unwrap_or_else(switches_core::SimpleRng::entropy_seed),
    };
    let module = SwitchModule::from_seeds(seeds, &options.config, 1)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let flips = module
        .solve()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    let mut out = io::stdout().lock();
    writeln!(out, "Rule seed {}, instance seed {}", seeds.rule_seed, seeds.instance_seed)?;
    writeln!(out, "Forbidden configurations:")?;
    for config in module.forbidden_set().iter() {
        writeln!(out, "  {:>2}  {}", config.value(), config)?;
    }
    writeln!(out, "Goal:    {}", module.goal_configuration())?;
    writeln!(out, "Initial: {}", module.current_configuration())?;
    let numbers: Vec<String> = flips.iter().map(|i| (i + 1).to_string()).collect();
    writeln!(out, "Solution: flip {}", numbers.join(" "))?;
    Ok(())
}

fn play(options: GameOptions) -> io::Result<()> {
    let mut app = match App::new(options, StatsManager::load()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(());
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.tick_rate();

        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
