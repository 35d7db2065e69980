use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use keyloop::app::{App, DEFAULT_STATS_TOP, DrillMode, PreparedDrill};
use keyloop::config::Config;
use keyloop::error::TrainerError;
use keyloop::event::{AppEvent, EventHandler, drill_event};
use keyloop::logging;
use keyloop::session::drill::{DrillState, reduce};
use keyloop::session::ingest::IngestOutcome;
use keyloop::store::{DocumentStore, JsonStore, default_data_dir};
use keyloop::ui::components::progress_bar::ProgressBar;
use keyloop::ui::components::status_bar::StatusBar;
use keyloop::ui::components::typing_area::TypingArea;
use keyloop::ui::layout::DrillLayout;

#[derive(Parser)]
#[command(
    name = "keyloop",
    version,
    about = "Terminal touch-typing trainer that drills your slowest trigrams"
)]
struct Cli {
    #[arg(long, global = true, help = "Seed for generated drills")]
    seed: Option<u64>,

    #[arg(long, global = true, help = "Directory for stats, session log and log file")]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Log level (error, warn, info, debug, trace)")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type lines from a file ("-" for stdin)
    Text {
        file: String,
        #[arg(
            short,
            long,
            default_value_t = -1,
            allow_hyphen_values = true,
            help = "First line to type; negative resumes after the last session"
        )]
        offset: i64,
        #[arg(short = 'l', long, help = "Minimum characters per drill, 0 for the whole file")]
        min_length: Option<usize>,
    },
    /// Type random words from a word list
    Words {
        #[arg(short, long, help = "Word list, one word per line")]
        file: Option<String>,
        #[arg(short = 'n', long, help = "Number of words")]
        count: Option<usize>,
    },
    /// Type text generated from your hardest trigrams
    #[command(alias = "markov")]
    Random {
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Loop over your single weakest trigram
    Weakest {
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Show totals and the hardest trigrams
    Stats {
        #[arg(short = 'n', long, default_value_t = DEFAULT_STATS_TOP)]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()
        .with_context(|| format!("reading {}", Config::config_path().display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate();

    let data_dir = config.data_dir.clone().unwrap_or_else(default_data_dir);
    let _log_guard = logging::init_logging(&config.log_level, &data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    let store = JsonStore::with_base_dir(data_dir)?;

    let mode = match cli.command {
        Command::Stats { top } => {
            let app = App::new(config, store, cli.seed);
            print!("{}", app.stats_report(top)?);
            return Ok(());
        }
        Command::Text {
            file,
            offset,
            min_length,
        } => DrillMode::Text {
            source: file,
            offset: usize::try_from(offset).ok(),
            min_length: min_length.unwrap_or(config.text_min_length),
        },
        Command::Words { file, count } => DrillMode::Words {
            source: file.unwrap_or_else(|| config.words_file.clone()),
            count: count.unwrap_or(config.words_count),
        },
        Command::Random { length } => DrillMode::Markov {
            length: length.unwrap_or(config.markov_length),
        },
        Command::Weakest { length } => DrillMode::Weakest {
            length: length.unwrap_or(config.weakest_length),
        },
    };

    let mut app = App::new(config, store, cli.seed);
    let prepared = match app.prepare(mode) {
        Ok(prepared) => prepared,
        Err(err @ TrainerError::InsufficientData { .. }) => {
            println!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let drill = run_in_terminal(&app, &prepared)?;
    let report = app.finish(&prepared, &drill, Utc::now())?;

    println!("{}", report.record.summary());
    if report.outcome == IngestOutcome::Skipped {
        println!("Session too short, stats not saved");
    }
    if let Some(lines) = report.lines_typed {
        println!("Lines typed: {lines}");
    }
    Ok(())
}

fn run_in_terminal<S: DocumentStore>(app: &App<S>, prepared: &PreparedDrill) -> Result<DrillState> {
    let average_wpm = app.average_wpm()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_drill(&mut terminal, app, prepared, average_wpm, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_drill<S: DocumentStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &App<S>,
    prepared: &PreparedDrill,
    average_wpm: Option<f64>,
    events: &EventHandler,
) -> Result<DrillState> {
    let mut drill = DrillState::new(&prepared.text);
    loop {
        let now = Utc::now();
        terminal.draw(|frame| render(frame, app, prepared, &drill, average_wpm, now))?;

        match events.next()? {
            AppEvent::Key(key) => {
                let Some(event) = drill_event(key) else {
                    continue;
                };
                let (next, effects) = reduce(drill, event, Utc::now());
                drill = next;
                if !effects.is_empty() {
                    return Ok(drill);
                }
            }
            AppEvent::Tick | AppEvent::Resize => {}
        }
    }
}

fn render<S: DocumentStore>(
    frame: &mut Frame,
    app: &App<S>,
    prepared: &PreparedDrill,
    drill: &DrillState,
    average_wpm: Option<f64>,
    now: DateTime<Utc>,
) {
    let theme = &app.theme;
    let layout = DrillLayout::new(frame.area());
    let wpm = drill.recent_wpm(now);

    frame.render_widget(
        StatusBar {
            title: prepared.mode.title(),
            elapsed_secs: drill.started_at.map(|_| drill.elapsed_secs(now)),
            wpm,
            typos: drill.typos,
            theme,
        },
        layout.header,
    );
    frame.render_widget(TypingArea::new(drill, theme), layout.main);

    // Average speed sits in the middle of the gauge; 90% of it counts as keeping up.
    let speed = match average_wpm {
        Some(avg) if avg > 0.0 && wpm > 0.0 => {
            let fill = if wpm >= avg * 0.9 {
                theme.colors.bar_fast()
            } else {
                theme.colors.bar_slow()
            };
            ProgressBar::new("Speed", wpm / avg / 2.0, theme)
                .caption(format!("{wpm:.0} / {avg:.0} wpm"))
                .fill(fill)
        }
        _ => ProgressBar::new("Speed", 0.0, theme).caption(format!("{wpm:.0} wpm")),
    };
    frame.render_widget(speed, layout.speed);
    frame.render_widget(
        ProgressBar::new("Progress", drill.progress(), theme),
        layout.progress,
    );
}
