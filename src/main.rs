use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;

use raven_recovery::config::RecoveryConfig;
use raven_recovery::executor::SystemExecutor;
use raven_recovery::input::{self, Input};
use raven_recovery::logging;
use raven_recovery::nav::{NavOptions, Navigator};
use raven_recovery::partitions::Partitions;
use raven_recovery::status::StatusPoller;
use raven_recovery::tick::{Scheduler, TaskId, TickClock, Ticker};
use raven_recovery::ui;

#[derive(Parser)]
#[command(name = "raven-recovery")]
#[command(author = "RavenLinux Team")]
#[command(version = "0.1.0")]
#[command(about = "RavenLinux recovery menu", long_about = None)]
struct Cli {
    /// Configuration file (default: /etc/raven/recovery.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Never mount or unmount partitions (development hosts)
    #[arg(long)]
    no_unmount: bool,

    /// Directory opened by "Execute script"
    #[arg(long)]
    browse_root: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(RecoveryConfig::locate);
    let mut config = match &config_path {
        Some(path) => RecoveryConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => RecoveryConfig::default(),
    };
    if cli.no_unmount {
        config.general.skip_unmount = true;
    }
    if let Some(root) = cli.browse_root {
        config.general.browse_root = root;
    }
    if cli.verbose {
        config.general.log_level = "debug".to_string();
    }

    let _guard = logging::init(&config);
    tracing::info!("raven-recovery starting");
    match &config_path {
        Some(path) => tracing::info!("Loaded configuration from {}", path.display()),
        None => tracing::info!("Using default configuration"),
    }

    let partitions = Partitions::new(config.partitions.clone());
    if config.general.skip_unmount {
        tracing::warn!("skip_unmount is set: partitions will not be mounted or unmounted");
    } else {
        partitions.mount_all();
    }

    let result = run(config, partitions);
    if let Err(e) = &result {
        tracing::error!("Recovery menu failed: {:#}", e);
    }
    result
}

/// Recovery menu state owned by the UI loop
struct App {
    clock: TickClock,
    scheduler: Scheduler,
    status_task: TaskId,
    status: StatusPoller,
    navigator: Navigator,
    executor: SystemExecutor,
    poll_timeout: Duration,
    running: bool,
}

impl App {
    fn new(config: &RecoveryConfig, partitions: Partitions, clock: TickClock) -> Self {
        let mut scheduler = Scheduler::new();
        let status_task = scheduler.add(config.timing.status_interval_ms);

        Self {
            clock,
            scheduler,
            status_task,
            status: StatusPoller::new(&config.status.path),
            navigator: Navigator::new(NavOptions {
                browse_root: config.general.browse_root.clone(),
                list: config.general.list_options(),
                skip_unmount: config.general.skip_unmount,
                result_display_ms: config.timing.result_display_ms,
            }),
            executor: SystemExecutor::new(config.commands.clone(), partitions),
            poll_timeout: Duration::from_millis(config.timing.tick_ms.max(1)),
            running: true,
        }
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while self.running {
            let now = self.clock.now_ms();
            for task in self.scheduler.due(now) {
                if task == self.status_task {
                    self.status.poll(now);
                }
            }
            self.navigator.tick(now);

            let status_text = self.status.display();
            terminal.draw(|f| ui::draw(f, &self.navigator, status_text.as_deref()))?;

            // Progress message is on screen; now do the blocking part.
            if self.navigator.has_pending() {
                self.navigator.run_pending(&mut self.executor, &self.clock);
                continue;
            }

            if event::poll(self.poll_timeout)? {
                if let Event::Key(key) = event::read()? {
                    match input::translate(key) {
                        Some(Input::Quit) => self.running = false,
                        Some(Input::Nav(key)) => {
                            self.navigator.handle_key(key, self.clock.now_ms())
                        }
                        None => {}
                    }
                }
            }
        }
        Ok(())
    }
}

fn run(config: RecoveryConfig, partitions: Partitions) -> Result<()> {
    let clock = TickClock::new();
    let _ticker = Ticker::spawn(clock.clone(), config.timing.tick_ms)
        .context("Failed to start tick thread")?;

    let mut app = App::new(&config, partitions, clock);

    // Initialize terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let outcome = app.run_loop(&mut terminal);

    // Cleanup
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    outcome
}
