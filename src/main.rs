use std::process::ExitCode;

use arena_core::{ClientEvent, EventReceiver, Route, TransportError};
use arena_impls::{FileStorage, ReqwestTransport};
use clap::Parser;
use colored::Colorize;
use commands::{App, Command};
use config::ConfigError;
use log::{debug, error, info};
use thiserror::Error;
use tokio::runtime::{self, Runtime};

mod commands;
mod config;
mod logging;
mod prompt;

/// Command-line client for the tournament arena
#[derive(Debug, Parser)]
#[command(version, about)]
struct Opt {
    /// Log requests and session changes
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

struct Cli {
    app: App,
    events: EventReceiver,
    runtime: Runtime,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Could not load config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Cli {
    fn new() -> Result<Self, CliError> {
        let config = config::load()?;

        debug!("Building async runtime...");
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .thread_name("arena-async")
            .build()
            .map_err(|e| CliError::Fatal(e.to_string()))?;

        let transport = ReqwestTransport::new(&config.api_url)?;
        let storage = FileStorage::open(&config.storage_path);

        info!("Using {}", config.api_url);
        let (app, events) = App::new(transport, storage, config);

        Ok(Self {
            app,
            events,
            runtime,
        })
    }

    fn run(&self, command: Command) -> anyhow::Result<()> {
        let result = self.runtime.block_on(commands::exec(command, &self.app));
        self.check_events();

        result
    }

    /// Tells the user where the front-end would have gone
    fn check_events(&self) {
        for event in self.events.try_iter() {
            debug!("{:?}", event);

            match event {
                ClientEvent::Navigate(Route::Login) => {
                    println!(
                        "{}",
                        "Your session is no longer valid. Run `arena login` to log in again."
                            .yellow()
                    );
                }
                ClientEvent::Navigate(Route::Tournaments) => {
                    println!("Run `arena tournaments` to see what's on.");
                }
                ClientEvent::Navigate(Route::Tournament(id)) => {
                    println!("Run `arena show {}` to see it.", id);
                }
                ClientEvent::Navigate(_) | ClientEvent::SessionChanged { .. } => {}
            }
        }
    }
}

impl CliError {
    fn hint(&self) -> String {
        match self {
            CliError::Config(_) => "Check the file given by ARENA_CONFIG, or ./arena.ron. Every field is optional.".to_string(),
            CliError::Transport(_) => "The API url must be absolute, like http://localhost:8000/api. Check api_url in the config, or ARENA_API_URL.".to_string(),
            CliError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    logging::init_logger(opt.verbose);

    let cli = match Cli::new() {
        Ok(cli) => cli,
        Err(error) => {
            error!("{}", "Arena failed to start!".bold().red());
            error!("{}", error);
            error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());

            return ExitCode::FAILURE;
        }
    };

    match cli.run(opt.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {}", "error:".red().bold(), error);
            ExitCode::FAILURE
        }
    }
}
