pub mod render;
pub mod settings;

use std::{path::PathBuf, rc::Rc, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use render::{process_render_command, RenderCommand};
use settings::{process_settings_command, SettingsCommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    host::{shutdown::detect_shutdown, terminal, ReminderHost},
    settings::{file::JsonFileSettings, watch::SettingsWatcher},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, SETTINGS_FILE},
        logging::{enable_logging, CLI_PREFIX, HOST_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "health-reminder", version, long_about = None)]
#[command(about = "Reminds you to stand up and drink water", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default $XDG_STATE_HOME/health-reminder or $HOME/.local/state/health-reminder"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long = "settings",
        global = true,
        help = "Settings file. By default settings.json in the application directory"
    )]
    settings_file: Option<PathBuf>,
    #[arg(long = "log", global = true, help = "Log level, for example debug or trace")]
    log: Option<LevelFilter>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console", global = true)]
    log_console: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Start a reminder session in this terminal")]
    Run {},
    #[command(about = "Inspect or change reminder settings")]
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    #[command(about = "Write the HTML document of a reminder modal")]
    Render {
        #[command(flatten)]
        command: RenderCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args.dir.map_or_else(create_application_default_path, Ok)?;
    let settings_path = args
        .settings_file
        .unwrap_or_else(|| app_dir.join(SETTINGS_FILE));
    let prefix = match args.commands {
        Commands::Run {} => HOST_PREFIX,
        _ => CLI_PREFIX,
    };
    enable_logging(prefix, &app_dir.join("logs"), args.log, args.log_console)?;

    let settings = JsonFileSettings::new(settings_path);
    match args.commands {
        Commands::Run {} => run_session(settings).await,
        Commands::Settings { command } => process_settings_command(command, &settings),
        Commands::Render { command } => process_render_command(command, &settings),
    }
}

/// Runs the reminder host until `quit`, end of input or Ctrl-C.
async fn run_session(settings: JsonFileSettings) -> Result<()> {
    info!("Starting session with settings {:?}", settings.path());
    let (_watcher, settings_changes) = SettingsWatcher::new(settings.path())?.into_parts();

    let shutdown = CancellationToken::new();
    tokio::spawn(detect_shutdown(shutdown.clone()));

    let inputs = terminal::spawn_stdin_reader();
    let mut host = ReminderHost::new(
        Rc::new(settings),
        Arc::new(DefaultClock),
        terminal::TerminalUi::stdout(),
    );
    let result = host.run(inputs, settings_changes, shutdown.clone()).await;
    shutdown.cancel();
    result
}
