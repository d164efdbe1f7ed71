use std::fs::{self, File};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use elfchat_core::{connect, Config, Conversation, PersonaConfig, Provider};
use tracing_subscriber::{EnvFilter, fmt};

mod app;
mod handler;
mod surface;
mod tui;
mod ui;

use app::App;
use surface::{ConsoleSurface, TuiSurface};
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "elfchat")]
#[command(version, about = "Chat with Frieren, the elf mage, in your terminal")]
struct Cli {
    /// Model provider: gemini, ollama, claude or openai
    #[arg(short, long)]
    provider: Option<String>,
    /// Model to use (defaults to the provider's default)
    #[arg(short, long)]
    model: Option<String>,
    /// Milliseconds between revealed characters
    #[arg(long)]
    speed_ms: Option<u64>,
    /// Save the chosen provider and model as defaults
    #[arg(long)]
    save: bool,
    /// Send one message, print the reply and exit
    #[arg(long, value_name = "TEXT")]
    once: Option<String>,
    /// List providers and their known models, then exit
    #[arg(long)]
    list_providers: bool,
}

/// Log to a file; stdout and stderr belong to the terminal UI.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let Some(dir) = dirs::data_local_dir().map(|d| d.join("elfchat")) else {
            return;
        };
        if fs::create_dir_all(&dir).is_err() {
            return;
        }
        let Ok(file) = File::options().create(true).append(true).open(dir.join("elfchat.log")) else {
            return;
        };

        let filter = EnvFilter::try_from_env("ELFCHAT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_level(true)
            .init();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if cli.list_providers {
        list_providers();
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not read config, using defaults");
        Config::new()
    });

    let provider = match cli.provider.as_deref() {
        Some(name) => Provider::from_str(name).ok_or_else(|| {
            anyhow!(
                "unknown provider '{}' (expected one of: {})",
                name,
                Provider::all().iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
            )
        })?,
        None => config.provider(),
    };
    let model = cli.model.clone().unwrap_or_else(|| config.model_for(provider));
    let speed = cli
        .speed_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.reveal_speed());

    if cli.save {
        Config::save_defaults(provider, &model)?;
        tracing::info!(%provider, %model, "saved defaults");
    }

    tracing::info!(%provider, %model, "starting elfchat");
    let client = connect(provider, &config, PersonaConfig::new(model));
    let mut conversation = Conversation::new(client);

    if let Some(text) = cli.once {
        let mut surface = ConsoleSurface::stdout(speed);
        if conversation.converse(&mut surface, &text).await.is_none() {
            return Err(anyhow!("nothing to send"));
        }
        return Ok(());
    }

    run_tui(conversation, speed).await
}

fn list_providers() {
    for provider in Provider::all() {
        let key = provider
            .api_key_env()
            .map(|var| format!(" (key: {var})"))
            .unwrap_or_default();
        println!("{:<8} {}{}", provider.as_str(), provider.display_name(), key);
        for model in provider.known_models() {
            let marker = if model == provider.default_model() { "*" } else { " " };
            println!("  {marker} {model}");
        }
    }
}

async fn run_tui(conversation: Conversation, speed: Duration) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let surface = TuiSurface::new(events.sender(), speed);
    let mut app = App::new(conversation, surface);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event)?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("session ended");
    result
}
