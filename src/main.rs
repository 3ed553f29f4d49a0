use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rivalz_agents::agents::prompts::STARTUP_BANNER;
use rivalz_agents::display::{notices, user_prompt, Styled};
use rivalz_agents::{AgentRegistry, ChatCompletionsClient, Config, Dispatcher, ToolEnv};

/// Rivalz Agents - triage, on-chain operations and financial analysis in your terminal
#[derive(Parser, Debug)]
#[command(name = "rivalz-agents")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ~/.config/rivalz-agents/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model override
    #[arg(short, long, env = "RIVALZ_MODEL")]
    model: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/rivalz-agents.log")]
    log_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Log to a file so the conversation stays readable
    let log_file = std::fs::File::create(&args.log_file)
        .with_context(|| format!("Failed to create log file: {}", args.log_file.display()))?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rivalz_agents=debug")),
        )
        .with(fmt::layer().with_writer(log_file).with_ansi(false))
        .init();

    // Load .env files (local first, then home directory); both are optional
    let _ = dotenvy::from_filename(".env");
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".env"));
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.llm.model = model;
    }

    let env = ToolEnv::from_config(&config)?;
    let registry = AgentRegistry::standard(&env).context("Failed to build agent registry")?;
    let model = ChatCompletionsClient::from_env(&config.llm)?;
    tracing::info!("Using model {}", model.model());
    let dispatcher = Dispatcher::new(model, registry, config.llm.max_turns);

    println!("{}", STARTUP_BANNER);

    let color = config.ui.color;
    let stdin = io::stdin();
    let mut state = dispatcher.start();
    tracing::info!("Conversation {} started", state.id());

    loop {
        print!("{}", user_prompt(color));
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let input = line.trim_end_matches(['\r', '\n']);

        let (next, response) = dispatcher.turn(state, input).await;
        state = next;

        match response {
            Ok(response) => {
                for notice in notices(&response.messages, &config.ui.system_notice_tools) {
                    println!("{}", Styled { notice, color });
                }
            }
            Err(e) => {
                tracing::error!("Turn failed: {:#}", e);
                eprintln!("Error: {:#}", e);
            }
        }
    }

    tracing::info!(
        "Conversation {} ended after {} messages",
        state.id(),
        state.messages().len()
    );
    Ok(())
}
