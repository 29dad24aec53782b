//! Terminal front end for Colloquy conversations.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use colloquy::agent::Assistant;
use colloquy::config::ColloquyConfig;
use colloquy::history::MessageRecord;
use colloquy::{build_assistant, build_completion_client, build_llm, open_history};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Command-line options for the Colloquy client.
#[derive(Parser)]
#[command(name = "colloquy", version)]
struct Cli {
    /// Optional path to a colloquy.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Conversation id (defaults to conversation.default_id)
    #[arg(long, short = 'c', global = true)]
    conversation: Option<String>,
    /// Context limit override
    #[arg(long, global = true)]
    context_limit: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question and print the reply
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Interactive chat; `/reset`, `/history` and `/exit` are recognised
    Chat,
    /// Print every stored message of the conversation
    History {
        /// Print the stored records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear the conversation and start over
    Reset,
}

/// Supported slash commands in chat mode.
enum SlashCommand {
    Reset,
    History,
    Exit,
}

impl SlashCommand {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "/reset" => Some(SlashCommand::Reset),
            "/history" => Some(SlashCommand::History),
            "/exit" | "/quit" => Some(SlashCommand::Exit),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colloquy::init_logging();

    let cli = Cli::parse();
    info!(
        "starting colloquy (config_set={}, conversation_set={})",
        cli.config.is_some(),
        cli.conversation.is_some()
    );
    let mut config = load_config(&cli)?;
    if let Some(limit) = cli.context_limit {
        if limit == 0 {
            bail!("--context-limit must be at least 1");
        }
        config.conversation.context_limit = limit;
    }
    let conversation_id = cli
        .conversation
        .clone()
        .unwrap_or_else(|| config.conversation.default_id.clone());
    let history = open_history(&config).context("failed to open conversation history")?;

    match cli.command {
        Command::Ask { question } => {
            let assistant = assistant_for(&config, &history, &conversation_id)?;
            let reply = assistant
                .ask(&question.join(" "))
                .await
                .context("failed to answer question")?;
            println!("{reply}");
        }
        Command::Chat => {
            let assistant = assistant_for(&config, &history, &conversation_id)?;
            run_chat(&assistant).await?;
        }
        Command::History { json } => {
            let records = history
                .open(conversation_id.as_str())
                .context("failed to open conversation")?
                .all_messages()
                .context("failed to load conversation")?;
            print_history(&records, json)?;
        }
        Command::Reset => {
            let message = history
                .reset(&conversation_id)
                .context("failed to reset conversation")?;
            println!("{message}");
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<ColloquyConfig> {
    if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        return ColloquyConfig::load_from_path(path).context("failed to load config");
    }
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let layered = ColloquyConfig::load_layered(&cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

fn assistant_for(
    config: &ColloquyConfig,
    history: &colloquy::history::ConversationStore,
    conversation_id: &str,
) -> anyhow::Result<Assistant> {
    let llm = build_llm(&config.agent).context("failed to build LLM provider")?;
    let client = build_completion_client(&config.agent, llm);
    build_assistant(history, conversation_id, client).context("failed to open conversation")
}

async fn run_chat(assistant: &Assistant) -> anyhow::Result<()> {
    println!(
        "conversation {} (/reset, /history, /exit)",
        assistant.conversation().id()
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match SlashCommand::parse(input) {
            Some(SlashCommand::Exit) => break,
            Some(SlashCommand::Reset) => {
                println!("{}", assistant.reset().context("failed to reset")?);
            }
            Some(SlashCommand::History) => {
                let records = assistant.history().context("failed to load history")?;
                print_history(&records, false)?;
            }
            None => match assistant.ask(input).await {
                Ok(reply) => println!("{reply}"),
                Err(err) => eprintln!("error: {err}"),
            },
        }
    }
    Ok(())
}

fn print_history(records: &[MessageRecord], json: bool) -> anyhow::Result<()> {
    if json {
        let values: Vec<serde_json::Value> = records.iter().map(MessageRecord::to_value).collect();
        let rendered =
            serde_json::to_string_pretty(&values).context("failed to encode history")?;
        println!("{rendered}");
        return Ok(());
    }
    for record in records {
        println!(
            "[{}] {}: {}",
            record.timestamp().to_utc().format("%Y-%m-%d %H:%M:%S"),
            record.role(),
            record.content()
        );
    }
    Ok(())
}
