//! `tidechat chat` — Interactive or single-message chat mode.

use std::io::Write as _;
use std::path::PathBuf;

use clap::Args;
use tidechat_client::{HttpChatClient, run_turn};
use tidechat_config::AppConfig;
use tidechat_core::log::ConversationLog;
use tidechat_core::message::{Message, Role};
use tidechat_extract::{PDF_MARKER, TEXT_MARKER};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Debug, Args)]
pub struct ChatOptions {
    /// Send a single message instead of entering interactive mode
    #[arg(short, long)]
    pub message: Option<String>,

    /// Attach a file whose extracted text rides along with the next message (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,

    /// Override the configured temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Override the configured system prompt
    #[arg(long)]
    pub system_prompt: Option<String>,
}

pub async fn run(opts: ChatOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    TIDECHAT_API_KEY = 'sk-...'");
        eprintln!("    DEEPSEEK_API_KEY = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let model = opts.model.unwrap_or_else(|| config.default_model.clone());
    let temperature = opts.temperature.unwrap_or(config.default_temperature);
    let system_prompt = opts
        .system_prompt
        .unwrap_or_else(|| config.system_prompt.clone());

    let client = HttpChatClient::new("deepseek", config.api_url.as_str(), api_key);
    let mut log = ConversationLog::new(config.max_context_messages);

    debug!(model = %model, window = config.max_context_messages, "starting chat session");

    if let Some(message) = opts.message {
        // Single message mode
        let prompt = compose_prompt(&message, &opts.files, config.max_file_chars);

        eprint!("  Thinking...");
        let reply = run_turn(
            &client,
            &mut log,
            &prompt,
            &system_prompt,
            &model,
            temperature,
        )
        .await;
        eprint!("\r              \r");

        let reply = reply?;
        println!("{}", reply.content);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        tidechat — Interactive Mode           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Endpoint:     {}", config.api_url);
    println!("  Model:        {model}");
    println!("  Context:      last {} messages", config.max_context_messages);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Commands: /attach <path>, /history, /clear.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut pending_files: Vec<PathBuf> = opts.files;
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    prompt_marker()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            prompt_marker()?;
            continue;
        }

        // Check for exit commands
        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        if let Some(rest) = line.strip_prefix("/attach") {
            let path = rest.trim();
            if path.is_empty() {
                println!("  Usage: /attach <path>");
            } else {
                pending_files.push(PathBuf::from(path));
                println!("  Queued {path} for the next message.");
            }
            prompt_marker()?;
            continue;
        }

        if line == "/clear" {
            log.clear();
            println!("  Conversation cleared.");
            prompt_marker()?;
            continue;
        }

        if line == "/history" {
            render_history(&log);
            prompt_marker()?;
            continue;
        }

        let prompt = compose_prompt(&line, &pending_files, config.max_file_chars);
        pending_files.clear();

        eprint!("  ...");

        match run_turn(
            &client,
            &mut log,
            &prompt,
            &system_prompt,
            &model,
            temperature,
        )
        .await
        {
            Ok(reply) => {
                eprint!("\r     \r");
                println!();
                for line in reply.content.lines() {
                    println!("  Assistant > {line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        prompt_marker()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

fn prompt_marker() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

/// Combine the typed input with extracted excerpts from the queued files.
fn compose_prompt(input: &str, files: &[PathBuf], max_file_chars: usize) -> String {
    if files.is_empty() {
        return input.to_string();
    }
    let excerpts = tidechat_extract::extract_files(files, max_file_chars);
    if excerpts.is_empty() {
        input.to_string()
    } else {
        format!("{input}\n{excerpts}")
    }
}

fn render_history(log: &ConversationLog) {
    if log.is_empty() {
        println!("  (no messages yet)");
        return;
    }
    println!();
    for message in log.displayed() {
        println!("{}", render_entry(message));
    }
    println!();
}

/// Render one scrollback entry, collapsing file excerpts into a short
/// attachment note instead of dumping their text.
fn render_entry(message: &Message) -> String {
    let who = match message.role {
        Role::User => "You",
        Role::Assistant => "Assistant",
        Role::System => "System",
    };
    let stamp = message.timestamp.format("%H:%M");
    let (text, attachments) = split_attachments(&message.content);

    let shown = if text.is_empty() && attachments > 0 {
        "(attached files)".to_string()
    } else {
        text
    };

    let mut lines = shown.lines();
    let mut out = match lines.next() {
        Some(first) => format!("  [{stamp}] {who} > {first}"),
        None => format!("  [{stamp}] {who} >"),
    };
    for line in lines {
        out.push_str("\n          ");
        out.push_str(line);
    }
    if attachments > 0 {
        out.push_str(&format!("\n          [{attachments} file excerpt(s) attached]"));
    }
    out
}

/// Split message content into the typed text and the number of embedded
/// file excerpts (everything from the first provenance marker onward).
fn split_attachments(content: &str) -> (String, usize) {
    let count = content.matches(PDF_MARKER).count() + content.matches(TEXT_MARKER).count();
    let first = [content.find(PDF_MARKER), content.find(TEXT_MARKER)]
        .into_iter()
        .flatten()
        .min();
    match first {
        Some(idx) => (content[..idx].trim_end().to_string(), count),
        None => (content.to_string(), 0),
    }
}
