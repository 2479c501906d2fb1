//! research: one-shot CLI for the research assistant.
//! Reads config, sends a query (argument or first stdin line) to
//! `POST {endpoint}/research`, prints the structured result to stdout.

use anyhow::{bail, Context};
use clap::Parser;
use log::{debug, info};
use research_client::config;
use research_client::{Client, MessageKind, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line options for the one-shot client.
#[derive(Parser, Debug)]
#[command(name = "research", version)]
#[command(about = "Send a research query to the research assistant backend")]
struct Cli {
    /// Path to a config.yaml (defaults to $RESEARCH_UI_CONFIG or ~/.research-ui/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backend base URL, overriding the configured endpoint
    #[arg(long)]
    endpoint: Option<String>,
    /// Probe the backend with `GET /` instead of sending a query
    #[arg(long)]
    health: bool,
    /// Research query; read from stdin when omitted
    query: Option<String>,
}

fn main() -> ExitCode {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let location = config::resolve_config_path(cli.config.as_deref())?;
    let cfg = config::load_or_default(&location).with_context(|| {
        format!("failed to load config from {}", location.path.display())
    })?;
    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| cfg.endpoint().to_string());
    info!("using endpoint {}", endpoint);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    let client = Client::new(&endpoint);

    if cli.health {
        let status = rt.block_on(client.health())?;
        let mut out = io::stdout().lock();
        writeln!(out, "{}: {}", status.status, status.message.unwrap_or_default())?;
        return Ok(ExitCode::SUCCESS);
    }

    let query = match cli.query {
        Some(q) => q,
        None => read_stdin_line()?,
    };
    if query.trim().is_empty() {
        bail!("no query provided (pass it as an argument or on stdin)");
    }

    let mut session = Session::new(&endpoint);
    rt.block_on(session.submit(&client, &query));

    let Some(last) = session.messages().last() else {
        bail!("no response recorded");
    };
    debug!("request settled (message_id={})", last.id);
    match &last.kind {
        MessageKind::Result(response) => {
            let mut out = io::stdout().lock();
            write!(out, "{}", response.to_plain_text())?;
            writeln!(
                out,
                "\n({}s)",
                session.stats().last_elapsed_label()
            )?;
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        MessageKind::Error(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        other => bail!("unexpected final message: {other:?}"),
    }
}

fn read_stdin_line() -> anyhow::Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read query from stdin")?;
    Ok(line.trim().to_string())
}
