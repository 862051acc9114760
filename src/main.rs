//! LeaseBot - chat with your rental agreement
//!
//! Without a subcommand, starts a line-based chat loop; `analyze` prints a
//! one-shot report.

use clap::Parser;
use leasebot::{
    agent::{commands, router, Command as ChatCommand, Session},
    analysis::{Analysis, AnalysisPipeline},
    config::AppConfig,
    log_error, log_info, logging,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Analyze one agreement and print a report
    Analyze {
        /// PDF, image or .txt file
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "leasebot")]
#[command(author = "LeaseBot Contributors")]
#[command(version)]
#[command(about = "Chat with your rental agreement", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    /// Configuration file path (overrides defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip summarization
    #[arg(long, global = true)]
    no_summary: bool,

    /// Agreement to upload when the chat starts
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::load(args.config.as_deref())?;
    if args.no_summary {
        app_config.summarize = false;
    }

    let chat_mode = args.command.is_none();
    init_logging(args.verbose, chat_mode, app_config.debug);

    if app_config.summarize {
        tracing::info!(
            "Summarizing with {} at {}",
            app_config.summarizer.model,
            app_config.summarizer.url
        );
    }
    let pipeline = AnalysisPipeline::from_config(&app_config)?;

    match args.command {
        Some(Command::Analyze { file, json }) => run_analyze(pipeline, &file, json).await,
        None => run_chat(pipeline, args.file).await,
    }
}

/// Initialize logging
fn init_logging(verbose: bool, chat_mode: bool, debug_mode: bool) {
    let filter = if verbose || debug_mode {
        "leasebot=debug,info"
    } else {
        "leasebot=info,warn"
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    // In chat mode, log to file so output does not interleave with the transcript
    if chat_mode {
        if let Err(e) = logging::init_logger() {
            eprintln!("Could not open log file: {}", e);
            return;
        }
        logging::set_debug_mode(verbose || debug_mode);

        if let Some(file) = logging::tracing_writer() {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        return;
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// One-shot analysis
async fn run_analyze(pipeline: AnalysisPipeline, file: &Path, json: bool) -> anyhow::Result<()> {
    let analysis = pipeline
        .analyze_file(file, |message| eprintln!("{}...", message))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis.report_json())?);
    } else {
        print_report(&analysis);
    }
    Ok(())
}

fn print_report(analysis: &Analysis) {
    match analysis.page_count {
        Some(pages) => println!("Document: {} ({} pages)", analysis.source.display(), pages),
        None => println!("Document: {}", analysis.source.display()),
    }

    println!("\nKey Terms:");
    for (label, value) in analysis.key_terms.entries() {
        println!("  {}: {}", label, value);
    }

    println!("\n{}", router::format_risks(analysis));

    println!("\nSummary:");
    println!(
        "{}",
        analysis.summary.as_deref().unwrap_or(router::SUMMARY_DISABLED)
    );
}

/// Interactive chat loop over stdin
async fn run_chat(pipeline: AnalysisPipeline, initial: Option<PathBuf>) -> anyhow::Result<()> {
    let (mut session, mut events) = Session::new(Arc::new(pipeline));
    log_info!(
        "Chat started (summarization {})",
        if session.summarization_enabled() { "on" } else { "off" }
    );

    println!("LeaseBot - ask about Rent, Deposit, Notice Period, Risks or the Summary.");
    println!("Type /upload <path> to analyze an agreement, /help for commands.");
    println!("Logs: {}", logging::get_log_path_display());

    if let Some(path) = initial {
        upload(&mut session, path);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                if input.is_empty() {
                    prompt();
                    continue;
                }

                if commands::is_slash_command(input) {
                    match commands::parse(input) {
                        Ok(ChatCommand::Upload(path)) => upload(&mut session, path),
                        Ok(ChatCommand::Shortcut(route)) => {
                            println!("{}", session.answer(route.keyword()))
                        }
                        Ok(ChatCommand::Help) => {
                            println!("{}", router::HELP);
                            println!("{}", commands::help_text());
                        }
                        Ok(ChatCommand::Quit) => break,
                        Err(message) => println!("{}", message),
                    }
                } else {
                    println!("{}", session.answer(input));
                }
                prompt();
            }
            Some(event) = events.recv() => {
                if let Some(text) = session.apply_event(event) {
                    println!("\n{}", text);
                    prompt();
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    log_info!("Chat ended");
    Ok(())
}

fn upload(session: &mut Session, path: PathBuf) {
    match session.request_upload(&path) {
        Ok(task_id) => {
            log_info!("Upload {} started for {:?}", task_id, path);
            println!("Analyzing {}...", path.display());
        }
        Err(rejected) => {
            log_error!("{}", rejected);
            println!("{}", rejected);
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
