use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use ethos_core::{
    describe_outcome, init_logging, parse_command_line, render_screen, CommandParseError, Console,
    EthosConfig, FacilitationFlow, LogFormat, Reply,
};
use ethos_remote::{SubmissionOutcome, Submitter};
use ethos_report::render_text;
use ethos_scenario::ScenarioCatalog;
use ethos_session::resume_step;
use ethos_store::{FileStore, Persistence};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Parser, Debug)]
#[command(name = "ethos", version, about = "Future Ethics decision exercise for newsroom teams")]
struct Cli {
    /// TOML config file (default: ./ethos.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the saved session
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Scenario catalog path or URL
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Work through the exercise interactively (default)
    Play,
    /// Show the saved session and where it would resume
    Status,
    /// List the scenarios in the catalog
    Scenarios,
    /// Write the HTML report for the saved session
    Export {
        /// Output file or directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete the saved session
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EthosConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.storage_dir {
        config = config.with_storage_dir(dir);
    }
    if let Some(catalog) = cli.catalog {
        config = config.with_catalog(catalog);
    }
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }
    init_logging(&config.log_level, cli.log_format)?;
    tracing::debug!(?config, "configuration loaded");

    let persistence = Persistence::new(FileStore::new(&config.storage_dir));

    if let Some(Commands::Reset { yes }) = cli.command {
        if yes || confirm("Clear all saved progress and start fresh?")? {
            if persistence.clear() {
                println!("Saved session cleared.");
            } else {
                bail!("could not clear the saved session in {}", config.storage_dir.display());
            }
        }
        return Ok(());
    }

    let source = config.catalog_source();
    let catalog = ScenarioCatalog::load(&source)
        .await
        .with_context(|| {
            format!(
                "could not load scenarios from {source}; \
                 check the catalog setting and try again"
            )
        })?;

    let mut submitter = Submitter::from_config(config.remote_config())?;
    let events = submitter.subscribe();
    let flow = FacilitationFlow::open(catalog, persistence, submitter);

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => play(Console::new(flow, "."), events).await,
        Commands::Status => {
            let session = flow.session();
            match session.team() {
                Some(team) => println!(
                    "Team '{team}' resumes at the {} step.",
                    resume_step(session)
                ),
                None => println!("No saved session."),
            }
            if let Ok(summary) = render_text(session) {
                println!("\n{summary}");
            }
            Ok(())
        }
        Commands::Scenarios => {
            for (i, scenario) in flow.catalog().iter().enumerate() {
                println!("{:>2}. {}", i + 1, scenario.title);
            }
            Ok(())
        }
        Commands::Export { out } => {
            let console = Console::new(flow, ".");
            let path = console.export(out.as_deref(), Local::now().date_naive())?;
            println!("Report written to {}", path.display());
            Ok(())
        }
        Commands::Reset { .. } => Ok(()),
    }
}

async fn play(
    mut console: Console,
    mut events: UnboundedReceiver<SubmissionOutcome>,
) -> Result<()> {
    println!("{}", console.greeting());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&format!("{}>", console.flow().step()))?;
        let Some(line) = lines.next_line().await.context("reading input")? else {
            break;
        };

        match parse_command_line(&line) {
            Err(CommandParseError::Empty) => {}
            Err(e) => println!("{e}"),
            Ok(command) => match console.execute(command, Local::now().date_naive()) {
                Ok(Reply::Show(text)) => println!("{text}"),
                Ok(Reply::ConfirmRestart) => {
                    prompt("Start a new session? This will clear the current team's data. [y/N]")?;
                    let answer = lines.next_line().await.context("reading confirmation")?;
                    if answer.as_deref().is_some_and(is_yes) {
                        println!("{}", console.confirm_restart());
                    }
                }
                Ok(Reply::Quit) => break,
                Err(e) if e.is_blank_input() => {}
                Err(e) if e.is_recoverable() => println!("{e}"),
                Err(e) => println!("Error: {e}"),
            },
        }

        while let Ok(outcome) = events.try_recv() {
            if let Some(message) = describe_outcome(&outcome) {
                println!("{message}");
            }
        }
    }

    // Outcomes also arrive on `events`; only wait here.
    let _ = console.drain().await;
    while let Ok(outcome) = events.try_recv() {
        if let Some(message) = describe_outcome(&outcome) {
            println!("{message}");
        }
    }
    Ok(())
}

fn prompt(text: &str) -> Result<()> {
    print!("{text} ");
    std::io::stdout().flush().context("writing prompt")
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Blocking yes/no question, for one-shot subcommands only
fn confirm(question: &str) -> Result<bool> {
    prompt(&format!("{question} [y/N]"))?;
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).context("reading confirmation")? == 0 {
        bail!("no confirmation given");
    }
    Ok(is_yes(&answer))
}
