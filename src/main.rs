//! Contract Risk - Command Line Entry Point

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contract_risk::services::review::PipelineError;
use contract_risk::storage::ConfigService;
use contract_risk::{AppState, SettingsUpdate};
use contract_risk_core::{
    AnalysisResult, Document, IndemnityRecord, LiabilityRecord, PartyCandidate, PartySelection,
};
use contract_risk_llm::ProviderType;

#[derive(Parser, Debug)]
#[command(
    name = "contract-risk",
    version,
    about = "Party-aware indemnity and liability review"
)]
struct Cli {
    #[arg(long, global = true, help = "Config file (default ~/.contract-risk/config.json)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, global = true, help = "Emit logs as JSON lines on stderr")]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Identify the contracting parties
    Parties { file: PathBuf },
    /// Identify the parties and analyze the contract for one of them
    Analyze {
        file: PathBuf,
        #[arg(long, conflicts_with = "manual", help = "Identified party you represent")]
        represent: Option<String>,
        #[arg(long, help = "Party you represent, if it was not identified")]
        manual: Option<String>,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the active configuration
    Show,
    /// Write the default configuration
    Init,
    /// Change individual settings
    Set(SetArgs),
    /// Restore the default configuration
    Reset,
    /// Send a minimal request to the configured provider
    Check,
}

#[derive(Args, Debug)]
struct SetArgs {
    #[arg(long, help = "gemini or anthropic")]
    provider: Option<ProviderType>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long, help = "Environment variable holding the API key")]
    api_key_env: Option<String>,
    #[arg(long, help = "Endpoint override; an empty value clears it")]
    base_url: Option<String>,
    #[arg(long)]
    max_tokens: Option<u32>,
    #[arg(long)]
    temperature: Option<f32>,
    #[arg(long, help = "Request timeout in seconds")]
    timeout_secs: Option<u64>,
}

impl From<SetArgs> for SettingsUpdate {
    fn from(args: SetArgs) -> Self {
        Self {
            provider: args.provider,
            model: args.model,
            api_key_env: args.api_key_env,
            base_url: args.base_url,
            max_tokens: args.max_tokens,
            temperature: args.temperature,
            request_timeout_secs: args.timeout_secs,
        }
    }
}

fn init_tracing(log_json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contract_risk=info"));
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(fmt).init();
    }
}

/// Strip the diagnostic cause so only the fixed message reaches the user.
fn user_facing(err: PipelineError) -> anyhow::Error {
    anyhow!(err.to_string())
}

fn load_document(path: &Path) -> Result<Document> {
    Document::from_path(path).with_context(|| format!("Cannot read {}", path.display()))
}

/// Match `--represent` against the candidates by display string, legal name or defined term.
fn pick_candidate(candidates: &[String], wanted: &str) -> Result<String> {
    let wanted = wanted.trim();
    if let Some(exact) = candidates.iter().find(|c| c.as_str() == wanted) {
        return Ok(exact.clone());
    }
    candidates
        .iter()
        .find(|c| {
            let parsed = PartyCandidate::parse(c);
            parsed.legal_name.eq_ignore_ascii_case(wanted)
                || parsed
                    .defined_term
                    .as_deref()
                    .is_some_and(|term| term.eq_ignore_ascii_case(wanted))
        })
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "'{}' is not one of the identified parties: {}",
                wanted,
                candidates.join(", ")
            )
        })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("    {}: none", label);
    } else {
        println!("    {}:", label);
        for item in items {
            println!("      - {}", item);
        }
    }
}

fn print_indemnity(record: &IndemnityRecord) {
    println!("  {} ({})", record.party_name, record.claim_type);
    print_list("Scope", &record.scope);
    print_list("Suggested additions", &record.additions);
    print_list("Suggested removals", &record.removals);
    if !record.citations.is_empty() {
        println!("    Citations: {}", record.citations);
    }
}

fn print_liability(record: &LiabilityRecord) {
    println!(
        "  {} (consequential damages waiver: {})",
        record.party_name, record.consequential_damages_status
    );
    print_list("Waiver exclusions", &record.consequential_damages_exclusions);
    if !record.cap_description.is_empty() {
        println!("    Cap: {}", record.cap_description);
    }
    print_list("Cap exclusions", &record.cap_exclusions);
    if !record.citations.is_empty() {
        println!("    Citations: {}", record.citations);
    }
}

fn print_report(represented: &str, counter: &str, result: &AnalysisResult) {
    println!("Representing: {}", represented);
    println!("Counterparty: {}", counter);
    println!();
    println!("INDEMNIFICATION");
    if result.indemnity.is_empty() {
        println!("  No indemnification clauses found.");
    }
    result.indemnity.iter().for_each(print_indemnity);
    println!();
    println!("LIMITATION OF LIABILITY");
    if result.liability.is_empty() {
        println!("  No limitation of liability clauses found.");
    }
    result.liability.iter().for_each(print_liability);
}

async fn run_parties(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let pipeline = state.pipeline()?;
    let candidates = pipeline
        .submit_document(load_document(file)?)
        .await
        .map_err(user_facing)?;

    let parsed: Vec<PartyCandidate> = candidates.iter().map(|c| PartyCandidate::parse(c)).collect();
    if json {
        return print_json(&parsed);
    }
    for candidate in parsed {
        match candidate.defined_term {
            Some(term) => println!("{}  (\"{}\")", candidate.legal_name, term),
            None => println!("{}", candidate.legal_name),
        }
    }
    Ok(())
}

async fn run_analyze(
    state: &AppState,
    file: &Path,
    represent: Option<String>,
    manual: Option<String>,
    json: bool,
) -> Result<()> {
    let pipeline = state.pipeline()?;
    let candidates = pipeline
        .submit_document(load_document(file)?)
        .await
        .map_err(user_facing)?;

    let selection = match (represent, manual) {
        (_, Some(name)) => PartySelection::Manual(name),
        (Some(name), None) => PartySelection::Candidate(pick_candidate(&candidates, &name)?),
        (None, None) => match candidates.first() {
            Some(first) => PartySelection::Candidate(first.clone()),
            None => bail!("No parties to choose from"),
        },
    };

    let result = pipeline
        .confirm_party(selection)
        .await
        .map_err(user_facing)?;

    let snapshot = pipeline.snapshot();
    if json {
        return print_json(&snapshot);
    }
    let parties = snapshot
        .parties
        .ok_or_else(|| anyhow!("Analysis finished without a party pair"))?;
    print_report(&parties.represented, &parties.counter, &result);
    Ok(())
}

async fn run_config(
    config_path: Option<PathBuf>,
    command: ConfigCommands,
    json: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let state = AppState::load(config_path)?;
            if !json {
                println!("# {}", state.config_service().path().display());
            }
            print_json(state.config())
        }
        ConfigCommands::Init => {
            let path = match config_path {
                Some(path) => path,
                None => contract_risk::utils::config_path()?,
            };
            ConfigService::write_default(&path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        ConfigCommands::Set(args) => {
            let update = SettingsUpdate::from(args);
            if update.is_empty() {
                bail!("Nothing to change; pass at least one setting");
            }
            let mut state = AppState::load(config_path)?;
            let updated = state.config_service_mut().update_config(update)?;
            print_json(&updated)
        }
        ConfigCommands::Reset => {
            let mut state = AppState::load(config_path)?;
            state.config_service_mut().reset()?;
            println!(
                "Restored defaults in {}",
                state.config_service().path().display()
            );
            Ok(())
        }
        ConfigCommands::Check => {
            let state = AppState::load(config_path)?;
            let provider = state.provider()?;
            provider
                .health_check()
                .await
                .with_context(|| format!("{} is not reachable", provider.name()))?;
            println!("{} ({}) is reachable", provider.name(), provider.model());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Parties { file } => {
            let state = AppState::load(cli.config)?;
            run_parties(&state, &file, cli.json).await
        }
        Commands::Analyze {
            file,
            represent,
            manual,
        } => {
            let state = AppState::load(cli.config)?;
            run_analyze(&state, &file, represent, manual, cli.json).await
        }
        Commands::Config { command } => run_config(cli.config, command, cli.json).await,
    }
}
