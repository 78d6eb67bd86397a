use anyhow::Context;
use std::fs;
use survey_contract::{
    config::{Config, ReportFormat},
    precheck, TransactionProposal, Validator, Verdict,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// The main entry point for the survey validator.
///
/// Usage: `survey-validator <proposal.json> [config.toml]`
///
/// Loads the configuration, initializes logging, decodes the proposal,
/// optionally runs the caller-side prechecks and then validates it.
/// The verdict is printed to stdout; a rejection exits with status 1.
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let proposal_path = args
        .next()
        .context("usage: survey-validator <proposal.json> [config.toml]")?;
    let config_path = args.next().unwrap_or_else(|| "config/default.toml".to_string());

    let config = Config::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();
    info!("Survey validator starting with config: {:?}", config);

    let content = fs::read_to_string(&proposal_path)
        .with_context(|| format!("reading proposal {}", proposal_path))?;
    let proposal = TransactionProposal::from_json(&content)
        .with_context(|| format!("decoding proposal {}", proposal_path))?;
    let proposal_id = proposal.id()?;
    info!("Validating proposal {:?} from {}", proposal_id, proposal_path);

    if config.report.run_prechecks {
        if let Err(e) = precheck::check_proposal(&proposal) {
            warn!("Proposal {:?} failed precheck: {}", proposal_id, e);
            anyhow::bail!("precheck failed: {}", e);
        }
    }

    let result = Validator::new().validate(&proposal);
    let verdict = Verdict::new(
        proposal_id,
        config.node.legal_name.as_str(),
        &result,
        chrono::Utc::now().timestamp(),
    );

    match config.report.format {
        ReportFormat::Text => println!("{}", verdict),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
    }

    if !verdict.is_accepted() {
        std::process::exit(1);
    }
    Ok(())
}
