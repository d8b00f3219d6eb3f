//! CLI entrypoint for star-chamber
//!
//! Wires the in-memory engine together with dependency injection and
//! exposes the policy table plus a one-shot adjudication flow: open a
//! session, replay ballots from a file, and print the resolution as JSON.

mod cli;

use anyhow::{Context, Result};
use chamber_application::{
    CastVoteInput, CastVoteUseCase, GetStatusUseCase, InitiateAuthorizationInput,
    InitiateAuthorizationUseCase, SystemClock,
};
use chamber_domain::{AgentRole, EvidenceRecord, PolicyTable, SessionStatus};
use chamber_infrastructure::{ConfigLoader, HmacSigner, InMemoryAuditLog, InMemorySessionStore};
use clap::Parser;
use cli::{BallotEntry, Cli, Command};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Outcome of one ballot during adjudication
#[derive(Debug, Serialize)]
struct BallotOutcome {
    role: AgentRole,
    accepted: bool,
    detail: String,
}

/// Full adjudication result printed to stdout
#[derive(Debug, Serialize)]
struct AdjudicationReport {
    session: SessionStatus,
    ballots: Vec<BallotOutcome>,
    evidence: Option<EvidenceRecord>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match args.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if args.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(args.config.as_ref()).context("failed to load configuration")?
    };
    let signing_key = config.chamber.signing_key.clone();
    let policies = config
        .into_policy_table()
        .context("policy table rejected")?;

    match args.command {
        Command::Policies => {
            print_policies(&policies)?;
        }
        Command::Resolve { action_type } => {
            let policy = policies.resolve(&action_type);
            println!("{}", serde_json::to_string_pretty(policy)?);
        }
        Command::Adjudicate {
            action_id,
            action_type,
            description,
            timeout_secs,
            ballots,
        } => {
            let entries: Vec<BallotEntry> = serde_json::from_str(
                &std::fs::read_to_string(&ballots)
                    .with_context(|| format!("failed to read {}", ballots.display()))?,
            )
            .context("ballot file is not a JSON array of ballots")?;

            let report = adjudicate(
                policies,
                &signing_key,
                action_id,
                action_type,
                description,
                timeout_secs,
                entries,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_policies(policies: &PolicyTable) -> Result<()> {
    #[derive(Serialize)]
    struct TableView<'a> {
        action_types: Vec<&'a str>,
        policies: std::collections::BTreeMap<&'a str, &'a chamber_domain::ActionPolicy>,
        default_policy: &'a chamber_domain::ActionPolicy,
    }

    let view = TableView {
        action_types: policies.action_types(),
        policies: policies.entries().collect(),
        default_policy: policies.default_policy(),
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

/// Open a session and replay ballots against it
async fn adjudicate(
    policies: PolicyTable,
    signing_key: &str,
    action_id: String,
    action_type: String,
    description: String,
    timeout_secs: Option<u64>,
    entries: Vec<BallotEntry>,
) -> Result<AdjudicationReport> {
    // === Dependency Injection ===
    let store = Arc::new(InMemorySessionStore::new());
    let clock = Arc::new(SystemClock);
    let audit = Arc::new(InMemoryAuditLog::new());
    let signer =
        Arc::new(HmacSigner::new(signing_key.as_bytes()).context("invalid signing key")?);

    let initiate = InitiateAuthorizationUseCase::new(
        Arc::clone(&store),
        Arc::clone(&clock),
        Arc::new(policies),
    );
    let cast = CastVoteUseCase::new(
        Arc::clone(&store),
        signer,
        Arc::clone(&clock),
        Arc::clone(&audit),
    );
    let status = GetStatusUseCase::new(Arc::clone(&store), Arc::clone(&clock), Arc::clone(&audit));

    let mut input = InitiateAuthorizationInput::new(&action_id, description, action_type);
    if let Some(secs) = timeout_secs {
        input = input.with_timeout_secs(secs);
    }
    let opened = initiate.execute(input).await?;
    info!(
        action_id = %opened.action_id,
        rule = %opened.rule,
        "adjudicating with {} ballot(s)",
        entries.len()
    );

    let mut outcomes = Vec::new();
    for entry in entries {
        let result = cast
            .execute(CastVoteInput::new(
                &action_id,
                entry.role,
                entry.decision,
                entry.rationale,
                entry.confidence,
            ))
            .await;
        outcomes.push(match result {
            Ok(receipt) => BallotOutcome {
                role: entry.role,
                accepted: true,
                detail: format!(
                    "{} ({} of {} votes)",
                    receipt.vote.decision, receipt.votes_collected, receipt.votes_required
                ),
            },
            Err(err) => BallotOutcome {
                role: entry.role,
                accepted: false,
                detail: err.to_string(),
            },
        });
    }

    let session = status.execute(&action_id).await?;
    let evidence = match session.final_decision {
        Some(_) => {
            let records = audit.records().await;
            records.into_iter().find(|r| r.action_id == action_id)
        }
        None => None,
    };

    Ok(AdjudicationReport {
        session,
        ballots: outcomes,
        evidence,
    })
}
