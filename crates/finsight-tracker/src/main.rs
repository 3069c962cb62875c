/*
[INPUT]:  CLI arguments, stored bearer credential, analysis backend
[OUTPUT]: Submitted analyses and live status output until a terminal state
[POS]:    Binary entry point - the hosting application around the coordinator
[UPDATE]: When changing CLI flags or the watch/submit flow
*/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finsight_client::{
    ClientConfig, CredentialStore, Credentials, FinsightClient, TaskId,
};
use finsight_tracker::{AnalysisOutcome, AnalysisRequest, Coordinator, WatchState};

#[derive(Parser, Debug)]
#[command(name = "finsight", version, about = "Financial document analysis client")]
struct Cli {
    #[arg(
        long = "base-url",
        value_name = "URL",
        default_value = "http://localhost:8000/api/v1"
    )]
    base_url: String,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the bearer token
    Login { email: String },
    /// List past analyses, newest first
    History,
    /// Submit a document for analysis and watch it to completion
    Submit {
        file: PathBuf,
        /// Free-form analysis instruction
        #[arg(long)]
        query: String,
    },
    /// Watch an existing analysis task
    Watch { task_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let store = CredentialStore::default_path();
    let client = build_client(&args.base_url, &store)?;

    match args.command {
        Command::Login { email } => run_login(&client, &store, &email).await,
        Command::History => run_history(&client).await,
        Command::Submit { file, query } => {
            let coordinator = Coordinator::new(Arc::new(client));
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .context("document path has no usable file name")?
                .to_string();
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("read document {}", file.display()))?;

            let task_id = coordinator
                .start_new_analysis(AnalysisRequest {
                    filename,
                    content,
                    query,
                })
                .await
                .context("submit analysis")?;
            println!("submitted; task id: {task_id}");

            watch_until_terminal(&coordinator, &store).await
        }
        Command::Watch { task_id } => {
            let coordinator = Coordinator::new(Arc::new(client));
            coordinator.observe(TaskId::from(task_id));
            watch_until_terminal(&coordinator, &store).await
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn build_client(base_url: &str, store: &CredentialStore) -> Result<FinsightClient> {
    let mut client = FinsightClient::with_config_and_base_url(ClientConfig::default(), base_url)
        .context("build API client")?;

    // The credential is read once per process start; every request reuses it.
    if let Some(token) = store.load() {
        client.set_credentials(Credentials {
            bearer_token: token,
        });
    }

    Ok(client)
}

async fn run_login(client: &FinsightClient, store: &CredentialStore, email: &str) -> Result<()> {
    let password = Password::new()
        .with_prompt(format!("Password for {email}"))
        .interact()
        .context("read password")?;

    let login = client.login(email, &password).await.context("login")?;
    store.save(&login.access_token).context("store credential")?;
    println!("logged in as {email}");
    Ok(())
}

async fn run_history(client: &FinsightClient) -> Result<()> {
    let records = client.list_documents().await.context("list analyses")?;
    if records.is_empty() {
        println!("no analyses yet");
        return Ok(());
    }

    for record in records {
        let task = record
            .analysis_task_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  task={}",
            record.upload_date.format("%Y-%m-%d %H:%M"),
            record.filename,
            task,
        );
    }
    Ok(())
}

/// Follow the published state until the observed task reaches a terminal
/// status, the credential is rejected, or the user interrupts.
async fn watch_until_terminal(
    coordinator: &Coordinator<FinsightClient>,
    store: &CredentialStore,
) -> Result<()> {
    let auth_failed = CancellationToken::new();
    {
        let store = store.clone();
        let auth_failed = auth_failed.clone();
        coordinator.set_auth_failure_hook(Arc::new(move |_| {
            let _ = store.clear();
            auth_failed.cancel();
        }));
    }

    let mut rx = coordinator.subscribe();
    let mut last_printed = None;

    loop {
        tokio::select! {
            _ = auth_failed.cancelled() => {
                coordinator.shutdown();
                bail!("credential rejected; stored token cleared, log in again");
            }
            _ = tokio::signal::ctrl_c() => {
                coordinator.shutdown();
                info!("interrupted; observation stopped");
                return Ok(());
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = rx.borrow_and_update().clone();
                match state {
                    WatchState::Idle => {}
                    WatchState::SubmissionFailed { message } => {
                        coordinator.shutdown();
                        bail!("submission failed: {message}");
                    }
                    WatchState::Watching(snapshot) => {
                        if last_printed != Some(snapshot.status) {
                            println!("[{}] {}", snapshot.task_id, snapshot.status);
                            last_printed = Some(snapshot.status);
                        }
                        match snapshot.outcome {
                            Some(AnalysisOutcome::Report(report)) => {
                                println!("{report}");
                                return Ok(());
                            }
                            Some(AnalysisOutcome::Error(error)) => {
                                bail!("analysis failed: {error}");
                            }
                            None => {}
                        }
                    }
                }
            }
        }
    }
}
