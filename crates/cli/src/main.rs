//! Reaper CLI - garbage collects Terraform test resources.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use reaper_cluster::{Cluster, KubeCluster};
use reaper_core::{ResourceKind, RetentionPolicy, DEFAULT_SELECTOR};
use reaper_execution::{EngineConfig, GcEngine, GcError};
use reaper_tools::{KubectlTool, QuietRunner};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reaper")]
#[command(about = "Garbage collects test resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Garbage collects test resources
    Gc(GcArgs),
}

#[derive(Args, Debug)]
struct GcArgs {
    /// The namespace to query the Terraform resources
    #[arg(short = 'n', long = "ns", default_value = "")]
    namespace: String,

    /// The selector to find the Terraform resources to remove
    #[arg(short = 'l', long, default_value = DEFAULT_SELECTOR)]
    selector: String,

    /// The maximum age of a Terraform resource before it is garbage collected
    #[arg(short = 'd', long, default_value = "2h", value_parser = parse_duration)]
    duration: Duration,
}

fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| format!("invalid duration {:?}: {}", s, e))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Gc(args) => gc(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

/// Log the error that ended the run, once, with the failing resource when known.
fn report_failure(err: &anyhow::Error) {
    let gc = err.downcast_ref::<GcError>();
    let resource = gc.and_then(GcError::resource);
    let exit_code = gc.and_then(kubectl_exit_code);
    error!(resource, exit_code, "Garbage collection failed: {:#}", err);
}

/// Exit code of the kubectl invocation behind a failed primary deletion.
fn kubectl_exit_code(err: &GcError) -> Option<i32> {
    match err {
        GcError::PrimaryDeletion { source, .. } => source.output().map(|o| o.exit_code),
        _ => None,
    }
}

async fn gc(args: GcArgs) -> Result<()> {
    let namespace = Some(args.namespace).filter(|ns| !ns.is_empty());
    let cluster = KubeCluster::connect(namespace)
        .await
        .map_err(GcError::client)?;

    let kubectl = KubectlTool::new(Arc::new(QuietRunner)).with_namespace(cluster.namespace());
    let config = EngineConfig {
        kind: ResourceKind::TERRAFORM,
        policy: RetentionPolicy::new(args.selector, args.duration),
    };

    let mut engine = GcEngine::new(Arc::new(cluster), Arc::new(kubectl)).with_config(config);

    let report = tokio::select! {
        report = engine.run() => report?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted, garbage collection aborted"),
    };

    info!(
        namespace = %report.namespace,
        kept = report.kept(),
        too_young = report.too_young(),
        deleted = report.deleted(),
        jobs_deleted = report.deleted_jobs().len(),
        "Garbage collection complete"
    );
    Ok(())
}
