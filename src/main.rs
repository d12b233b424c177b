//! Sidecar proxy agent.
//!
//! # Architecture Overview
//!
//! ```text
//!   SIGHUP ─────────┐        ┌──────────────────────────────────────────┐
//!   SIGTERM/SIGINT ─┼──────▶ │ agent loop (this file)                    │
//!                   │        │   epoch N   ── ProcessSupervisor::run ──▶ │──▶ proxy (epoch N)
//!   probe ticker ───┘        │   epoch N+1 ── ProcessSupervisor::run ──▶ │──▶ proxy (epoch N+1)
//!                            │   finished  ── EpochJanitor::cleanup      │
//!                            └──────────────────────────────────────────┘
//! ```
//!
//! - Epoch 0 starts immediately.
//! - SIGHUP hot restarts into the next epoch; the proxy retires its parent.
//! - SIGTERM/SIGINT starts a Drain epoch, waits the drain duration, then
//!   aborts every running epoch. A second signal aborts at once.
//! - A fatal supervisor error stops the agent with status 1.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use proxy_agent::config::load_config;
use proxy_agent::health::LivenessProbe;
use proxy_agent::lifecycle::{AbortCause, AbortSignal, AgentSignal, EpochTracker, Finish, Signals};
use proxy_agent::observability::{logging, metrics};
use proxy_agent::proxy::{
    ConfigRequest, Epoch, EpochJanitor, ProcessSupervisor, SupervisorResult, TemplateBootstrap,
};

#[derive(Parser)]
#[command(name = "proxy-agent")]
#[command(about = "Supervises the sidecar proxy process", long_about = None)]
struct Cli {
    /// Agent configuration file (TOML).
    #[arg(short, long, default_value = "/etc/proxy-agent/agent.toml")]
    config: PathBuf,
}

type Finished = (Epoch, ConfigRequest, SupervisorResult<()>);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability);
    tracing::info!("proxy-agent v0.1.0 starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let proxy = config.proxy.clone();
    tracing::info!(
        binary = %proxy.binary_path.display(),
        admin_port = proxy.admin_port,
        custom_config = ?proxy.custom_config_file,
        "Configuration loaded"
    );

    let generator = Arc::new(TemplateBootstrap::new(
        proxy.bootstrap_template.clone(),
        proxy.config_dir.clone(),
    ));
    let supervisor = Arc::new(ProcessSupervisor::new(proxy.clone(), generator));
    let janitor = EpochJanitor::new(proxy.config_dir.clone());
    let probe = LivenessProbe::new(
        proxy.admin_port,
        Duration::from_millis(config.probe.timeout_ms),
    )?;
    let abort = Arc::new(AbortSignal::new());
    let mut signals = Signals::register()?;
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Finished>();

    let mut epoch = Epoch(0);
    let mut tracker = EpochTracker::new();

    start_epoch(&supervisor, &abort, &done_tx, ConfigRequest::Bootstrap, epoch);
    tracker.started();

    let mut ticker = tokio::time::interval(Duration::from_secs(config.probe.interval_secs.max(1)));

    loop {
        tokio::select! {
            Some((finished, request, result)) = done_rx.recv() => {
                if request == ConfigRequest::Bootstrap && proxy.custom_config_file.is_none() {
                    janitor.cleanup(finished);
                }
                match tracker.finished(finished, &result) {
                    Finish::Continue => {}
                    Finish::Done => break,
                    Finish::Fatal => std::process::exit(1),
                }
            }
            signal = signals.recv() => match signal {
                AgentSignal::Restart if !tracker.is_draining() => {
                    epoch = epoch.next();
                    tracing::info!(epoch = %epoch, "Hot restarting proxy");
                    start_epoch(&supervisor, &abort, &done_tx, ConfigRequest::Bootstrap, epoch);
                    tracker.started();
                }
                AgentSignal::Restart => {
                    tracing::debug!("Ignoring restart while draining");
                }
                AgentSignal::Terminate if !tracker.is_draining() => {
                    tracker.begin_drain();
                    epoch = epoch.next();
                    let drain = proxy.drain_duration();
                    tracing::info!(epoch = %epoch, drain_secs = drain.as_secs(), "Draining proxy");
                    start_epoch(&supervisor, &abort, &done_tx, ConfigRequest::Drain, epoch);
                    tracker.started();

                    let abort = abort.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(drain).await;
                        abort.trigger(AbortCause::Shutdown);
                    });
                }
                AgentSignal::Terminate => {
                    tracing::warn!("Second termination signal, aborting all epochs");
                    abort.trigger(AbortCause::Shutdown);
                }
            },
            _ = ticker.tick(), if !tracker.is_draining() => {
                probe.is_live().await;
            }
        }
    }

    tracing::info!("Shutdown complete");
    if tracker.failed() {
        std::process::exit(1);
    }
    Ok(())
}

fn start_epoch(
    supervisor: &Arc<ProcessSupervisor>,
    abort: &AbortSignal,
    done: &mpsc::UnboundedSender<Finished>,
    request: ConfigRequest,
    epoch: Epoch,
) {
    let supervisor = supervisor.clone();
    let rx = abort.subscribe();
    let done = done.clone();
    tokio::spawn(async move {
        let result = supervisor.run(request, epoch, rx).await;
        let _ = done.send((epoch, request, result));
    });
}
