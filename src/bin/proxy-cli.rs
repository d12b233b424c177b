use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use proxy_agent::config::{load_config, AgentConfig};
use proxy_agent::health::LivenessProbe;
use proxy_agent::observability::logging;
use proxy_agent::proxy::{ConfigRequest, Epoch, EpochJanitor, ProcessSupervisor, TemplateBootstrap};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for the sidecar proxy agent", long_about = None)]
struct Cli {
    /// Agent configuration file (TOML).
    #[arg(short, long, default_value = "/etc/proxy-agent/agent.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the proxy command line for an epoch (writes its bootstrap file)
    Args {
        #[arg(short, long, default_value_t = 0)]
        epoch: u32,

        /// Use the drain config
        #[arg(long)]
        drain: bool,
    },
    /// Check whether the proxy reports itself live
    Live {
        /// Admin port, overriding the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Delete the bootstrap file of a finished epoch
    Cleanup {
        #[arg(short, long)]
        epoch: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config: AgentConfig = load_config(&cli.config)?;
    logging::init_logging(&config.observability);

    match cli.command {
        Commands::Args { epoch, drain } => {
            let proxy = config.proxy;
            let generator = Arc::new(TemplateBootstrap::new(
                proxy.bootstrap_template.clone(),
                proxy.config_dir.clone(),
            ));
            let supervisor = ProcessSupervisor::new(proxy, generator);
            let request = if drain {
                ConfigRequest::Drain
            } else {
                ConfigRequest::Bootstrap
            };
            let (_, args) = supervisor.startup_args(request, Epoch(epoch))?;
            let line: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
            println!("{} {}", supervisor.config().binary_path.display(), line.join(" "));
        }
        Commands::Live { port } => {
            let probe = LivenessProbe::new(
                port.unwrap_or(config.proxy.admin_port),
                Duration::from_millis(config.probe.timeout_ms),
            )?;
            if probe.is_live().await {
                println!("LIVE");
            } else {
                println!("NOT LIVE");
                std::process::exit(1);
            }
        }
        Commands::Cleanup { epoch } => {
            EpochJanitor::new(config.proxy.config_dir).cleanup(Epoch(epoch));
        }
    }

    Ok(())
}
