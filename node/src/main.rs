//! Ballot Node Binary

use ballot_core::NodeConfig;
use ballot_crypto::keys::{KeyFile, KeyPair};
use ballot_engine::DeploymentConfig;
use ballot_node::NodeBuilder;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ballot-node")]
#[command(about = "Ballot Node - chairperson-administered, time-boxed voting")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a ballot and serve it
    Run {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Deployment file path
        #[arg(short, long)]
        deployment: PathBuf,

        /// API listen address (overrides config)
        #[arg(long)]
        api_addr: Option<String>,

        /// Data directory (overrides config)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Generate a new keypair
    Keygen {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a deployment descriptor
    Deployment {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Ballot name
        #[arg(long, default_value = "Ballot")]
        name: String,

        /// Proposal label (repeat for each proposal, in order)
        #[arg(short, long = "proposal", required = true)]
        proposals: Vec<String>,

        /// Chairperson address (hex); defaults to the node key in --data-dir
        #[arg(long)]
        chairperson: Option<String>,

        /// Data directory holding the node key
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            deployment,
            api_addr,
            data_dir,
        } => {
            let mut node_config = match config {
                Some(path) => NodeConfig::load(&path)?,
                None => NodeConfig::default(),
            };
            if let Some(addr) = api_addr {
                node_config.api.listen_addr = addr;
            }
            if let Some(dir) = data_dir {
                node_config.data_dir = dir;
            }

            init_logging(&node_config.log_level);
            info!("Starting ballot node...");

            let keypair = load_or_create_keypair(&node_config.data_dir)?;

            let content = std::fs::read_to_string(&deployment)?;
            let deployment = DeploymentConfig::from_json(&content)?;

            let node = NodeBuilder::new()
                .config(node_config)
                .keypair(keypair)
                .build(deployment)?;

            node.start().await?;
        }

        Commands::Keygen { output } => {
            let keypair = KeyPair::generate();
            let json = serde_json::to_string_pretty(&KeyFile::from(&keypair))?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &json)?;
                    println!("Keypair saved to: {}", path.display());
                }
                None => {
                    println!("{}", json);
                }
            }
        }

        Commands::Deployment {
            output,
            name,
            proposals,
            chairperson,
            data_dir,
        } => {
            let chairperson = match chairperson {
                Some(hex) => hex,
                None => load_or_create_keypair(&data_dir)?.address().to_hex(),
            };

            let deployment = DeploymentConfig {
                name,
                chairperson,
                proposals,
            };
            // Fail now rather than at deploy time
            deployment.parse_chairperson()?;
            deployment.parse_labels()?;

            std::fs::write(&output, deployment.to_json()?)?;
            println!("Deployment descriptor saved to: {}", output.display());
        }
    }

    Ok(())
}

fn load_or_create_keypair(data_dir: &Path) -> anyhow::Result<KeyPair> {
    let key_path = data_dir.join("node_key.json");

    if key_path.exists() {
        let content = std::fs::read_to_string(&key_path)?;
        let key_file: KeyFile = serde_json::from_str(&content)?;
        let keypair = key_file.to_keypair()?;
        info!("Loaded keypair from {}", key_path.display());
        return Ok(keypair);
    }

    std::fs::create_dir_all(data_dir)?;

    let keypair = KeyPair::generate();
    std::fs::write(&key_path, serde_json::to_string_pretty(&KeyFile::from(&keypair))?)?;
    info!("Generated new keypair, saved to {}", key_path.display());

    Ok(keypair)
}
