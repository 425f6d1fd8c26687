//! Full node implementation

use crate::api::start_api_server;
use crate::clock::SystemClock;
use crate::runtime::NodeRuntime;
use ballot_core::{BallotResult, Clock, NodeConfig};
use ballot_crypto::keys::KeyPair;
use ballot_engine::DeploymentConfig;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// Ballot node
pub struct BallotNode {
    runtime: Arc<NodeRuntime>,
}

impl BallotNode {
    pub fn new(runtime: NodeRuntime) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }

    /// Serve the API until ctrl-c
    pub async fn start(&self) -> anyhow::Result<()> {
        let summary = self.runtime.summary();
        info!("Starting ballot node {}...", self.runtime.config().name);
        info!("Ballot ID: {}", summary.id.to_hex());
        info!("Chairperson: {}", summary.chairperson.to_hex());
        info!("Voting closes at {}", summary.deadline);

        let api_handle = if self.runtime.config().api.enabled {
            let api_runtime = self.runtime.clone();
            let api_addr = self.runtime.config().api.listen_addr.clone();

            Some(tokio::spawn(async move {
                if let Err(e) = start_api_server(api_runtime, &api_addr).await {
                    error!("API server error: {}", e);
                }
            }))
        } else {
            info!("HTTP API disabled");
            None
        };

        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping node...");
            }
            Err(e) => {
                error!("Error waiting for shutdown signal: {}", e);
            }
        }

        if let Some(handle) = api_handle {
            handle.abort();
        }

        let (index, label) = self.runtime.winner();
        info!("Node stopped; winning proposal {} ({})", index, label);

        Ok(())
    }

    /// Get runtime reference
    pub fn runtime(&self) -> &Arc<NodeRuntime> {
        &self.runtime
    }
}

/// Node builder for easier configuration
pub struct NodeBuilder {
    config: NodeConfig,
    keypair: Option<KeyPair>,
    clock: Arc<dyn Clock>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self {
            config: NodeConfig::default(),
            keypair: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn keypair(mut self, keypair: KeyPair) -> Self {
        self.keypair = Some(keypair);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn api_addr(mut self, addr: &str) -> Self {
        self.config.api.listen_addr = addr.to_string();
        self
    }

    /// Deploy the ballot and assemble the node
    pub fn build(self, deployment: DeploymentConfig) -> BallotResult<BallotNode> {
        let keypair = self.keypair.unwrap_or_else(KeyPair::generate);
        let runtime = NodeRuntime::new(self.config, keypair, deployment, self.clock)?;
        Ok(BallotNode::new(runtime))
    }
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use ballot_core::{BallotError, Timestamp};

    #[test]
    fn test_builder() {
        let chair = KeyPair::generate();
        let deployment = DeploymentConfig::new("test", &chair.address()).add_proposal("yes");
        let node_key = KeyPair::generate();

        let node = NodeBuilder::new()
            .keypair(node_key.clone())
            .clock(Arc::new(ManualClock::new(Timestamp::from_secs(42))))
            .api_addr("127.0.0.1:0")
            .build(deployment)
            .unwrap();

        let runtime = node.runtime();
        assert_eq!(runtime.node_address(), node_key.address());
        assert_eq!(runtime.config().api.listen_addr, "127.0.0.1:0");
        assert_eq!(runtime.summary().creation_time.as_secs(), 42);
    }

    #[test]
    fn test_builder_rejects_empty_ballot() {
        let chair = KeyPair::generate();
        let deployment = DeploymentConfig::new("empty", &chair.address());

        let result = NodeBuilder::new().build(deployment);
        assert!(matches!(result, Err(BallotError::InvalidConfiguration(_))));
    }
}
