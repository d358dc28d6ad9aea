//! Serve command implementation
//!
//! Runs the HTTP masking service until a shutdown signal arrives.

use crate::config::load_config_or_default;
use crate::pipeline::MaskingPipeline;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address, overriding server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overriding server.port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let pipeline = match MaskingPipeline::from_config(&config) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                println!("❌ Failed to build masking pipeline");
                println!("   Error: {e:#}");
                return Ok(2);
            }
        };

        println!("🚀 Veil listening on http://{}", config.server.bind_address());

        crate::server::serve(&config.server, pipeline, shutdown_signal).await?;

        println!("👋 Veil stopped");
        Ok(0)
    }
}
