//! Mask command implementation
//!
//! One-shot masking of a text given as an argument or piped on stdin.

use crate::config::load_config_or_default;
use crate::domain::MaskingResponse;
use crate::pipeline::{MaskRequest, MaskingPipeline};
use anyhow::Context;
use clap::Args;
use std::io::Read;

/// Arguments for the mask command
#[derive(Args, Debug)]
pub struct MaskArgs {
    /// Text to mask; read from stdin when omitted
    pub text: Option<String>,

    /// Language tag
    #[arg(long)]
    pub language: Option<String>,

    /// Entity types to detect, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub entities: Vec<String>,

    /// Print the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl MaskArgs {
    /// Execute the mask command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration file");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        let pipeline = match MaskingPipeline::from_config(&config) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("❌ Failed to build masking pipeline");
                eprintln!("   Error: {e:#}");
                return Ok(2);
            }
        };

        let text = match &self.text {
            Some(text) => text.clone(),
            None => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read text from stdin")?;
                buffer
            }
        };

        let request = self.request(text);
        if let Err(e) = request.validate(config.server.max_text_chars) {
            eprintln!("❌ {e}");
            return Ok(1);
        }

        let response = match pipeline.mask(&request) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ {}: {e}", e.kind());
                return Ok(1);
            }
        };

        println!("{}", self.render(&response)?);
        Ok(0)
    }

    fn request(&self, text: String) -> MaskRequest {
        let mut request = MaskRequest::new(text).with_entities(self.entities.iter().cloned());
        request.language = self.language.clone();
        request
    }

    fn render(&self, response: &MaskingResponse) -> anyhow::Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(response)?)
        } else {
            Ok(response.anonymized_text.clone())
        }
    }
}
