//! Gateway configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SAFETY_GATEWAY_PORT` / `PORT` | 18700 | Listen port |
//! | `SAFETY_API_LATENCY_MS` | 300 | Simulated facade latency, 0 disables |
//! | `SAFETY_SIMULATION` | on | Background alert/feed simulators |
//! | `SAFETY_SIM_SEED` | random | RNG seed for the simulators |
//! | `SAFETY_AI_TIMEOUT_SEC` | 30 | Upstream chat request timeout |
//! | `OPENAI_API_KEY` / `XAI_API_KEY` | unset | Chat provider, OpenAI first |

use std::time::Duration;

use anyhow::{Context, Result};

use crate::assistant::{AssistantConfig, AssistantProvider};

pub const DEFAULT_PORT: u16 = 18700;
pub const DEFAULT_LATENCY_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub latency: Option<Duration>,
    pub simulation: bool,
    pub sim_seed: Option<u64>,
    pub assistant: AssistantConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("SAFETY_GATEWAY_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let latency_ms: u64 = match get("SAFETY_API_LATENCY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid SAFETY_API_LATENCY_MS: {raw}"))?,
            None => DEFAULT_LATENCY_MS,
        };

        let simulation = match get("SAFETY_SIMULATION") {
            Some(raw) => !matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            ),
            None => true,
        };

        let sim_seed = get("SAFETY_SIM_SEED")
            .map(|raw| {
                raw.trim()
                    .parse()
                    .with_context(|| format!("invalid SAFETY_SIM_SEED: {raw}"))
            })
            .transpose()?;

        let mut assistant = AssistantConfig::default();
        if let Some(raw) = get("SAFETY_AI_TIMEOUT_SEC") {
            assistant.timeout_sec = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid SAFETY_AI_TIMEOUT_SEC: {raw}"))?;
        }
        assistant.provider = if let Some(api_key) = get("OPENAI_API_KEY") {
            Some(AssistantProvider::OpenAi { api_key })
        } else {
            get("XAI_API_KEY").map(|api_key| AssistantProvider::Xai { api_key })
        };

        Ok(Self {
            port,
            latency: (latency_ms > 0).then(|| Duration::from_millis(latency_ms)),
            simulation,
            sim_seed,
            assistant,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
