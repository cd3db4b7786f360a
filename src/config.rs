//! Environment configuration

use crate::state_machine::{FlowPolicy, Pacing, PaymentDetails, TurnContext};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown flow policy {0:?} (expected \"await_payment\" or \"finalize_on_submit\")")]
    UnknownPolicy(String),
    #[error("{0} must be set when the flow policy is await_payment")]
    Missing(&'static str),
}

impl FromStr for FlowPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "await_payment" => Ok(FlowPolicy::AwaitPayment),
            "finalize_on_submit" | "finalize" => Ok(FlowPolicy::FinalizeOnSubmit),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub port: u16,
    pub bridge_url: String,
    pub policy: FlowPolicy,
    pub pacing: Pacing,
    pub payment: PaymentDetails,
    pub startup_retries: u32,
    pub startup_backoff: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let policy = lookup("FUNNEL_FLOW_POLICY")
            .map(|v| v.parse::<FlowPolicy>())
            .transpose()?
            .unwrap_or_default();

        let pacing_default = Pacing::default();
        let pacing = Pacing {
            typing: millis(&lookup, "FUNNEL_TYPING_DELAY_MS", pacing_default.typing),
            pin: millis(&lookup, "FUNNEL_PIN_DELAY_MS", pacing_default.pin),
            payment: millis(&lookup, "FUNNEL_PAYMENT_DELAY_MS", pacing_default.payment),
        };

        let required = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(v) => Ok(v),
                None if policy == FlowPolicy::FinalizeOnSubmit => Ok(String::new()),
                None => Err(ConfigError::Missing(key)),
            }
        };
        let payment = PaymentDetails {
            pix_key: required("FUNNEL_PIX_KEY")?,
            holder: required("FUNNEL_PIX_NAME")?,
            institution: required("FUNNEL_PIX_INSTITUTION")?,
        };

        Ok(Self {
            port: parsed(&lookup, "FUNNEL_PORT", 8080),
            bridge_url: lookup("FUNNEL_BRIDGE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:3000".to_string()),
            policy,
            pacing,
            payment,
            startup_retries: parsed(&lookup, "FUNNEL_STARTUP_RETRIES", 5),
            startup_backoff: millis(&lookup, "FUNNEL_STARTUP_BACKOFF_MS", Duration::from_millis(3000)),
        })
    }

    pub fn turn_context(&self) -> TurnContext {
        TurnContext::new(self.policy, self.payment.clone(), self.pacing)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, "Invalid value, using default");
        default
    })
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    #[allow(clippy::cast_possible_truncation)] // configured delays are far below u64::MAX ms
    let default_ms = default.as_millis() as u64;
    Duration::from_millis(parsed(lookup, key, default_ms))
}
