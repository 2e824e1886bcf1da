use crate::domain::email::EmailPolicy;
use crate::domain::profile::ProfileKind;
use clap::{Args, Parser, ValueEnum};
use std::time::Duration;

/// Fixed path of the submission endpoint, relative to the target base URL.
pub const SUBMISSION_PATH: &str = "/api/incidents";

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub receiver: ReceiverConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "INCIDENT_RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "INCIDENT_RELAY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Upper bound on handling one HTTP request
    #[arg(
        long = "server-request-timeout-secs",
        env = "INCIDENT_RELAY_SERVER_REQUEST_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub request_timeout_secs: u64,

    /// How long to wait for in-flight requests on shutdown
    #[arg(long, env = "INCIDENT_RELAY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 3000, request_timeout_secs: 30, shutdown_timeout_secs: 5 }
    }
}

/// Injected settings for `DeliveryClient`. Built in code, not parsed from
/// the command line: the binary only serves the receiver.
#[derive(Clone, Debug)]
pub struct DeliveryConfig {
    /// Base URL of the incident-tracking API
    pub base_url: String,
    /// Attempts made before the final unconditional one
    pub max_attempts: u32,
    /// Initial backoff delay; doubles after every retried attempt
    pub base_delay_ms: u64,
    /// Overall deadline for delivering one submission, fallback included
    pub request_timeout_secs: u64,
    /// Treat a receiver-synthesized outage as transient and retry it
    pub retry_synthetic_failures: bool,
    /// Deliver through the mock receiver when the network target is unreachable
    pub fallback_to_mock: bool,
    /// Value of the User-Agent header sent to the network target
    pub user_agent: String,
}

impl DeliveryConfig {
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full submission URL, `{base}/api/incidents`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{SUBMISSION_PATH}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mockincidents.com".to_string(),
            max_attempts: 3,
            base_delay_ms: 1000,
            request_timeout_secs: 30,
            retry_synthetic_failures: false,
            fallback_to_mock: false,
            user_agent: concat!("incident-relay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct ReceiverConfig {
    /// Simulated processing latency per submission
    #[arg(long, env = "INCIDENT_RELAY_RECEIVER_LATENCY_MS", default_value_t = 0)]
    pub latency_ms: u64,

    /// Probability (0.0 - 1.0) of answering with a synthetic outage
    #[arg(long, env = "INCIDENT_RELAY_RECEIVER_FAILURE_PROBABILITY", default_value_t = 0.0)]
    pub failure_probability: f64,

    /// Apply length limits and require a dotted domain on email addresses
    #[arg(long, env = "INCIDENT_RELAY_STRICT_EMAIL", default_value_t = false)]
    pub strict_email: bool,

    /// Wire schema flavour the receiver expects
    #[arg(long, env = "INCIDENT_RELAY_PROFILE", value_enum, default_value_t = ProfileKind::Full)]
    pub profile: ProfileKind,
}

impl ReceiverConfig {
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    #[must_use]
    pub const fn email_policy(&self) -> EmailPolicy {
        if self.strict_email { EmailPolicy::Strict } else { EmailPolicy::RoundTrip }
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self { latency_ms: 0, failure_probability: 0.0, strict_email: false, profile: ProfileKind::Full }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Default, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "INCIDENT_RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are only exported when set
    #[arg(long, env = "INCIDENT_RELAY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}
