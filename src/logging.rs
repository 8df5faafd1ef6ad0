// ABOUTME: Logging configuration and structured logging setup for the Peakform services
// ABOUTME: Configures log level, output format and service metadata from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

//! Structured logging configuration built on `tracing-subscriber`

use std::env;
use std::io;

use anyhow::Result;
use serde_json::json;
use tracing::{info, Level, Subscriber};
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::intelligence::IntelligenceConfig;

/// Default service name used in structured output
pub const SERVICE_NAME: &str = "peakform";

/// Crates whose events follow the configured level even under a narrower `RUST_LOG`
const ENGINE_TARGETS: [&str; 2] = ["peakform", "peakform_intelligence"];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` lines for production
    Json,
    /// Human-readable multi-line output for development
    Pretty,
    /// Single-line output
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("json") => Self::Json,
            Some("compact") => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    ///
    /// Reads `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT`, `SERVICE_NAME`,
    /// `SERVICE_VERSION` and the `LOG_INCLUDE_*` switches.
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = LogFormat::from_env_value(env::var("LOG_FORMAT").ok().as_deref());
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // Production always carries location, thread and span detail
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Filter honoring `RUST_LOG`, with both peakform crates pinned to `level`
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG")
            .map_or_else(|_| EnvFilter::new(&self.level), EnvFilter::new);
        ENGINE_TARGETS.iter().fold(base, |filter, target| {
            let directive = format!("{target}={}", self.level)
                .parse()
                .unwrap_or_else(|_| Level::INFO.into());
            filter.add_directive(directive)
        })
    }

    /// Formatting layer for the configured output format
    fn output_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let detailed = fmt::layer()
            .with_writer(io::stdout)
            .with_target(true)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_thread_ids(self.include_thread)
            .with_thread_names(self.include_thread)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Json => detailed.json().boxed(),
            LogFormat::Pretty => detailed.boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_writer(io::stdout)
                .with_target(false)
                .boxed(),
        }
    }

    /// Install the global subscriber and log the effective engine settings
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(self.output_layer())
            .try_init()?;

        self.log_startup_info(IntelligenceConfig::global());
        Ok(())
    }

    fn log_startup_info(&self, engine: &IntelligenceConfig) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Peakform starting up"
        );

        let summary = json!({
            "logging": {
                "location": self.include_location,
                "thread": self.include_thread,
                "spans": self.include_spans
            },
            "training_load": {
                "ctl_days": engine.training_load.ctl_time_constant_days,
                "atl_days": engine.training_load.atl_time_constant_days,
                "max_window_days": engine.training_load.max_window_days
            },
            "adherence": {
                "caution_ratio": engine.adherence.caution_ratio,
                "exceeded_ratio": engine.adherence.exceeded_ratio
            }
        });
        info!(%summary, "Engine configuration in effect");
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
