// ABOUTME: Main library entry point for the Peakform training-load services
// ABOUTME: Async service layer over the intelligence engine with pluggable storage traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![deny(unsafe_code)]

//! # Peakform
//!
//! Training-load modeling and periodization for endurance athletes. Raw
//! activity streams become standardized training stress scores, which roll
//! into fitness, fatigue and form, get projected against periodized plans and
//! assessed for feasibility, safety and adherence.
//!
//! ## Architecture
//!
//! - **`peakform-core`**: errors, constants and domain models
//! - **`peakform-intelligence`**: the synchronous numeric engine
//! - **providers**: async collaborator traits for storage and stream access
//! - **services**: request-level orchestration (baselines, metrics, load, plans, insights)
//! - **memory**: in-process store implementing every provider trait
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use peakform::memory::InMemoryStore;
//! use peakform::services::TrainingLoadService;
//! use peakform::errors::AppResult;
//! use peakform_intelligence::IntelligenceConfig;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = Arc::new(InMemoryStore::new());
//!     let service = TrainingLoadService::new(store, IntelligenceConfig::global());
//!     let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
//!     let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap_or_default();
//!     let series = service.history(Uuid::new_v4(), start, end).await?;
//!     println!("final CTL {}", series.final_state.ctl);
//!     Ok(())
//! }
//! ```

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Async collaborator traits for activities, baselines, streams and plans
pub mod providers;

/// In-memory provider implementation
pub mod memory;

/// Request-level orchestration over the engine
pub mod services;

pub use peakform_core::models;
pub use peakform_intelligence as intelligence;
