// ABOUTME: Core types and error handling for the Peakform training-load engine
// ABOUTME: Foundation crate with the error taxonomy, domain models, and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![deny(unsafe_code)]

//! # Peakform Core
//!
//! Foundation crate shared by the intelligence engine and the service layer.
//! It changes infrequently so the numeric engine and the services can be
//! compiled independently.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the `AppResult` alias
//! - **constants**: unit conversions and time constants
//! - **models**: activities, stream samples, baselines, goals and plans

/// Unified error handling with standard error codes
pub mod errors;

/// Unit conversion and time constants
pub mod constants;

/// Domain models (Activity, StreamSample, AthleteBaseline, TrainingPlan, Goal)
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode};
