// ABOUTME: Error handling surface of the service layer
// ABOUTME: Re-exports the core error taxonomy so callers depend on one path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

//! # Unified Error Handling
//!
//! Validation failures map to 400, ownership mismatches to 403, missing
//! resources to 404 and collaborator failures to 500 via
//! [`ErrorCode::http_status`]. Recoverable conditions (missing baselines,
//! duplicate active plans) never surface here; they are corrected in place
//! and logged.

pub use peakform_core::errors::{AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse};
pub use peakform_intelligence::ConfigError;
