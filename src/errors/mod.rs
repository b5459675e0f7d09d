// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod freeze;
mod validation;

pub use config::ConfigError;
pub use freeze::{FreezeError, FreezeResult, SessionError};
pub use validation::GraphValidationError;
