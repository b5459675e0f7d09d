// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::SessionError;
use crate::graph::TensorValue;

/// Capability that reads the current value of named tensors.
///
/// Conversion calls `fetch_values` once with every tensor it needs and expects
/// exactly one value per name, in request order. Retries and timeouts belong
/// to the implementation.
#[async_trait]
pub trait Session: Send + Sync {
    async fn fetch_values(&self, names: &[String]) -> Result<Vec<TensorValue>, SessionError>;

    fn name(&self) -> &'static str;
}
