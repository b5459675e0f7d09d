// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::SessionError;
use crate::graph::TensorValue;
use crate::traits::Session;

/// A session that always fails for testing error propagation
pub struct FailingSession;

#[async_trait::async_trait]
impl Session for FailingSession {
    async fn fetch_values(&self, _names: &[String]) -> Result<Vec<TensorValue>, SessionError> {
        Err(SessionError::Backend("Simulated session failure".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// A session that drops the last value of every answer for testing count checks
pub struct TruncatingSession;

#[async_trait::async_trait]
impl Session for TruncatingSession {
    async fn fetch_values(&self, names: &[String]) -> Result<Vec<TensorValue>, SessionError> {
        Ok(names
            .iter()
            .skip(1)
            .map(|_| TensorValue::scalar_f32(0.0))
            .collect())
    }

    fn name(&self) -> &'static str {
        "truncating"
    }
}
