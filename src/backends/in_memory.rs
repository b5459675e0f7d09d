// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::errors::SessionError;
use crate::graph::naming::tensor_name;
use crate::graph::TensorValue;
use crate::traits::Session;

/// Session backed by a map of tensor name to value.
///
/// Every fetch is recorded so callers can inspect which tensors were requested.
#[derive(Debug, Default)]
pub struct InMemorySession {
    values: HashMap<String, TensorValue>,
    requests: Mutex<Vec<Vec<String>>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `name`. Bare node names are stored as `name:0`.
    pub fn with_value(mut self, name: impl AsRef<str>, value: TensorValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: TensorValue) {
        self.values.insert(tensor_name(name.as_ref()), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every batch of names passed to `fetch_values`, oldest first.
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lookup(&self, name: &str) -> Result<TensorValue, SessionError> {
        self.values
            .get(&tensor_name(name))
            .cloned()
            .ok_or_else(|| SessionError::UnknownTensor(name.to_string()))
    }
}

impl From<HashMap<String, TensorValue>> for InMemorySession {
    fn from(values: HashMap<String, TensorValue>) -> Self {
        let mut session = Self::new();
        for (name, value) in values {
            session.insert(name, value);
        }
        session
    }
}

#[async_trait]
impl Session for InMemorySession {
    async fn fetch_values(&self, names: &[String]) -> Result<Vec<TensorValue>, SessionError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(names.to_vec());
        names.iter().map(|name| self.lookup(name)).collect()
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_values_in_request_order() {
        let session = InMemorySession::new()
            .with_value("a:0", TensorValue::scalar_f32(1.0))
            .with_value("b", TensorValue::scalar_f32(2.0));

        let values = session
            .fetch_values(&["b:0".to_string(), "a:0".to_string()])
            .await
            .unwrap();

        assert_eq!(values[0], TensorValue::scalar_f32(2.0));
        assert_eq!(values[1], TensorValue::scalar_f32(1.0));
        assert_eq!(session.requests().len(), 1);
        assert_eq!(session.name(), "in_memory");
    }

    #[tokio::test]
    async fn test_unknown_tensor_fails_the_whole_fetch() {
        let session = InMemorySession::new().with_value("a:0", TensorValue::scalar_f32(1.0));

        let err = session
            .fetch_values(&["a:0".to_string(), "missing:0".to_string()])
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::UnknownTensor("missing:0".to_string()));
    }

    #[tokio::test]
    async fn test_requests_survive_a_poisoned_lock() {
        let session = InMemorySession::new().with_value("a:0", TensorValue::scalar_f32(1.0));
        session
            .fetch_values(&["a:0".to_string()])
            .await
            .unwrap();

        std::thread::scope(|s| {
            let poisoner = s.spawn(|| {
                let _held = session.requests.lock().unwrap();
                panic!("poison the request log");
            });
            assert!(poisoner.join().is_err());
        });
        assert!(session.requests.is_poisoned());

        session
            .fetch_values(&["a:0".to_string()])
            .await
            .unwrap();

        assert_eq!(session.requests().len(), 2);
    }

    #[test]
    fn test_from_map_normalizes_names() {
        let map = HashMap::from([("w".to_string(), TensorValue::scalar_f32(3.0))]);
        let session = InMemorySession::from(map);
        assert!(session.lookup("w:0").is_ok());
        assert!(session.lookup("w").is_ok());
    }
}
