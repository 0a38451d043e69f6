//! Crate-internal stub provider for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::transport::{BrandFlags, EthereumProvider, ProviderError, ProviderResult};

/// A scriptable provider: canned responses per method plus a call log.
pub(crate) struct StubProvider {
    flags: BrandFlags,
    responses: Mutex<HashMap<String, ProviderResult<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubProvider {
    pub(crate) fn new() -> Self {
        Self {
            flags: BrandFlags::default(),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_flags(flags: BrandFlags) -> Self {
        Self {
            flags,
            ..Self::new()
        }
    }

    pub(crate) fn stub(self, method: &str, response: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), Ok(response));
        self
    }

    pub(crate) fn stub_err(self, method: &str, error: ProviderError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), Err(error));
        self
    }

    /// Replace a canned response after construction.
    pub(crate) fn set_response(&self, method: &str, response: ProviderResult<Value>) {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), response);
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }
}

#[async_trait]
impl EthereumProvider for StubProvider {
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        match self.responses.lock().unwrap().get(method) {
            Some(response) => response.clone(),
            None => Err(ProviderError::Transport(format!(
                "no stub for method {method}"
            ))),
        }
    }

    fn brand_flags(&self) -> BrandFlags {
        self.flags
    }
}
