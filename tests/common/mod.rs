//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use wallet_hub::provider::announce::{AnnouncementBus, ProviderAnnouncement, ProviderInfo};
use wallet_hub::provider::transport::{
    BrandFlags, EthereumProvider, ProviderError, ProviderResult, SharedProvider,
};

/// The account every mock wallet authorizes.
#[allow(dead_code)]
pub const ADDR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// A scriptable provider standing in for a wallet extension: canned
/// responses per method plus a call log.
pub struct MockProvider {
    flags: BrandFlags,
    responses: Mutex<HashMap<String, ProviderResult<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new() -> Self {
        Self {
            flags: BrandFlags::default(),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_flags(flags: BrandFlags) -> Self {
        Self {
            flags,
            ..Self::new()
        }
    }

    /// A provider that authorizes [`ADDR`] on chain 1.
    pub fn connectable() -> Self {
        Self::new()
            .stub("eth_requestAccounts", serde_json::json!([ADDR]))
            .stub("eth_chainId", serde_json::json!("0x1"))
    }

    pub fn stub(self, method: &str, response: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), Ok(response));
        self
    }

    pub fn stub_err(self, method: &str, error: ProviderError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), Err(error));
        self
    }

    pub fn set_response(&self, method: &str, response: ProviderResult<Value>) {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), response);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }
}

#[async_trait]
impl EthereumProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        match self.responses.lock().unwrap().get(method) {
            Some(response) => response.clone(),
            None => Err(ProviderError::Transport(format!(
                "no mock response for {method}"
            ))),
        }
    }

    fn brand_flags(&self) -> BrandFlags {
        self.flags
    }
}

/// Run a mock wallet-extension publisher: announces `provider` under the
/// given identity every time an announcement request is dispatched.
#[allow(dead_code)]
pub fn spawn_announcer(
    bus: &Arc<AnnouncementBus>,
    name: &str,
    rdns: &str,
    provider: SharedProvider,
) {
    let bus = bus.clone();
    let info = ProviderInfo {
        uuid: Uuid::new_v4(),
        name: name.to_string(),
        icon: format!("data:,{rdns}"),
        rdns: rdns.to_string(),
    };
    // Subscribe before handing off so a request dispatched immediately
    // after this call is never missed.
    let mut requests = bus.subscribe_requests();
    tokio::spawn(async move {
        while requests.recv().await.is_ok() {
            bus.announce(ProviderAnnouncement {
                info: info.clone(),
                provider: provider.clone(),
            });
        }
    });
}
