//! Application-facing connection state.
//!
//! # Responsibilities
//! - Hold the single current connection (address, chain, signer, provider)
//! - Persist the last successful session and replay it on startup
//! - Delegate chain switches to the connected wallet and fold the result
//!   back into the state
//!
//! # Design Decisions
//! - State is one immutable snapshot behind an `ArcSwap`: readers never
//!   block, writers replace the whole snapshot
//! - Reconnect replays the stored wallet id through the normal connect path
//!   and silently gives up when the account is no longer authorized

use std::fmt;
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use arc_swap::ArcSwap;

use crate::connect::chains::{self, ChainDefinition, ChainSwitchError};
use crate::connect::orchestrator::{ConnectionOrchestrator, WalletConnectionResult};
use crate::provider::transport::SharedProvider;
use crate::signer::factory::WalletSigner;
use crate::wallet::types::WalletInfo;

/// The persisted trace of a successful connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub wallet_id: String,
    pub address: Address,
}

/// Where the last session is remembered between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<StoredSession>;
    fn store(&self, session: &StoredSession);
    fn clear(&self);
}

/// In-process session store, the default when the host supplies none.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<StoredSession> {
        self.session.lock().unwrap().clone()
    }

    fn store(&self, session: &StoredSession) {
        *self.session.lock().unwrap() = Some(session.clone());
    }

    fn clear(&self) {
        *self.session.lock().unwrap() = None;
    }
}

/// Snapshot of the current connection.
#[derive(Clone, Default)]
pub struct WalletState {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub is_connected: bool,
    pub wallet: Option<WalletInfo>,
    pub provider: Option<SharedProvider>,
    pub signer: Option<Arc<dyn WalletSigner>>,
}

impl fmt::Debug for WalletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletState")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("is_connected", &self.is_connected)
            .field("wallet", &self.wallet)
            .finish_non_exhaustive()
    }
}

/// Connection state holder driving the orchestrator on behalf of the host.
pub struct WalletContext {
    orchestrator: ConnectionOrchestrator,
    state: ArcSwap<WalletState>,
    session: Arc<dyn SessionStore>,
    chains: Vec<ChainDefinition>,
}

impl WalletContext {
    pub fn new(orchestrator: ConnectionOrchestrator) -> Self {
        Self::with_session_store(orchestrator, Arc::new(MemorySessionStore::default()))
    }

    pub fn with_session_store(
        orchestrator: ConnectionOrchestrator,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            orchestrator,
            state: ArcSwap::from_pointee(WalletState::default()),
            session,
            chains: Vec::new(),
        }
    }

    /// Chains the context may register with the wallet during a switch.
    pub fn set_known_chains(&mut self, chains: Vec<ChainDefinition>) {
        self.chains = chains;
    }

    pub fn state(&self) -> Arc<WalletState> {
        self.state.load_full()
    }

    pub fn is_connected(&self) -> bool {
        self.state.load().is_connected
    }

    pub fn orchestrator(&self) -> &ConnectionOrchestrator {
        &self.orchestrator
    }

    /// Connect and, on success, project the result into the state and
    /// persist the session.
    pub async fn connect(&self, wallet_id: &str) -> WalletConnectionResult {
        let result = self.orchestrator.connect(wallet_id).await;

        if result.success {
            if let Some(address) = result.address {
                self.session.store(&StoredSession {
                    wallet_id: wallet_id.to_string(),
                    address,
                });
            }
            self.state.store(Arc::new(WalletState {
                address: result.address,
                chain_id: result.chain_id,
                is_connected: true,
                wallet: result.wallet.clone(),
                provider: result.provider.clone(),
                signer: result.signer.clone(),
            }));
        }

        result
    }

    /// Reset to the disconnected state and forget the stored session.
    pub async fn disconnect(&self) {
        let previous = self.state.swap(Arc::new(WalletState::default()));
        self.session.clear();
        if let Some(wallet) = &previous.wallet {
            tracing::info!(wallet = %wallet.name, "Wallet disconnected");
        }
    }

    /// Replay the stored session through the normal connect path. Returns
    /// the replayed result, or `None` when there is nothing to replay or the
    /// wallet no longer authorizes the stored address.
    pub async fn auto_reconnect(&self) -> Option<WalletConnectionResult> {
        let stored = self.session.load()?;
        tracing::info!(wallet_id = %stored.wallet_id, "Attempting session restore");

        let result = self.connect(&stored.wallet_id).await;
        if !result.success {
            tracing::info!(wallet_id = %stored.wallet_id, "Session restore failed, clearing");
            self.session.clear();
            return None;
        }
        if result.address != Some(stored.address) {
            tracing::info!(
                stored = %stored.address,
                current = ?result.address,
                "Stored account no longer active, keeping new session"
            );
        }
        Some(result)
    }

    /// Switch the connected wallet to `chain_id`.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), ChainSwitchError> {
        let state = self.state.load_full();
        let provider = state
            .provider
            .as_ref()
            .ok_or(ChainSwitchError::NotConnected)?;

        chains::switch_chain(provider.as_ref(), chain_id, &self.chains).await?;

        self.state.store(Arc::new(WalletState {
            chain_id: Some(chain_id),
            ..(*state).clone()
        }));
        Ok(())
    }
}

impl fmt::Debug for WalletContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletContext")
            .field("state", &self.state.load())
            .field("known_chains", &self.chains.len())
            .finish_non_exhaustive()
    }
}
