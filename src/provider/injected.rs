//! Legacy single-slot provider injection model.
//!
//! Mirrors the pre-standardization pattern: one global provider slot that
//! may additionally expose a `providers` array when several extensions
//! fight over the same slot.

use crate::provider::transport::SharedProvider;

/// The legacy injection surface handed to the discovery engine by the host.
#[derive(Clone, Default)]
pub struct InjectedProviders {
    primary: Option<SharedProvider>,
    providers: Vec<SharedProvider>,
}

impl InjectedProviders {
    /// No injected provider at all. Discovery degrades to the standardized
    /// channel only.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_primary(provider: SharedProvider) -> Self {
        Self {
            primary: Some(provider),
            providers: Vec::new(),
        }
    }

    /// Register an entry of the multi-wallet `providers` array.
    pub fn push(&mut self, provider: SharedProvider) {
        self.providers.push(provider);
    }

    /// Candidate providers in scan order: the `providers` array when
    /// non-empty, otherwise the primary slot alone.
    pub fn candidates(&self) -> Vec<SharedProvider> {
        if !self.providers.is_empty() {
            return self.providers.clone();
        }
        self.primary.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.providers.is_empty()
    }
}

impl std::fmt::Debug for InjectedProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectedProviders")
            .field("primary", &self.primary.is_some())
            .field("providers", &self.providers.len())
            .finish()
    }
}
