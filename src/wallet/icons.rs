//! Batch icon resolution for configured wallet lists.

use futures_util::future::join_all;

use crate::wallet::types::ExtendedWallet;

/// Resolve icons for a whole wallet list concurrently. Individual failures
/// only leave that wallet without an icon.
pub async fn resolve_all(wallets: &[ExtendedWallet]) {
    join_all(wallets.iter().map(|wallet| async move {
        if wallet.resolve_icon().await.is_none() {
            tracing::debug!(wallet = %wallet.name, "Icon did not resolve");
        }
    }))
    .await;
}
