use thiserror::Error;
use tokio::task;

use crate::config;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("credential task failed: {0}")]
    Join(#[from] task::JoinError),
}

/// Hash a secret with the configured bcrypt cost. The result embeds the
/// salt and cost, so verification needs no extra state.
///
/// bcrypt is CPU-bound (hundreds of milliseconds at production cost), so
/// the work runs on the blocking pool rather than a runtime worker.
pub async fn hash_password(secret: &str) -> Result<String, CredentialError> {
    let cost = config::config().security.bcrypt_cost;
    let secret = secret.to_string();
    let hash = task::spawn_blocking(move || bcrypt::hash(secret, cost)).await??;
    Ok(hash)
}

/// Compare a secret against a stored bcrypt hash, off the async executor.
pub async fn verify_password(secret: &str, stored_hash: &str) -> Result<bool, CredentialError> {
    let secret = secret.to_string();
    let stored_hash = stored_hash.to_string();
    let matches = task::spawn_blocking(move || bcrypt::verify(secret, &stored_hash)).await??;
    Ok(matches)
}
