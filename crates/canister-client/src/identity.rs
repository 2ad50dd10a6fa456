//! Signing identity loading

use std::path::Path;

use ic_agent::identity::{AnonymousIdentity, BasicIdentity, Secp256k1Identity};
use ic_agent::Identity;

use crate::{ClientError, Result};

/// Load a PEM identity (Ed25519 first, then secp256k1), or the anonymous
/// identity when no path is given.
pub fn load_identity(pem: Option<&Path>) -> Result<Box<dyn Identity>> {
    let Some(path) = pem else {
        tracing::info!("No identity configured, using anonymous principal");
        return Ok(Box::new(AnonymousIdentity));
    };

    match BasicIdentity::from_pem_file(path) {
        Ok(identity) => {
            tracing::info!("Loaded Ed25519 identity from {}", path.display());
            return Ok(Box::new(identity));
        }
        Err(e) => tracing::debug!("{} is not an Ed25519 key: {}", path.display(), e),
    }

    let identity = Secp256k1Identity::from_pem_file(path).map_err(|e| {
        ClientError::Identity(format!("failed to load {}: {}", path.display(), e))
    })?;
    tracing::info!("Loaded secp256k1 identity from {}", path.display());
    Ok(Box::new(identity))
}
