//! Credentials for an authenticated host connection.

/// NATS credentials issued to a frame host bridge.
///
/// * `seed` – NKey seed (private key) used to sign the server challenge.
/// * `jwt`  – User JWT that authorises the connection with specific permissions.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HostCredentials {
    /// NKey seed for NATS authentication.
    pub seed: String,
    /// User JWT that encodes NATS permissions.
    pub jwt: String,
}
