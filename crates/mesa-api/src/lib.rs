// mesa-api: token-bearing HTTP gateway and credential storage for the FR backend

pub mod credential;
pub mod error;
pub mod gateway;
pub mod transport;

pub use credential::{
    CredentialStore, DEFAULT_TOKEN_SLOT, FileStore, KEYRING_SERVICE, KeyringStore, MemoryStore,
};
pub use error::Error;
pub use gateway::Gateway;
pub use transport::{TlsMode, TransportConfig};

pub use reqwest::Method;
pub use secrecy::{ExposeSecret, SecretString};
