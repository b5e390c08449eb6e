use async_trait::async_trait;

use crate::cfg::SslCertReqs;
use crate::compat::{CompatibilityTable, STANDARD};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsSettings {
    pub cert_reqs: SslCertReqs,
}

impl TlsSettings {
    /// A server always presents its certificate, so `CERT_OPTIONAL` verifies
    /// it the same as `CERT_REQUIRED`.
    pub fn verify_peer(&self) -> bool {
        self.cert_reqs != SslCertReqs::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsSettings>,
}

/// A database driver the module can connect through.
#[async_trait]
pub trait Driver: Send + Sync {
    fn name(&self) -> &str;

    /// Version string the driver reports for itself.
    fn version(&self) -> &str;

    fn compatibility(&self) -> &'static CompatibilityTable {
        &STANDARD
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn Session>>;
}

/// An open connection. Dropping it releases the connection as well, `close`
/// waits for the release to finish.
#[async_trait]
pub trait Session: Send + Sync {
    /// Fails with `Error::AuthenticationFailure` when the credentials are
    /// rejected.
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<()>;

    /// Fails with `Error::ConnectionRefused` when no server can be reached.
    async fn server_version(&self) -> Result<String>;

    async fn close(self: Box<Self>);
}
