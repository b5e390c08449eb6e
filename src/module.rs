//! Connection glue shared by the MongoDB modules.
//!
//! `MongoModule::client` connects, authenticates when both a username and a
//! password are given, and refuses to hand out the session unless the driver
//! and server versions are compatible. Every failure is final for the run and
//! becomes a single `Reply::Fail`.

use log::Level::{Info, Trace, Warn};
use serde_json::json;

use crate::cfg::Cfg;
use crate::compat::CompatibilityResult;
use crate::driver::{ConnectOptions, Credentials, Driver, Session, TlsSettings};
use crate::error::{Error, Result};
use crate::msg::Reply;
use crate::version::Version;

pub const NAME: &str = "mongodb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSpec {
    pub name: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub tls: Option<TlsSettings>,
}

impl AuthSpec {
    fn from_cfg(cfg: &Cfg) -> Self {
        Self {
            name: cfg.username.clone(),
            password: cfg.password.clone(),
            database: cfg.database.clone(),
            tls: cfg.ssl.then_some(TlsSettings {
                cert_reqs: cfg.ssl_cert_reqs,
            }),
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        match (self.name.as_deref(), self.password.as_deref()) {
            (Some(name), Some(password)) if !name.is_empty() && !password.is_empty() => {
                Some(Credentials {
                    name: name.to_owned(),
                    password: password.to_owned(),
                    database: self.database.to_owned(),
                })
            }
            _ => None,
        }
    }
}

/// A session that passed the compatibility check.
pub struct Connection {
    pub session: Box<dyn Session>,
    pub server_version: Version,
}

impl Connection {
    pub async fn close(self) {
        self.session.close().await;
    }
}

pub struct MongoModule {
    cfg: Cfg,
    driver: Box<dyn Driver>,
    auth_spec: AuthSpec,
    warnings: Vec<String>,
}

impl MongoModule {
    /// `driver` is `None` when the binary was built without one.
    pub fn new(cfg: Cfg, driver: Option<Box<dyn Driver>>) -> Result<Self> {
        let driver = driver.ok_or(Error::MissingDependency)?;
        let auth_spec = AuthSpec::from_cfg(&cfg);

        let mut module = Self {
            cfg,
            driver,
            auth_spec,
            warnings: vec![],
        };

        let given = module.auth_spec.name.is_some() || module.auth_spec.password.is_some();
        if given && module.auth_spec.credentials().is_none() {
            module.warn(
                "username and password must be given together, connecting without authentication",
            );
        }

        Ok(module)
    }

    pub fn auth_spec(&self) -> &AuthSpec {
        &self.auth_spec
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn warn(&mut self, msg: &str) {
        log::log!(Warn, "[{NAME}] {msg}");
        self.warnings.push(msg.to_owned());
    }

    /// Returns a connected, authenticated, version-checked session.
    pub async fn client(&self) -> Result<Connection> {
        let options = ConnectOptions {
            host: self.cfg.host.to_owned(),
            port: self.cfg.port,
            tls: self.auth_spec.tls,
        };

        log::log!(
            Info,
            "[{NAME}] connecting to {}:{} with {} {}",
            options.host,
            options.port,
            self.driver.name(),
            self.driver.version()
        );

        let mut session = self.driver.connect(&options).await?;

        if let Some(credentials) = self.auth_spec.credentials() {
            if let Err(e) = session.authenticate(&credentials).await {
                return abort(session, e).await;
            }
        }

        match self.check_compatibility(session.as_ref()).await {
            Ok(server_version) => Ok(Connection {
                session,
                server_version,
            }),
            Err(e) => abort(session, e).await,
        }
    }

    /// Fetches the server version and checks it against the driver's table.
    pub async fn check_compatibility(&self, session: &dyn Session) -> Result<Version> {
        let server = Version::parse(&session.server_version().await?)?;
        let client = Version::parse(self.driver.version())?;
        let table = self.driver.compatibility();

        log::log!(Trace, "[{NAME}] driver {client}, server {server}");

        match table.check(&client, &server) {
            CompatibilityResult::Compatible => Ok(server),
            CompatibilityResult::Incompatible {
                required_client,
                server,
            } => Err(Error::VersionIncompatible {
                driver: self.driver.name().to_owned(),
                required: required_client,
                server,
            }),
            CompatibilityResult::Unsupported => Err(Error::VersionUnsupported {
                driver: self.driver.name().to_owned(),
                client_floor: table.client_floor(),
                server_floor: table.server_floor(),
            }),
        }
    }

    pub fn exit_json(&self, data: serde_json::Map<String, serde_json::Value>) -> Reply {
        Reply::Exit {
            changed: false,
            warnings: self.warnings.clone(),
            data,
        }
    }

    pub fn fail_json(&self, msg: impl Into<String>) -> Reply {
        Reply::Fail {
            failed: true,
            msg: msg.into(),
            warnings: self.warnings.clone(),
        }
    }

    /// Connects, reports the versions in use and releases the connection.
    pub async fn run(&self) -> Reply {
        let connection = match self.client().await {
            Ok(t) => t,
            Err(e) => {
                log::log!(log::Level::Error, "[{NAME}] {e}");
                return self.fail_json(e.to_string());
            }
        };

        let server = connection.server_version.to_string();
        connection.close().await;

        let mut data = serde_json::Map::new();
        data.insert("host".to_owned(), json!(self.cfg.host));
        data.insert("port".to_owned(), json!(self.cfg.port));
        data.insert("server_version".to_owned(), json!(server));
        data.insert("driver".to_owned(), json!(self.driver.name()));
        data.insert("driver_version".to_owned(), json!(self.driver.version()));
        data.insert(
            "authenticated".to_owned(),
            json!(self.auth_spec.credentials().is_some()),
        );

        self.exit_json(data)
    }
}

async fn abort<T>(session: Box<dyn Session>, e: Error) -> Result<T> {
    log::log!(Trace, "[{NAME}] closing connection: {e}");
    session.close().await;
    Err(e)
}

/// Builds the reply for a failure that happened before a module existed.
pub fn fail(e: &Error) -> Reply {
    Reply::Fail {
        failed: true,
        msg: e.to_string(),
        warnings: vec![],
    }
}
