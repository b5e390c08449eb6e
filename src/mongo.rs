use async_trait::async_trait;
use log::Level::Trace;
use mongodb::{
    bson::doc,
    error::ErrorKind,
    options::{ClientOptions, Credential, ServerAddress, Tls, TlsOptions},
    Client,
};

use crate::compat::{CompatibilityRule, CompatibilityTable};
use crate::driver::{ConnectOptions, Credentials, Driver, Session};
use crate::error::{Error, Result};

pub const NAME: &str = "mongodb";

/// Release of the `mongodb` crate this build is pinned to. Must match the
/// exact requirement in `Cargo.toml`.
pub const DRIVER_VERSION: &str = "3.2.3";

const AUTHENTICATION_FAILED: i32 = 18;

/// The 3.2 driver needs wire version 7, which MongoDB 4.0 introduced.
pub const COMPATIBILITY: CompatibilityTable = CompatibilityTable {
    rules: &[CompatibilityRule::new(&[3, 0], &[4, 0])],
    client_floor: &[3, 0],
    server_floor: &[4, 0],
};

/// Server selection also fails when the server is reachable but speaks a
/// wire version the driver refuses.
fn selection_err(message: &str) -> Error {
    if !message.contains("wire version") {
        return Error::ConnectionRefused;
    }

    if message.contains("requires at least") {
        Error::VersionUnsupported {
            driver: NAME.to_owned(),
            client_floor: COMPATIBILITY.client_floor(),
            server_floor: COMPATIBILITY.server_floor(),
        }
    } else {
        Error::WireVersion(message.to_owned())
    }
}

fn map_err(e: mongodb::error::Error) -> Error {
    match e.kind.as_ref() {
        ErrorKind::ServerSelection { message, .. } => selection_err(message),
        ErrorKind::Authentication { .. } => Error::AuthenticationFailure(e.to_string()),
        ErrorKind::Command(cmd) if cmd.code == AUTHENTICATION_FAILED => {
            Error::AuthenticationFailure(e.to_string())
        }
        _ => Error::Driver(e.to_string()),
    }
}

fn client_options(options: &ConnectOptions) -> ClientOptions {
    let mut client_options = ClientOptions::default();
    client_options.hosts = vec![ServerAddress::Tcp {
        host: options.host.to_owned(),
        port: Some(options.port),
    }];
    client_options.app_name = Some(env!("CARGO_PKG_NAME").to_owned());

    if let Some(tls) = &options.tls {
        let tls_options = TlsOptions::builder()
            .allow_invalid_certificates(!tls.verify_peer())
            .build();
        client_options.tls = Some(Tls::Enabled(tls_options));
    }

    client_options
}

#[derive(Debug, Default)]
pub struct MongoDriver;

impl MongoDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Driver for MongoDriver {
    fn name(&self) -> &str {
        NAME
    }

    fn version(&self) -> &str {
        DRIVER_VERSION
    }

    fn compatibility(&self) -> &'static CompatibilityTable {
        &COMPATIBILITY
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn Session>> {
        let client_options = client_options(options);
        let client = Client::with_options(client_options.clone()).map_err(map_err)?;

        log::log!(
            Trace,
            "[{NAME}] client created for {}:{}",
            options.host,
            options.port
        );

        Ok(Box::new(MongoSession {
            client,
            options: client_options,
        }))
    }
}

pub struct MongoSession {
    client: Client,
    options: ClientOptions,
}

#[async_trait]
impl Session for MongoSession {
    // The driver authenticates during the connection handshake, so the
    // client is rebuilt with the credential and a ping forces the handshake.
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<()> {
        let mut options = self.options.clone();
        options.credential = Some(
            Credential::builder()
                .username(credentials.name.to_owned())
                .password(credentials.password.to_owned())
                .source(credentials.database.to_owned())
                .build(),
        );

        let client = Client::with_options(options.clone()).map_err(map_err)?;
        if let Err(e) = client.database("admin").run_command(doc! {"ping": 1}).await {
            client.shutdown().await;
            return Err(map_err(e));
        }

        let old = std::mem::replace(&mut self.client, client);
        old.shutdown().await;
        self.options = options;

        log::log!(
            Trace,
            "[{NAME}] authenticated as {} on {}",
            credentials.name,
            credentials.database
        );

        Ok(())
    }

    async fn server_version(&self) -> Result<String> {
        let info = self
            .client
            .database("admin")
            .run_command(doc! {"buildInfo": 1})
            .await
            .map_err(map_err)?;

        info.get_str("version")
            .map(str::to_owned)
            .map_err(|e| Error::Driver(format!("buildInfo has no version: {e}")))
    }

    async fn close(self: Box<Self>) {
        self.client.shutdown().await;
    }
}
