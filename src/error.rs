use thiserror::Error;

use crate::version::{Version, VersionError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("This module requires the mongodb driver, rebuild with the `driver` feature")]
    MissingDependency,

    #[error("Connection refused, please check host and port are valid")]
    ConnectionRefused,

    #[error("{0}")]
    AuthenticationFailure(String),

    #[error("You must use {driver} {required}+ with MongoDB {server}")]
    VersionIncompatible {
        driver: String,
        required: Version,
        server: Version,
    },

    #[error(
        "This module doesn't support MongoDB older than {server_floor} \
         or {driver} older than {client_floor}"
    )]
    VersionUnsupported {
        driver: String,
        client_floor: Version,
        server_floor: Version,
    },

    /// The driver refused the server's wire protocol version.
    #[error("{0}")]
    WireVersion(String),

    #[error("Failed to parse version: {0}")]
    InvalidVersion(#[from] VersionError),

    #[error("{0}")]
    Driver(String),

    #[error("Invalid module arguments: {0}")]
    Config(String),
}
