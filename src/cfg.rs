use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEF_HOST: &str = "localhost";
pub const DEF_PORT: u16 = 27017;
pub const DEF_DATABASE: &str = "admin";

fn default_host() -> String {
    DEF_HOST.to_string()
}

fn default_port() -> u16 {
    DEF_PORT
}

fn default_database() -> String {
    DEF_DATABASE.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SslCertReqs {
    #[serde(rename = "CERT_NONE")]
    #[value(name = "CERT_NONE")]
    None,
    #[serde(rename = "CERT_OPTIONAL")]
    #[value(name = "CERT_OPTIONAL")]
    Optional,
    #[default]
    #[serde(rename = "CERT_REQUIRED")]
    #[value(name = "CERT_REQUIRED")]
    Required,
}

/// Connection arguments shared by every MongoDB module.
///
/// Keys the connection does not know about are kept in `extra` for the
/// module that owns them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cfg {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub ssl_cert_reqs: SslCertReqs,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            database: default_database(),
            ssl: false,
            ssl_cert_reqs: SslCertReqs::default(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Cfg {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }
}
