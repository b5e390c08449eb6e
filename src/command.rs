use std::path::PathBuf;

use clap::Parser;

use crate::cfg::{Cfg, SslCertReqs};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "mongo-compat",
    version,
    about = "Connect to MongoDB and verify driver/server compatibility"
)]
pub struct Cli {
    /// JSON file with the module arguments
    pub args_file: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long, env = "MONGODB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[arg(long)]
    pub database: Option<String>,
    /// `--ssl true` or `--ssl false`, overrides the args file either way
    #[arg(long, action = clap::ArgAction::Set)]
    pub ssl: Option<bool>,
    #[arg(long, value_enum)]
    pub ssl_cert_reqs: Option<SslCertReqs>,

    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Module arguments from the args file, overridden by flags.
    pub fn cfg(&self) -> Result<Cfg> {
        let mut cfg = match &self.args_file {
            Some(path) => Cfg::load(path)?,
            None => Cfg::default(),
        };

        if let Some(host) = &self.host {
            cfg.host = host.to_owned();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if self.username.is_some() {
            cfg.username = self.username.clone();
        }
        if self.password.is_some() {
            cfg.password = self.password.clone();
        }
        if let Some(database) = &self.database {
            cfg.database = database.to_owned();
        }
        if let Some(ssl) = self.ssl {
            cfg.ssl = ssl;
        }
        if let Some(ssl_cert_reqs) = self.ssl_cert_reqs {
            cfg.ssl_cert_reqs = ssl_cert_reqs;
        }

        Ok(cfg)
    }
}
