use clap::Parser;
use log::Level::Error;
use log::Log;

use mongo_compat::command::Cli;
use mongo_compat::driver::Driver;
use mongo_compat::log_to_file;
use mongo_compat::module::{self, MongoModule};

#[cfg(feature = "driver")]
fn driver() -> Option<Box<dyn Driver>> {
    Some(Box::new(mongo_compat::mongo::MongoDriver::new()))
}

#[cfg(not(feature = "driver"))]
fn driver() -> Option<Box<dyn Driver>> {
    None
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = log_to_file::level_from_verbosity(cli.verbose);
    let logger = log_to_file::open(level, cli.log_file.as_deref());
    if let Err(e) = log_to_file::init(logger) {
        eprintln!("logging disabled: {e}");
    }

    let reply = match cli
        .cfg()
        .and_then(|cfg| MongoModule::new(cfg, driver()))
    {
        Ok(module) => module.run().await,
        Err(e) => {
            log::log!(Error, "{e}");
            module::fail(&e)
        }
    };

    reply.emit(std::io::stdout().lock())?;
    log::logger().flush();

    std::process::exit(reply.exit_code());
}
