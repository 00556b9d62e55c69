//! main.rs
//! Entry point for hdls

use hdls::config::Config;
use hdls::core::{Listing, RawArgument, namenode_override, resolve_arguments};
use hdls::error::Result;
use hdls::session::SessionProvider;
use hdls::utils::cli::Cli;
use hdls::utils::logging::init_logging;

use chrono::Local;
use clap::Parser;

use std::io::{BufWriter, stdout};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hdls: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let raw = cli
        .paths
        .iter()
        .map(|p| RawArgument::parse(p))
        .collect::<Result<Vec<_>>>()?;
    let namenode = namenode_override(&raw)?;

    let provider = SessionProvider::new(config.connection());
    let session = provider.get_or_create(namenode.as_deref())?;
    let client = session.client();

    let args = resolve_arguments(client, session.home(), raw)?;
    let out = BufWriter::new(stdout().lock());
    Listing::new(client, session.home(), cli.list_options()).run(args, out, Local::now())
}
