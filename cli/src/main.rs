/*
 * main.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Smolcurl, a raw-socket HTTP/1.1 command-line client.
 *
 * Smolcurl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Smolcurl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Smolcurl.  If not, see <http://www.gnu.org/licenses/>.
 */

//! smolcurl: send one HTTP/1.1 request over a raw TCP or TLS socket and print the raw response.

mod args;
mod output;

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use smolcurl_core::{CurlError, HeaderSink, HttpClient};

use crate::args::Args;
use crate::output::HeaderDump;

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {}", e);
    }
}

async fn run(args: &Args) -> Result<(), CurlError> {
    let target = args.target()?;
    let connect = args.connect_options();
    let request = args.request_options()?;

    let mut dump = args.dump_header.clone().map(HeaderDump::new);
    let sink = dump.as_mut().map(|d| d as &mut dyn HeaderSink);
    let response = HttpClient::new()
        .execute(&target, &connect, &request, sink)
        .await?;

    if let Err(e) = output::render(&mut io::stdout().lock(), response.bytes()) {
        tracing::error!("Failed to write response to stdout: {}", e);
    }

    if let Some(path) = &args.output {
        match output::save_response(path, response.bytes()) {
            Ok(()) => println!("Response saved to file: {}", path.display()),
            Err(e) => tracing::error!("{}", e),
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ CurlError::Usage(_)) => {
            eprintln!("{}", e);
            let _ = Args::command().print_help();
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
