/*
 * args.rs
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

//! Command-line arguments and their mapping onto the core's option types.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use smolcurl_core::config::DEFAULT_USER_AGENT;
use smolcurl_core::{BodyDescriptor, ConnectOptions, CurlError, RequestOptions, Target};

const BANNER: &str = r"
███████╗███╗   ███╗ ██████╗ ██╗       ██████╗██╗   ██╗██████╗ ██╗
██╔════╝████╗ ████║██╔═══██╗██║      ██╔════╝██║   ██║██╔══██╗██║
███████╗██╔████╔██║██║   ██║██║█████╗██║     ██║   ██║██████╔╝██║
╚════██║██║╚██╔╝██║██║   ██║██║╚════╝██║     ██║   ██║██╔══██╗██║
███████║██║ ╚═╝ ██║╚██████╔╝███████╗ ╚██████╗╚██████╔╝██║  ██║███████╗
╚══════╝╚═╝     ╚═╝ ╚═════╝ ╚══════╝  ╚═════╝ ╚═════╝ ╚═╝  ╚═╝╚══════╝";

#[derive(Parser, Debug)]
#[command(
    name = "smolcurl",
    version,
    about = "Send one HTTP/1.1 request over a raw socket and print the raw response",
    before_help = BANNER
)]
pub struct Args {
    /// Specify the User-Agent string
    #[arg(short = 'a', long = "user-agent", value_name = "STRING", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Allow insecure server connections when using SSL
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Make the request more detailed
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Maximum time allowed for the operation in seconds (0 for none)
    #[arg(short = 'm', long = "max-time", value_name = "SECONDS", default_value_t = 0)]
    pub max_time: u64,

    /// Specify the user name and password for server authentication
    #[arg(short = 'u', long = "user", value_name = "USER:PASS")]
    pub user: Option<String>,

    /// Write the response to the specified file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// HTTP POST data
    #[arg(short = 'd', long = "data", value_name = "DATA")]
    pub data: Vec<String>,

    /// Send HTTP HEAD request instead of GET
    #[arg(short = 'I', long = "head")]
    pub head: bool,

    /// Specify the client certificate file for HTTPS
    #[arg(short = 'E', long = "cert", value_name = "FILE")]
    pub cert: Option<PathBuf>,

    /// Write the response headers to the specified file
    #[arg(short = 'D', long = "dump-header", value_name = "FILE")]
    pub dump_header: Option<PathBuf>,

    /// Specify custom request method
    #[arg(short = 'X', long = "request", value_name = "METHOD")]
    pub request: Option<String>,

    /// Pass custom header(s) to server
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Specify HTTP multipart POST data
    #[arg(short = 'F', long = "form", value_name = "NAME=CONTENT")]
    pub form: Vec<String>,

    /// Send the specified cookies with the request
    #[arg(long, value_name = "DATA")]
    pub cookie: Option<String>,

    /// Maximum time allowed for connection in seconds (0 for default)
    #[arg(long = "connect-timeout", value_name = "SECONDS", default_value_t = 0)]
    pub connect_timeout: u64,

    /// Target host, optionally with scheme and path
    #[arg(value_name = "HOST")]
    pub targets: Vec<String>,
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl Args {
    /// The single positional target. Any other count is a usage error.
    pub fn target(&self) -> Result<Target, CurlError> {
        match self.targets.as_slice() {
            [one] => Ok(Target::parse(one)),
            other => Err(CurlError::Usage(format!(
                "expected exactly one target, got {}",
                other.len()
            ))),
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            insecure: self.insecure,
            client_cert: self.cert.clone(),
            connect_timeout: seconds(self.connect_timeout),
            total_timeout: seconds(self.max_time),
            ..ConnectOptions::default()
        }
    }

    /// Fails only when `-F` fields are present and one of them is malformed.
    pub fn request_options(&self) -> Result<RequestOptions, CurlError> {
        Ok(RequestOptions {
            user_agent: self.user_agent.clone(),
            custom_method: self.request.clone(),
            head_only: self.head,
            headers: self.headers.clone(),
            cookie: self.cookie.clone(),
            credentials: self.user.clone(),
            body: BodyDescriptor::select(&self.data, &self.form)?,
        })
    }
}
