/*
 * output.rs
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

//! File and terminal output: header dump, response file, stdout rendering.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use smolcurl_core::{CurlError, HeaderSink};

const SEPARATOR_WIDTH: usize = 50;

/// Writes the captured header block to a file (`-D`). Write failures are logged, not fatal.
pub struct HeaderDump {
    path: PathBuf,
    written: bool,
}

impl HeaderDump {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            written: false,
        }
    }

    pub fn written(&self) -> bool {
        self.written
    }
}

impl HeaderSink for HeaderDump {
    fn headers(&mut self, block: &[u8]) {
        match fs::write(&self.path, block) {
            Ok(()) => {
                self.written = true;
                tracing::info!("Headers written to {}", self.path.display());
            }
            Err(source) => {
                let err = CurlError::Output {
                    path: self.path.clone(),
                    source,
                };
                tracing::error!("{}", err);
            }
        }
    }
}

/// Save the entire accumulated response (`-o`), creating or truncating the file.
pub fn save_response(path: &Path, bytes: &[u8]) -> Result<(), CurlError> {
    fs::write(path, bytes).map_err(|source| CurlError::Output {
        path: path.to_path_buf(),
        source,
    })
}

/// Print the response bytes unchanged, a newline, then the separator line.
pub fn render<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    out.flush()
}
