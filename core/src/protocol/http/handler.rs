/*
 * handler.rs
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

//! Header sink: receives the raw response header block once, as soon as it is complete.

/// Called by the read loop with the bytes from the start of the response up to and including
/// the first CRLFCRLF. Called at most once per response.
pub trait HeaderSink {
    fn headers(&mut self, block: &[u8]);
}

/// Collects the header block in memory.
impl HeaderSink for Vec<u8> {
    fn headers(&mut self, block: &[u8]) {
        self.extend_from_slice(block);
    }
}
