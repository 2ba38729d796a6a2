/*
 * form.rs
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

//! `-d` bodies: urlencoded pairs or raw data, decided by the first item.

use crate::uri::form_encode;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Encode `-d` items.
///
/// If the first item contains `=`, every item is a `key=value` pair (split at the first `=`;
/// an item without one is the valueless pair `key=`), both sides percent-encoded, joined with
/// `&` in the order given. Otherwise all items are joined with `&` verbatim.
pub fn encode_data(items: &[String]) -> String {
    let Some(first) = items.first() else {
        return String::new();
    };
    if !first.contains('=') {
        return items.join("&");
    }
    items
        .iter()
        .map(|item| {
            let (key, value) = item.split_once('=').unwrap_or((item.as_str(), ""));
            format!("{}={}", form_encode(key), form_encode(value))
        })
        .collect::<Vec<_>>()
        .join("&")
}
