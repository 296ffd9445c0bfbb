// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// Everything that can abort an invocation. Nothing in here is retried or
/// recovered from: callers propagate these straight out of the process.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The roster file is missing or unreadable.
    #[error("failed to read roster {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The roster file was readable but is not well-formed CSV (ragged
    /// rows, unbalanced quoting, a missing required column).
    #[error("malformed roster CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// The client-credentials grant was rejected, or the realm could not
    /// be reached at all.
    #[error("authentication against {token_url} failed: {detail}")]
    Authentication { token_url: String, detail: String },

    /// An admin call was rejected by the identity provider, or failed in
    /// transport. `status` is present when the remote answered at all.
    #[error("{op} failed{}: {detail}", fmt_status(.status))]
    RemoteApi {
        op: &'static str,
        status: Option<StatusCode>,
        detail: String,
    },
}

impl Error {
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileRead { path: path.into(), source }
    }

    pub fn authentication(
        token_url: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Error::Authentication {
            token_url: token_url.into(),
            detail: detail.into(),
        }
    }

    /// A rejection the remote expressed with an HTTP status.
    pub fn remote(
        op: &'static str,
        status: StatusCode,
        detail: impl Into<String>,
    ) -> Self {
        Error::RemoteApi { op, status: Some(status), detail: detail.into() }
    }

    /// A call that never produced a response (DNS, connect, timeout).
    pub fn remote_transport(op: &'static str, source: reqwest::Error) -> Self {
        Error::RemoteApi { op, status: None, detail: source.to_string() }
    }
}

fn fmt_status(status: &Option<StatusCode>) -> String {
    match status {
        Some(status) => format!(" with HTTP {status}"),
        None => String::new(),
    }
}
