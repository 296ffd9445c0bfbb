// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

/// How to ask a human for the client secret when the environment does not
/// provide one. A trait so tests can answer without a terminal.
pub trait SecretPrompt {
    fn prompt_secret(&self, client_id: &str) -> io::Result<String>;
}

/// Masked prompt on the controlling terminal.
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn prompt_secret(&self, client_id: &str) -> io::Result<String> {
        rpassword::prompt_password(format!(
            "Confidential client secret for {client_id}: "
        ))
    }
}

/// Resolve the client secret: a non-empty environment value wins, anything
/// else falls through to the prompt. Whatever the prompt returns is used
/// verbatim, an empty line included.
pub fn client_secret(
    env_secret: Option<String>,
    prompt: &dyn SecretPrompt,
    client_id: &str,
) -> io::Result<String> {
    match env_secret {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => prompt.prompt_secret(client_id),
    }
}
