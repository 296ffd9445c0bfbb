// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use slog::Logger;
use slog::info;

use kc_roster::KeycloakAdmin;
use kc_roster::RealmConfig;
use kc_roster::TerminalPrompt;
use kc_roster::client_secret;
use kc_roster::flush_realm;
use kc_roster::import_roster;
use kc_roster::read_roster;

#[derive(Debug, Parser)]
#[clap(name = "kc-roster", version = "1.0.0", about = "Keycloak Utilities")]
pub struct Cli {
    /// Per-request timeout, in seconds, for every call to the identity
    /// provider.
    #[clap(long, global = true, default_value_t = 30)]
    pub request_timeout: u64,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read a CSV full of user information and create those users on a
    /// KeyCloak instance.
    Convert {
        path_to_csv: PathBuf,
        keycloak_url: String,

        #[clap(flatten)]
        realm_opts: RealmOpts,
    },

    /// Delete all users from the KeyCloak realm. WARNING: Highly
    /// destructive command, cannot be undone.
    #[clap(name = "flushUsers", alias = "flush-users")]
    FlushUsers {
        keycloak_url: String,

        #[clap(flatten)]
        realm_opts: RealmOpts,

        /// Skip the confirmation prompt.
        #[clap(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct RealmOpts {
    /// Confidential clientId providing KeyCloak "manage-users" rights.
    #[clap(short = 'c', long, env = "KEYCLOAK_APP", default_value = "gate_api")]
    pub keycloak_client_id: String,

    /// KeyCloak realm name.
    #[clap(short = 'r', long, env = "KEYCLOAK_REALM", default_value = "emssa")]
    pub keycloak_realm: String,
}

impl RealmOpts {
    fn realm_config(
        &self,
        keycloak_url: &str,
        request_timeout: Duration,
    ) -> RealmConfig {
        RealmConfig {
            base_url: keycloak_url.to_string(),
            realm: self.keycloak_realm.clone(),
            client_id: self.keycloak_client_id.clone(),
            request_timeout,
        }
    }
}

/// Dispatch a parsed invocation. `env_secret` is the KEYCLOAK_SECRET value
/// captured by the caller, if it was set.
pub async fn run(
    log: &Logger,
    cli: Cli,
    env_secret: Option<String>,
) -> anyhow::Result<()> {
    let request_timeout = Duration::from_secs(cli.request_timeout);

    match cli.command {
        Command::Convert { path_to_csv, keycloak_url, realm_opts } => {
            convert(
                log,
                &path_to_csv,
                &keycloak_url,
                &realm_opts,
                request_timeout,
                env_secret,
            )
            .await
        }

        Command::FlushUsers { keycloak_url, realm_opts, yes } => {
            flush_users(
                log,
                &keycloak_url,
                &realm_opts,
                request_timeout,
                env_secret,
                yes,
            )
            .await
        }
    }
}

async fn connect(
    log: &Logger,
    keycloak_url: &str,
    realm_opts: &RealmOpts,
    request_timeout: Duration,
    env_secret: Option<String>,
) -> anyhow::Result<KeycloakAdmin> {
    info!(log, "connecting"; "url" => keycloak_url);

    let secret = client_secret(
        env_secret,
        &TerminalPrompt,
        &realm_opts.keycloak_client_id,
    )
    .context("reading client secret")?;

    let config = realm_opts.realm_config(keycloak_url, request_timeout);
    let admin = KeycloakAdmin::connect(config, &secret).await?;

    Ok(admin)
}

async fn convert(
    log: &Logger,
    path_to_csv: &Path,
    keycloak_url: &str,
    realm_opts: &RealmOpts,
    request_timeout: Duration,
    env_secret: Option<String>,
) -> anyhow::Result<()> {
    info!(log, "reading roster"; "path" => %path_to_csv.display());
    let records = read_roster(path_to_csv)?;

    let admin =
        connect(log, keycloak_url, realm_opts, request_timeout, env_secret)
            .await?;

    let ids = import_roster(log, &admin, &records).await?;

    info!(log, "done"; "created" => ids.len());
    Ok(())
}

async fn flush_users(
    log: &Logger,
    keycloak_url: &str,
    realm_opts: &RealmOpts,
    request_timeout: Duration,
    env_secret: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    if !yes && !confirm_flush(&realm_opts.keycloak_realm)? {
        println!("Aborted.");
        return Ok(());
    }

    let admin =
        connect(log, keycloak_url, realm_opts, request_timeout, env_secret)
            .await?;

    let deleted = flush_realm(log, &admin).await?;

    info!(log, "done"; "deleted" => deleted);
    Ok(())
}

/// The operator must type the word out; anything else aborts. `-y`
/// bypasses the prompt.
fn confirm_flush(realm: &str) -> io::Result<bool> {
    print!("Delete ALL users from realm {realm}? Type 'yes' to continue: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(line.trim() == "yes")
}
