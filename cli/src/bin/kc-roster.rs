// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use clap::Parser;
use slog::Drain;
use slog::o;

use kc_roster_cli::Cli;
use kc_roster_cli::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let log = slog::Logger::root(drain, o!());

    // Captured once here so the rest of the program never touches the
    // environment directly.
    let env_secret = std::env::var("KEYCLOAK_SECRET").ok();

    run(&log, cli, env_secret).await
}
