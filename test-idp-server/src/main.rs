// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use kc_roster_test_idp_server::ServerContext;
use kc_roster_test_idp_server::create_http_server;

#[derive(Debug, Parser)]
#[clap(about = "Stub Keycloak-style identity provider")]
struct Args {
    // The real server's customary dev port.
    #[clap(long, default_value = "127.0.0.1:8080")]
    bind_addr: SocketAddr,

    #[clap(long, default_value = "emssa")]
    realm: String,

    #[clap(long, default_value = "gate_api")]
    client_id: String,

    #[clap(long, default_value = "secret")]
    client_secret: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt: Args = Args::try_parse()?;

    let context = Arc::new(ServerContext::new(
        opt.realm,
        opt.client_id,
        opt.client_secret,
    ));

    let http_server = create_http_server(Some(opt.bind_addr), context)?;
    if let Err(s) = http_server.await {
        anyhow::bail!("Error from start(): {}", s);
    }

    Ok(())
}
