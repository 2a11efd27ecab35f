/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

mod config;

use crate::config::Config;
use clap::Parser;
use copss_router::runtime::RouterNode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "COPSS content-oriented pub/sub router")]
struct RouterdArgs {
    /// JSON5 configuration file; built-in defaults are used without it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args = RouterdArgs::parse();
    let config = match args.config {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let options = config.router_options()?;
    info!(mode = ?options.mode, listen = %options.listen_addr, "Started copss-routerd");

    let node = RouterNode::bind(options).await?;
    node.run_until(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;

    info!("Stopped copss-routerd");
    Ok(())
}
