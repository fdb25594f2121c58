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
use anyhow::Context;
use channel_router::{
    spawn_routing_loop, ChannelKey, InMemoryTransport, Message, RouterContext, RoutingLoopStats,
    WorkerRuntimeError,
};
use clap::Parser;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command()]
struct RouterArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started configurable-router");

    let args = RouterArgs::parse();
    let config = Config::load(&args.config)?;

    let context = RouterContext::new(config.store.build());
    let transport = Arc::new(InMemoryTransport::new());
    let mut routers = Vec::with_capacity(config.routers.len());
    let mut targets = BTreeSet::new();

    // configure the routing tables
    for router_config in &config.routers {
        let router = context
            .create_router(ChannelKey::new(router_config.source.as_str()))
            .await
            .with_context(|| format!("unable to open router for {}", router_config.source))?;
        router
            .set_routing_strategy(router_config.strategy.clone())
            .await?;
        for route in &router_config.routes {
            let target = ChannelKey::new(route.target.as_str());
            let routing_keys: Vec<&str> = route.routing_keys.iter().map(String::as_str).collect();
            router.add_route(&target, &routing_keys).await?;
            targets.insert(target);
        }
        routers.push(router);
    }

    // seed the sources, then close them so every loop drains and stops
    for seed in &config.seed_messages {
        let message = match &seed.routing_key {
            Some(routing_key) => Message::new(seed.body.as_str()).with_routing_key(routing_key),
            None => Message::new(seed.body.as_str()),
        };
        transport
            .enqueue(&ChannelKey::new(seed.source.as_str()), message)
            .await?;
    }
    for router in &routers {
        transport.close_channel(router.channel_key());
    }

    let mut handles = Vec::with_capacity(routers.len());
    for router in &routers {
        let routing_loop = router.routing_loop(transport.clone(), config.router_config)?;
        let thread_name = format!("router-{}", router.channel_key());
        handles.push(spawn_routing_loop(&thread_name, routing_loop)?);
    }

    let mut total = RoutingLoopStats::default();
    for handle in handles {
        let worker_thread = handle.worker_thread().to_string();
        match tokio::task::spawn_blocking(move || handle.join()).await? {
            Ok(stats) => {
                info!(
                    worker_thread = worker_thread.as_str(),
                    received = stats.received,
                    forwarded = stats.forwarded,
                    dropped = stats.dropped,
                    send_failures = stats.send_failures(),
                    "routing loop finished"
                );
                for failure in &stats.send_errors {
                    warn!(
                        worker_thread = worker_thread.as_str(),
                        target_key = %failure.target_key,
                        msg_id = %failure.msg_id,
                        err = %failure.error,
                        "message not delivered to target"
                    );
                }
                total.received += stats.received;
                total.forwarded += stats.forwarded;
                total.dropped += stats.dropped;
                total.send_errors.extend(stats.send_errors);
            }
            Err(WorkerRuntimeError::Loop(err)) => {
                let msg_id = err.message().map(|message| message.id.to_string());
                warn!(
                    worker_thread = worker_thread.as_str(),
                    msg_id = msg_id.as_deref().unwrap_or("none"),
                    err = %err,
                    "routing loop failed"
                );
            }
            Err(err) => warn!(
                worker_thread = worker_thread.as_str(),
                err = %err,
                "routing loop failed"
            ),
        }
    }

    for target in &targets {
        let delivered = transport.drain(target).await;
        info!(
            target_key = %target,
            delivered = delivered.len(),
            "target delivery summary"
        );
    }

    info!(
        routers = context.live_routers(),
        received = total.received,
        forwarded = total.forwarded,
        dropped = total.dropped,
        send_failures = total.send_failures(),
        "configurable-router finished"
    );

    for router in &routers {
        router.close();
    }

    Ok(())
}
