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

//! Data-plane layer.
//!
//! Owns the channel transport contract, an in-process transport, and the
//! routing loop that moves messages from a source channel to its targets.
//!
//! ```
//! use std::sync::Arc;
//! use channel_router::{
//!     ChannelKey, InMemoryRouteStore, InMemoryTransport, Message, RouterContext,
//!     RoutingLoopConfig, RoutingStrategyKind,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let context = RouterContext::new(Arc::new(InMemoryRouteStore::new()));
//! let transport = Arc::new(InMemoryTransport::new());
//! let source = ChannelKey::new("queue.in");
//! let target = ChannelKey::new("queue.out");
//!
//! let router = context.create_router(source.clone()).await.unwrap();
//! router.set_routing_strategy(Some(RoutingStrategyKind::Fanout)).await.unwrap();
//! router.add_route(&target, &[]).await.unwrap();
//!
//! transport.enqueue(&source, Message::new("hello")).await.unwrap();
//! transport.close_channel(&source);
//!
//! let stats = router
//!     .routing_loop(transport.clone(), RoutingLoopConfig::default())
//!     .unwrap()
//!     .run()
//!     .await
//!     .unwrap();
//! assert_eq!(stats.forwarded, 1);
//! assert_eq!(transport.drain(&target).await.len(), 1);
//! # });
//! ```

pub(crate) mod memory_transport;
pub(crate) mod routing_loop;
pub(crate) mod transport;
