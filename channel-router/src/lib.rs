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

//! # channel-router
//!
//! `channel-router` is the routing core of a message broker: it forwards every
//! message arriving on a source channel to zero or more target channels,
//! according to a per-source routing table shared by every node that handles
//! that channel.
//!
//! Routing configuration is changed through [`Router`] handles. Each change is
//! one atomic mutation of the source's [`RouteTableEntry`] in a [`RouteStore`],
//! so concurrent writers on any number of handles never lose each other's
//! updates. A [`RoutingLoop`] drains the source channel and re-reads the entry
//! for every message, so changes apply from the next message on.
//!
//! ## Quick start
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
//! let orders = ChannelKey::new("orders");
//! let billing = ChannelKey::new("billing");
//! let shipping = ChannelKey::new("shipping");
//!
//! let router = context.create_router(orders.clone()).await.unwrap();
//! router
//!     .set_routing_strategy(Some(RoutingStrategyKind::Direct))
//!     .await
//!     .unwrap();
//! router.add_route(&billing, &["paid"]).await.unwrap();
//! router.add_route(&shipping, &["paid", "packed"]).await.unwrap();
//!
//! transport
//!     .enqueue(&orders, Message::new("o-1").with_routing_key("paid"))
//!     .await
//!     .unwrap();
//! transport
//!     .enqueue(&orders, Message::new("o-2").with_routing_key("packed"))
//!     .await
//!     .unwrap();
//! transport.close_channel(&orders);
//!
//! let stats = router
//!     .routing_loop(transport.clone(), RoutingLoopConfig::default())
//!     .unwrap()
//!     .run()
//!     .await
//!     .unwrap();
//!
//! assert_eq!(stats.received, 2);
//! assert_eq!(transport.drain(&billing).await.len(), 1);
//! assert_eq!(transport.drain(&shipping).await.len(), 2);
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: [`Router`] handles created by a [`RouterContext`]
//! - Control plane: route-table model, pure mutations and the route stores
//! - Routing: strategies that pick targets for one message
//! - Data plane: channel transport contract and the routing loop
//! - Runtime: dedicated worker threads for routing loops
//! - Protocol: frame model, receipt handler and client faults used by the
//!   surrounding broker
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events. Library code emits structured
//! events (`event`, `component` and domain fields) and never initializes a
//! global subscriber. Binaries and tests are responsible for one-time
//! `tracing_subscriber` initialization at process boundaries.

mod channel_key;
pub use channel_key::ChannelKey;

mod message;
pub use message::{Message, ROUTING_KEY_HEADER};

mod wait_policy;
pub use wait_policy::WaitPolicy;

mod control_plane;
pub use control_plane::optimistic_store::{
    InMemoryVersionedBackend, OptimisticRouteStore, VersionedRouteBackend, DEFAULT_MAX_ATTEMPTS,
};
pub use control_plane::route_mutation::RouteMutation;
pub use control_plane::route_store::{InMemoryRouteStore, RouteStore, RouteStoreError};
pub use control_plane::route_table::{Route, RouteTableEntry, DEFAULT_ROUTING_KEY};

mod routing;
pub use routing::direct::DirectRoutingStrategy;
pub use routing::fanout::FanoutRoutingStrategy;
pub use routing::topic::TopicRoutingStrategy;
pub use routing::{RoutingStrategy, RoutingStrategyKind};

mod router;
pub use router::{Router, RouterError};

mod router_context;
pub use router_context::RouterContext;

mod data_plane;
pub use data_plane::memory_transport::InMemoryTransport;
pub use data_plane::routing_loop::{
    LoopState, RoutingLoop, RoutingLoopConfig, RoutingLoopError, RoutingLoopStats, SendFailure,
};
pub use data_plane::transport::{Channel, ChannelTransport, ScopedChannel, TransportError};

mod protocol;
pub use protocol::client_fault::ClientFault;
pub use protocol::frame::{
    Command, Frame, FrameHandler, FrameSink, MESSAGE_HEADER, RECEIPT_HEADER, RECEIPT_ID_HEADER,
};
pub use protocol::receipt::ReceiptWritingHandler;

mod runtime;
pub use runtime::worker_runtime::{spawn_routing_loop, RoutingLoopHandle, WorkerRuntimeError};

#[doc(hidden)]
pub mod observability;
