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

//! Routing-strategy layer.
//!
//! A strategy is a pure decision: given a message and the current routes of its
//! source channel, which target channels should receive it. Strategies are
//! stored on the route-table entry as [`RoutingStrategyKind`] so they travel
//! through the shared store with the routes they apply to.
//!
//! ```
//! use std::collections::BTreeSet;
//! use channel_router::{
//!     ChannelKey, DirectRoutingStrategy, Message, Route, RoutingStrategy,
//! };
//!
//! let routes = vec![
//!     Route::new(ChannelKey::new("eu"), BTreeSet::from(["eu".to_string()])).unwrap(),
//!     Route::new(ChannelKey::new("us"), BTreeSet::from(["us".to_string()])).unwrap(),
//! ];
//! let message = Message::new("order").with_routing_key("eu");
//!
//! let targets = DirectRoutingStrategy.route(&message, &routes);
//! assert_eq!(targets, BTreeSet::from([ChannelKey::new("eu")]));
//! ```

pub(crate) mod direct;
pub(crate) mod fanout;
pub(crate) mod strategy;
pub(crate) mod topic;

pub use strategy::{RoutingStrategy, RoutingStrategyKind};
