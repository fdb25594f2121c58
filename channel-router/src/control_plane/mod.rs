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

//! Control-plane layer.
//!
//! Owns the route-table data model, the per-key atomic mutations applied to it,
//! and the store contract that shares the table across broker nodes. Every
//! write goes through
//! [`RouteStore::execute_atomically`](crate::RouteStore::execute_atomically);
//! nothing mutates a cached entry in place.
//!
//! ```
//! use channel_router::{
//!     ChannelKey, InMemoryRouteStore, RouteMutation, RouteStore, RouteTableEntry,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = InMemoryRouteStore::new();
//! let source = ChannelKey::new("queue.in");
//! store.put_if_absent(RouteTableEntry::new(source.clone())).await.unwrap();
//!
//! let entry = store
//!     .execute_atomically(&source, &RouteMutation::add_route("queue.out".into(), &["a"]))
//!     .await
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(entry.routes().len(), 1);
//! # });
//! ```

pub(crate) mod optimistic_store;
pub(crate) mod route_mutation;
pub(crate) mod route_store;
pub(crate) mod route_table;
