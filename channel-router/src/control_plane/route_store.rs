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

//! Routing-table store contract and the in-memory sharded implementation.

use crate::channel_key::ChannelKey;
use crate::control_plane::route_mutation::RouteMutation;
use crate::control_plane::route_table::RouteTableEntry;
use crate::observability::events;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

const COMPONENT: &str = "route_store";

/// Failures raised by the shared routing-table store itself.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RouteStoreError {
    #[error("route store unavailable: {0}")]
    Unavailable(String),
    #[error("gave up on `{key}` after {attempts} conflicting update attempts")]
    Contention { key: ChannelKey, attempts: usize },
}

/// Cluster-shared map from source channel to its [`RouteTableEntry`].
///
/// Only three operations are needed by the routing core. `None` results mean
/// the entry is absent, which callers handle as a normal outcome.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Current snapshot of the entry for `key`.
    async fn get(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError>;

    /// Stores `entry` unless one already exists for its key. Returns the entry
    /// that was already there, or `None` when `entry` was inserted.
    async fn put_if_absent(
        &self,
        entry: RouteTableEntry,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError>;

    /// Runs `mutation` against the entry for `key` with no other mutation of
    /// that key interleaved, and returns the entry written back.
    async fn execute_atomically(
        &self,
        key: &ChannelKey,
        mutation: &RouteMutation,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError>;

    /// Explicitly deletes an entry. Nothing in the routing core calls this.
    async fn remove(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError>;
}

/// Process-local [`RouteStore`] backed by a sharded concurrent map.
///
/// A mutation holds only the shard lock of its own key while it computes the
/// replacement entry.
#[derive(Default)]
pub struct InMemoryRouteStore {
    entries: DashMap<ChannelKey, RouteTableEntry>,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn get(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put_if_absent(
        &self,
        entry: RouteTableEntry,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        match self.entries.entry(entry.channel_key().clone()) {
            Entry::Occupied(existing) => Ok(Some(existing.get().clone())),
            Entry::Vacant(slot) => {
                debug!(
                    event = events::ROUTE_ENTRY_CREATED,
                    component = COMPONENT,
                    channel_key = %entry.channel_key(),
                    "created route table entry"
                );
                slot.insert(entry);
                Ok(None)
            }
        }
    }

    async fn execute_atomically(
        &self,
        key: &ChannelKey,
        mutation: &RouteMutation,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        let Some(mut current) = self.entries.get_mut(key) else {
            debug!(
                event = events::ROUTE_ENTRY_ABSENT,
                component = COMPONENT,
                channel_key = %key,
                "mutation skipped for absent entry"
            );
            return Ok(None);
        };

        let next = mutation.apply(Some(current.value()));
        if let Some(next) = next.as_ref() {
            *current.value_mut() = next.clone();
        }
        Ok(next)
    }

    async fn remove(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        Ok(self.entries.remove(key).map(|(_, entry)| entry))
    }
}
