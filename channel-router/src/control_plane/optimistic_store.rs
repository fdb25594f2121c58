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

//! Compare-and-swap adapter for stores without a single-key transaction.

use crate::channel_key::ChannelKey;
use crate::control_plane::route_mutation::RouteMutation;
use crate::control_plane::route_store::{RouteStore, RouteStoreError};
use crate::control_plane::route_table::RouteTableEntry;
use crate::observability::events;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

const COMPONENT: &str = "optimistic_store";

/// Attempts allowed per mutation before [`RouteStoreError::Contention`].
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Key-value backend that versions every entry and can swap conditionally.
#[async_trait]
pub trait VersionedRouteBackend: Send + Sync {
    async fn load(&self, key: &ChannelKey)
        -> Result<Option<(u64, RouteTableEntry)>, RouteStoreError>;

    /// Inserts at version 0 unless present; returns the present entry.
    async fn insert_if_absent(
        &self,
        entry: RouteTableEntry,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError>;

    /// Replaces the entry only if its version still equals `expected_version`.
    async fn compare_and_swap(
        &self,
        key: &ChannelKey,
        expected_version: u64,
        entry: RouteTableEntry,
    ) -> Result<bool, RouteStoreError>;

    async fn delete(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError>;
}

/// [`RouteStore`] that runs each mutation as a read/compute/compare-and-swap
/// retry loop over a [`VersionedRouteBackend`].
pub struct OptimisticRouteStore<B> {
    backend: B,
    max_attempts: usize,
}

impl<B: VersionedRouteBackend> OptimisticRouteStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_max_attempts(backend, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(backend: B, max_attempts: usize) -> Self {
        Self {
            backend,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: VersionedRouteBackend> RouteStore for OptimisticRouteStore<B> {
    async fn get(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        Ok(self.backend.load(key).await?.map(|(_, entry)| entry))
    }

    async fn put_if_absent(
        &self,
        entry: RouteTableEntry,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        self.backend.insert_if_absent(entry).await
    }

    async fn execute_atomically(
        &self,
        key: &ChannelKey,
        mutation: &RouteMutation,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        for attempt in 1..=self.max_attempts {
            let Some((version, current)) = self.backend.load(key).await? else {
                return Ok(None);
            };
            let Some(next) = mutation.apply(Some(&current)) else {
                return Ok(None);
            };

            if self
                .backend
                .compare_and_swap(key, version, next.clone())
                .await?
            {
                return Ok(Some(next));
            }

            debug!(
                event = events::ROUTE_CAS_CONFLICT,
                component = COMPONENT,
                channel_key = %key,
                attempt,
                "entry changed during mutation; retrying"
            );
            tokio::task::yield_now().await;
        }

        warn!(
            event = events::ROUTE_CAS_EXHAUSTED,
            component = COMPONENT,
            channel_key = %key,
            attempts = self.max_attempts,
            "giving up on contended mutation"
        );
        Err(RouteStoreError::Contention {
            key: key.clone(),
            attempts: self.max_attempts,
        })
    }

    async fn remove(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        self.backend.delete(key).await
    }
}

/// Versioned in-memory backend, mostly useful to exercise the retry loop.
#[derive(Default)]
pub struct InMemoryVersionedBackend {
    entries: DashMap<ChannelKey, (u64, RouteTableEntry)>,
}

impl InMemoryVersionedBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VersionedRouteBackend for InMemoryVersionedBackend {
    async fn load(
        &self,
        key: &ChannelKey,
    ) -> Result<Option<(u64, RouteTableEntry)>, RouteStoreError> {
        Ok(self.entries.get(key).map(|slot| slot.value().clone()))
    }

    async fn insert_if_absent(
        &self,
        entry: RouteTableEntry,
    ) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        match self.entries.entry(entry.channel_key().clone()) {
            Entry::Occupied(existing) => Ok(Some(existing.get().1.clone())),
            Entry::Vacant(slot) => {
                slot.insert((0, entry));
                Ok(None)
            }
        }
    }

    async fn compare_and_swap(
        &self,
        key: &ChannelKey,
        expected_version: u64,
        entry: RouteTableEntry,
    ) -> Result<bool, RouteStoreError> {
        let Some(mut slot) = self.entries.get_mut(key) else {
            return Ok(false);
        };

        let (version, current) = slot.value_mut();
        if *version != expected_version {
            return Ok(false);
        }
        *version += 1;
        *current = entry;
        Ok(true)
    }

    async fn delete(&self, key: &ChannelKey) -> Result<Option<RouteTableEntry>, RouteStoreError> {
        Ok(self.entries.remove(key).map(|(_, (_, entry))| entry))
    }
}
