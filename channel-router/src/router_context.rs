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

use crate::channel_key::ChannelKey;
use crate::control_plane::route_store::RouteStore;
use crate::router::{Router, RouterError};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Registry of router handles that are still open.
#[derive(Default)]
pub(crate) struct RouterTracker {
    live: DashMap<Uuid, ChannelKey>,
}

impl RouterTracker {
    pub(crate) fn attach(&self, id: Uuid, channel_key: ChannelKey) {
        self.live.insert(id, channel_key);
    }

    pub(crate) fn detach(&self, id: &Uuid) {
        self.live.remove(id);
    }
}

/// Factory for [`Router`] handles that share one [`RouteStore`].
///
/// Every handle created here is tracked until it is closed or dropped, which
/// lets a host report which channels it currently manages.
#[derive(Clone)]
pub struct RouterContext {
    store: Arc<dyn RouteStore>,
    tracker: Arc<RouterTracker>,
}

impl RouterContext {
    pub fn new(store: Arc<dyn RouteStore>) -> Self {
        Self {
            store,
            tracker: Arc::new(RouterTracker::default()),
        }
    }

    pub fn store(&self) -> Arc<dyn RouteStore> {
        self.store.clone()
    }

    /// Opens a handle for `channel_key`, creating an empty entry if none
    /// exists. Existing routes are never replaced.
    pub async fn create_router(&self, channel_key: ChannelKey) -> Result<Router, RouterError> {
        Router::open(channel_key, self.store.clone(), self.tracker.clone()).await
    }

    /// Number of open handles.
    pub fn live_routers(&self) -> usize {
        self.tracker.live.len()
    }

    /// Distinct channel keys with at least one open handle, sorted.
    pub fn live_router_keys(&self) -> Vec<ChannelKey> {
        let mut keys: Vec<ChannelKey> = self
            .tracker
            .live
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}
