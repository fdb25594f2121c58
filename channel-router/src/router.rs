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
use crate::control_plane::route_mutation::RouteMutation;
use crate::control_plane::route_store::{RouteStore, RouteStoreError};
use crate::control_plane::route_table::{Route, RouteTableEntry};
use crate::data_plane::routing_loop::{RoutingLoop, RoutingLoopConfig};
use crate::data_plane::transport::ChannelTransport;
use crate::observability::events;
use crate::router_context::RouterTracker;
use crate::routing::RoutingStrategyKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

const COMPONENT: &str = "router";

/// Failures of [`Router`] operations.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RouterError {
    /// The handle was closed; open a new router for the same key if needed.
    #[error("router for `{0}` is closed")]
    Closed(ChannelKey),
    #[error(transparent)]
    Store(#[from] RouteStoreError),
}

///
/// [`Router`] is a per-caller handle onto the shared routing configuration of
/// one source channel.
///
/// Many handles, on this node or others, may point at the same route-table
/// entry. Every change is delegated to the store as a single per-key atomic
/// mutation; reads return snapshots. Closing a handle only disables the handle.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use channel_router::{ChannelKey, InMemoryRouteStore, RouterContext, RouterError};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let context = RouterContext::new(Arc::new(InMemoryRouteStore::new()));
/// let router = context.create_router(ChannelKey::new("queue.in")).await.unwrap();
/// let target = ChannelKey::new("queue.out");
///
/// router.add_route(&target, &["a"]).await.unwrap();
/// router.add_route(&target, &["b"]).await.unwrap();
/// let routes = router.routes().await.unwrap();
/// assert_eq!(routes[0].routing_keys().len(), 2);
///
/// router.close();
/// assert!(matches!(router.routes().await, Err(RouterError::Closed(_))));
/// # });
/// ```
pub struct Router {
    id: Uuid,
    channel_key: ChannelKey,
    store: Arc<dyn RouteStore>,
    tracker: Arc<RouterTracker>,
    closed: AtomicBool,
}

impl Router {
    /// Creates the handle, making sure an entry exists for `channel_key`
    /// without replacing one written by anyone else.
    pub(crate) async fn open(
        channel_key: ChannelKey,
        store: Arc<dyn RouteStore>,
        tracker: Arc<RouterTracker>,
    ) -> Result<Self, RouterError> {
        store
            .put_if_absent(RouteTableEntry::new(channel_key.clone()))
            .await?;

        let id = Uuid::new_v4();
        tracker.attach(id, channel_key.clone());
        info!(
            event = events::ROUTER_OPEN,
            component = COMPONENT,
            channel_key = %channel_key,
            router_id = %id,
            "router opened"
        );

        Ok(Self {
            id,
            channel_key,
            store,
            tracker,
            closed: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Always available, including after [`Router::close`].
    pub fn channel_key(&self) -> &ChannelKey {
        &self.channel_key
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Disables this handle and detaches it from its context. Closing twice is
    /// a no-op. The shared route-table entry is left untouched.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.tracker.detach(&self.id);
        info!(
            event = events::ROUTER_CLOSE,
            component = COMPONENT,
            channel_key = %self.channel_key,
            router_id = %self.id,
            "router closed"
        );
    }

    /// Adds `target_key` or extends its routing keys. With no keys the route
    /// gets the default routing key.
    pub async fn add_route(
        &self,
        target_key: &ChannelKey,
        routing_keys: &[&str],
    ) -> Result<Option<RouteTableEntry>, RouterError> {
        self.require_open()?;
        debug!(
            event = events::ROUTE_ADD,
            component = COMPONENT,
            channel_key = %self.channel_key,
            target_key = %target_key,
            routing_keys = ?routing_keys,
            "adding route"
        );

        self.mutate(RouteMutation::add_route(target_key.clone(), routing_keys))
            .await
    }

    /// Removes the given routing keys from `target_key`'s route, or the whole
    /// route when no keys are given.
    pub async fn remove_route(
        &self,
        target_key: &ChannelKey,
        routing_keys: &[&str],
    ) -> Result<Option<RouteTableEntry>, RouterError> {
        self.require_open()?;
        debug!(
            event = events::ROUTE_REMOVE,
            component = COMPONENT,
            channel_key = %self.channel_key,
            target_key = %target_key,
            routing_keys = ?routing_keys,
            "removing route"
        );

        self.mutate(RouteMutation::remove_route(target_key.clone(), routing_keys))
            .await
    }

    pub async fn set_routing_strategy(
        &self,
        strategy: Option<RoutingStrategyKind>,
    ) -> Result<Option<RouteTableEntry>, RouterError> {
        self.require_open()?;
        debug!(
            event = events::ROUTE_STRATEGY_SET,
            component = COMPONENT,
            channel_key = %self.channel_key,
            strategy = ?strategy,
            "setting routing strategy"
        );

        self.mutate(RouteMutation::SetStrategy(strategy)).await
    }

    /// Snapshot of the current routes; empty when the entry has been deleted.
    pub async fn routes(&self) -> Result<Vec<Route>, RouterError> {
        Ok(self
            .entry()
            .await?
            .map(|entry| entry.routes().to_vec())
            .unwrap_or_default())
    }

    pub async fn routing_strategy(&self) -> Result<Option<RoutingStrategyKind>, RouterError> {
        Ok(self
            .entry()
            .await?
            .and_then(|entry| entry.strategy().cloned()))
    }

    /// Raw snapshot of the entry; `None` means it is absent from the store.
    pub async fn entry(&self) -> Result<Option<RouteTableEntry>, RouterError> {
        self.require_open()?;
        Ok(self.store.get(&self.channel_key).await?)
    }

    /// Builds a routing loop draining this router's channel.
    ///
    /// The loop reads the store directly, so closing this handle later does
    /// not stop it.
    pub fn routing_loop(
        &self,
        transport: Arc<dyn ChannelTransport>,
        config: RoutingLoopConfig,
    ) -> Result<RoutingLoop, RouterError> {
        self.require_open()?;
        Ok(RoutingLoop::new(
            self.channel_key.clone(),
            self.store.clone(),
            transport,
            config,
        ))
    }

    async fn mutate(
        &self,
        mutation: RouteMutation,
    ) -> Result<Option<RouteTableEntry>, RouterError> {
        Ok(self
            .store
            .execute_atomically(&self.channel_key, &mutation)
            .await?)
    }

    fn require_open(&self) -> Result<(), RouterError> {
        if self.is_closed() {
            debug!(
                event = events::ROUTER_CLOSED_CALL,
                component = COMPONENT,
                channel_key = %self.channel_key,
                router_id = %self.id,
                "rejecting call on closed router"
            );
            return Err(RouterError::Closed(self.channel_key.clone()));
        }
        Ok(())
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.tracker.detach(&self.id);
    }
}
