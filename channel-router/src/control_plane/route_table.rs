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

//! Route-table data model: one copy-on-write entry per source channel.

use crate::channel_key::ChannelKey;
use crate::routing::RoutingStrategyKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Routing key recorded when a route is added without any explicit keys.
pub const DEFAULT_ROUTING_KEY: &str = "__default__";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Binding from a source channel to one target channel.
///
/// The routing-key set is never empty: a route whose last key is removed stops
/// existing.
pub struct Route {
    target_key: ChannelKey,
    routing_keys: BTreeSet<String>,
}

impl Route {
    /// Builds a route, or `None` when `routing_keys` is empty.
    pub fn new(target_key: ChannelKey, routing_keys: BTreeSet<String>) -> Option<Self> {
        if routing_keys.is_empty() {
            return None;
        }

        Some(Self {
            target_key,
            routing_keys,
        })
    }

    pub fn target_key(&self) -> &ChannelKey {
        &self.target_key
    }

    pub fn routing_keys(&self) -> &BTreeSet<String> {
        &self.routing_keys
    }

    pub fn has_routing_key(&self, routing_key: &str) -> bool {
        self.routing_keys.contains(routing_key)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Full routing configuration for one source channel.
///
/// Entries are values: every change produces a new entry that replaces the old
/// one in the store, so a snapshot read by a router or routing loop never
/// changes underneath it.
pub struct RouteTableEntry {
    channel_key: ChannelKey,
    strategy: Option<RoutingStrategyKind>,
    routes: Vec<Route>,
}

impl RouteTableEntry {
    /// Default, strategy-less entry with no routes.
    pub fn new(channel_key: ChannelKey) -> Self {
        Self {
            channel_key,
            strategy: None,
            routes: Vec::new(),
        }
    }

    pub fn channel_key(&self) -> &ChannelKey {
        &self.channel_key
    }

    pub fn strategy(&self) -> Option<&RoutingStrategyKind> {
        self.strategy.as_ref()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, target_key: &ChannelKey) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| route.target_key() == target_key)
    }

    /// New entry with `route` stored for its target, replacing any previous
    /// route for that target in place.
    pub(crate) fn with_route(&self, route: Route) -> Self {
        let mut routes = self.routes.clone();
        match routes
            .iter_mut()
            .find(|existing| existing.target_key == route.target_key)
        {
            Some(existing) => *existing = route,
            None => routes.push(route),
        }

        Self {
            channel_key: self.channel_key.clone(),
            strategy: self.strategy.clone(),
            routes,
        }
    }

    pub(crate) fn without_route(&self, target_key: &ChannelKey) -> Self {
        Self {
            channel_key: self.channel_key.clone(),
            strategy: self.strategy.clone(),
            routes: self
                .routes
                .iter()
                .filter(|route| route.target_key() != target_key)
                .cloned()
                .collect(),
        }
    }

    pub(crate) fn with_strategy(&self, strategy: Option<RoutingStrategyKind>) -> Self {
        Self {
            channel_key: self.channel_key.clone(),
            strategy,
            routes: self.routes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, RouteTableEntry};
    use crate::routing::RoutingStrategyKind;
    use crate::ChannelKey;
    use std::collections::BTreeSet;

    fn keys(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn route_refuses_empty_key_set() {
        assert!(Route::new(ChannelKey::new("t"), BTreeSet::new()).is_none());
    }

    #[test]
    fn with_route_keeps_one_route_per_target_and_insertion_order() {
        let entry = RouteTableEntry::new(ChannelKey::new("src"));
        let a = Route::new(ChannelKey::new("a"), keys(&["x"])).expect("non-empty");
        let b = Route::new(ChannelKey::new("b"), keys(&["y"])).expect("non-empty");
        let a2 = Route::new(ChannelKey::new("a"), keys(&["x", "z"])).expect("non-empty");

        let entry = entry.with_route(a).with_route(b).with_route(a2.clone());

        let targets: Vec<&str> = entry
            .routes()
            .iter()
            .map(|route| route.target_key().as_str())
            .collect();
        assert_eq!(targets, vec!["a", "b"]);
        assert_eq!(entry.route(&ChannelKey::new("a")), Some(&a2));
    }

    #[test]
    fn replacement_leaves_the_original_entry_untouched() {
        let original = RouteTableEntry::new(ChannelKey::new("src"));
        let route = Route::new(ChannelKey::new("a"), keys(&["x"])).expect("non-empty");

        let updated = original
            .with_route(route)
            .with_strategy(Some(RoutingStrategyKind::Fanout));

        assert!(original.routes().is_empty());
        assert!(original.strategy().is_none());
        assert_eq!(updated.routes().len(), 1);
        assert_eq!(updated.strategy(), Some(&RoutingStrategyKind::Fanout));
    }
}
