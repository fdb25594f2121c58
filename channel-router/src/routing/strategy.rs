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

//! Strategy contract and the serializable set of built-in strategies.

use crate::channel_key::ChannelKey;
use crate::control_plane::route_table::Route;
use crate::message::Message;
use crate::routing::direct::DirectRoutingStrategy;
use crate::routing::fanout::FanoutRoutingStrategy;
use crate::routing::topic::TopicRoutingStrategy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Decides the targets of one message.
///
/// Implementations must be pure: the same message and routes always produce
/// the same targets, and calling `route` has no side effects. An empty set
/// means the message is dropped.
pub trait RoutingStrategy: Send + Sync {
    fn route(&self, message: &Message, routes: &[Route]) -> BTreeSet<ChannelKey>;
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Built-in strategies as stored on a route-table entry.
pub enum RoutingStrategyKind {
    /// Routing key header must equal one of the route's keys.
    Direct,
    /// Every route receives every message.
    Fanout,
    /// Route keys are dot-separated patterns with `*` and `#` wildcards.
    Topic,
}

impl RoutingStrategy for RoutingStrategyKind {
    fn route(&self, message: &Message, routes: &[Route]) -> BTreeSet<ChannelKey> {
        match self {
            RoutingStrategyKind::Direct => DirectRoutingStrategy.route(message, routes),
            RoutingStrategyKind::Fanout => FanoutRoutingStrategy.route(message, routes),
            RoutingStrategyKind::Topic => TopicRoutingStrategy.route(message, routes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RoutingStrategy, RoutingStrategyKind};
    use crate::control_plane::route_table::Route;
    use crate::{ChannelKey, Message};
    use std::collections::BTreeSet;

    fn route(target: &str, keys: &[&str]) -> Route {
        Route::new(
            ChannelKey::new(target),
            keys.iter().map(|key| key.to_string()).collect(),
        )
        .expect("non-empty keys")
    }

    #[test]
    fn kind_dispatches_to_matching_strategy() {
        let routes = vec![route("a", &["x"]), route("b", &["y"])];
        let message = Message::new("m").with_routing_key("x");

        assert_eq!(
            RoutingStrategyKind::Direct.route(&message, &routes),
            BTreeSet::from([ChannelKey::new("a")])
        );
        assert_eq!(
            RoutingStrategyKind::Fanout.route(&message, &routes).len(),
            2
        );
    }

    #[test]
    fn kind_is_transmissible_as_tagged_json() {
        let json = serde_json::to_string(&RoutingStrategyKind::Topic).expect("serialize");
        assert_eq!(json, r#"{"type":"topic"}"#);

        let parsed: RoutingStrategyKind = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, RoutingStrategyKind::Topic);
    }
}
