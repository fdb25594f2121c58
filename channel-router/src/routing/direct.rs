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
use crate::control_plane::route_table::{Route, DEFAULT_ROUTING_KEY};
use crate::message::Message;
use crate::routing::strategy::RoutingStrategy;
use std::collections::BTreeSet;

/// Exact match between the message routing key and a route's keys.
///
/// Messages without a routing key carry [`DEFAULT_ROUTING_KEY`], so they reach
/// routes that were added without explicit keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectRoutingStrategy;

impl RoutingStrategy for DirectRoutingStrategy {
    fn route(&self, message: &Message, routes: &[Route]) -> BTreeSet<ChannelKey> {
        let routing_key = message.routing_key().unwrap_or(DEFAULT_ROUTING_KEY);

        routes
            .iter()
            .filter(|route| route.has_routing_key(routing_key))
            .map(|route| route.target_key().clone())
            .collect()
    }
}
