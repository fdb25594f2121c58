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
use crate::control_plane::route_table::Route;
use crate::message::Message;
use crate::routing::strategy::RoutingStrategy;
use std::collections::BTreeSet;

/// Every route's target receives every message; routing keys are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct FanoutRoutingStrategy;

impl RoutingStrategy for FanoutRoutingStrategy {
    fn route(&self, _message: &Message, routes: &[Route]) -> BTreeSet<ChannelKey> {
        routes
            .iter()
            .map(|route| route.target_key().clone())
            .collect()
    }
}
