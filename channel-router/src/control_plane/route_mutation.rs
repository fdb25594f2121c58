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

//! Single-entry route mutations executed inside a store's per-key transaction.

use crate::channel_key::ChannelKey;
use crate::control_plane::route_table::{Route, RouteTableEntry, DEFAULT_ROUTING_KEY};
use crate::routing::RoutingStrategyKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// One indivisible change to a route-table entry.
///
/// Mutations are plain data so a store can ship them to whichever node owns
/// the key and run [`RouteMutation::apply`] there.
pub enum RouteMutation {
    AddRoute {
        target_key: ChannelKey,
        routing_keys: Vec<String>,
    },
    RemoveRoute {
        target_key: ChannelKey,
        routing_keys: Vec<String>,
    },
    SetStrategy(Option<RoutingStrategyKind>),
}

impl RouteMutation {
    pub fn add_route(target_key: ChannelKey, routing_keys: &[&str]) -> Self {
        RouteMutation::AddRoute {
            target_key,
            routing_keys: routing_keys.iter().map(|key| key.to_string()).collect(),
        }
    }

    pub fn remove_route(target_key: ChannelKey, routing_keys: &[&str]) -> Self {
        RouteMutation::RemoveRoute {
            target_key,
            routing_keys: routing_keys.iter().map(|key| key.to_string()).collect(),
        }
    }

    /// Computes the replacement entry. An absent entry stays absent.
    pub fn apply(&self, current: Option<&RouteTableEntry>) -> Option<RouteTableEntry> {
        let entry = current?;

        let next = match self {
            RouteMutation::AddRoute {
                target_key,
                routing_keys,
            } => {
                let mut next_keys = existing_keys(entry, target_key);
                if routing_keys.is_empty() {
                    next_keys.insert(DEFAULT_ROUTING_KEY.to_string());
                } else {
                    next_keys.extend(routing_keys.iter().cloned());
                }

                match Route::new(target_key.clone(), next_keys) {
                    Some(route) => entry.with_route(route),
                    None => entry.clone(),
                }
            }
            RouteMutation::RemoveRoute {
                target_key,
                routing_keys,
            } => {
                if entry.route(target_key).is_none() {
                    return Some(entry.clone());
                }

                let mut next_keys = existing_keys(entry, target_key);
                if routing_keys.is_empty() {
                    next_keys.clear();
                } else {
                    for key in routing_keys {
                        next_keys.remove(key);
                    }
                }

                match Route::new(target_key.clone(), next_keys) {
                    Some(route) => entry.with_route(route),
                    None => entry.without_route(target_key),
                }
            }
            RouteMutation::SetStrategy(strategy) => entry.with_strategy(strategy.clone()),
        };

        Some(next)
    }
}

fn existing_keys(entry: &RouteTableEntry, target_key: &ChannelKey) -> BTreeSet<String> {
    entry
        .route(target_key)
        .map(|route| route.routing_keys().clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::RouteMutation;
    use crate::control_plane::route_table::{RouteTableEntry, DEFAULT_ROUTING_KEY};
    use crate::routing::RoutingStrategyKind;
    use crate::ChannelKey;

    fn source() -> RouteTableEntry {
        RouteTableEntry::new(ChannelKey::new("source"))
    }

    fn target() -> ChannelKey {
        ChannelKey::new("target")
    }

    fn keys_of(entry: &RouteTableEntry) -> Vec<String> {
        entry
            .route(&target())
            .map(|route| route.routing_keys().iter().cloned().collect())
            .unwrap_or_default()
    }

    fn apply_all(mut entry: RouteTableEntry, mutations: &[RouteMutation]) -> RouteTableEntry {
        for mutation in mutations {
            entry = mutation.apply(Some(&entry)).expect("entry exists");
        }
        entry
    }

    #[test]
    fn add_without_keys_is_idempotent_on_the_default_key() {
        let add = RouteMutation::add_route(target(), &[]);
        let entry = apply_all(source(), &[add.clone(), add.clone(), add]);

        assert_eq!(keys_of(&entry), vec![DEFAULT_ROUTING_KEY.to_string()]);
    }

    #[test]
    fn add_unions_keys() {
        let entry = apply_all(
            source(),
            &[
                RouteMutation::add_route(target(), &["a"]),
                RouteMutation::add_route(target(), &["b"]),
            ],
        );

        assert_eq!(keys_of(&entry), vec!["a", "b"]);
        assert_eq!(entry.routes().len(), 1);
    }

    #[test]
    fn add_without_keys_joins_existing_keys() {
        let entry = apply_all(
            source(),
            &[
                RouteMutation::add_route(target(), &["a"]),
                RouteMutation::add_route(target(), &[]),
            ],
        );

        assert_eq!(keys_of(&entry), vec![DEFAULT_ROUTING_KEY, "a"]);
    }

    #[test]
    fn remove_named_keys_then_last_key_deletes_route() {
        let entry = apply_all(
            source(),
            &[
                RouteMutation::add_route(target(), &["a", "b"]),
                RouteMutation::remove_route(target(), &["a"]),
            ],
        );
        assert_eq!(keys_of(&entry), vec!["b"]);

        let entry = apply_all(entry, &[RouteMutation::remove_route(target(), &["b"])]);
        assert!(entry.route(&target()).is_none());
        assert!(entry.routes().is_empty());
    }

    #[test]
    fn remove_without_keys_deletes_whole_route() {
        let entry = apply_all(
            source(),
            &[
                RouteMutation::add_route(target(), &["a", "b", "c"]),
                RouteMutation::remove_route(target(), &[]),
            ],
        );

        assert!(entry.route(&target()).is_none());
    }

    #[test]
    fn remove_unknown_key_keeps_route() {
        let entry = apply_all(
            source(),
            &[
                RouteMutation::add_route(target(), &["a"]),
                RouteMutation::remove_route(target(), &["zzz"]),
            ],
        );

        assert_eq!(keys_of(&entry), vec!["a"]);
    }

    #[test]
    fn remove_on_missing_route_is_a_no_op() {
        let entry = source();
        let next = RouteMutation::remove_route(target(), &["a"])
            .apply(Some(&entry))
            .expect("entry exists");

        assert_eq!(next, entry);
    }

    #[test]
    fn set_strategy_leaves_routes_untouched() {
        let entry = apply_all(source(), &[RouteMutation::add_route(target(), &["a"])]);
        let next = RouteMutation::SetStrategy(Some(RoutingStrategyKind::Direct))
            .apply(Some(&entry))
            .expect("entry exists");

        assert_eq!(next.routes(), entry.routes());
        assert_eq!(next.strategy(), Some(&RoutingStrategyKind::Direct));
    }

    #[test]
    fn absent_entry_stays_absent() {
        assert!(RouteMutation::add_route(target(), &["a"]).apply(None).is_none());
        assert!(RouteMutation::remove_route(target(), &[]).apply(None).is_none());
        assert!(RouteMutation::SetStrategy(None).apply(None).is_none());
    }
}
