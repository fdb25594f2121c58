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

const WORD_SEPARATOR: char = '.';
const ONE_WORD: &str = "*";
const ANY_WORDS: &str = "#";

/// Pattern match of the message routing key against route keys.
///
/// Keys are dot-separated words. In a route key `*` stands for exactly one word
/// and `#` for zero or more words, so `orders.*.created` matches
/// `orders.eu.created` and `orders.#` matches `orders` and `orders.eu.created`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TopicRoutingStrategy;

impl RoutingStrategy for TopicRoutingStrategy {
    fn route(&self, message: &Message, routes: &[Route]) -> BTreeSet<ChannelKey> {
        let routing_key = message.routing_key().unwrap_or(DEFAULT_ROUTING_KEY);
        let words: Vec<&str> = routing_key.split(WORD_SEPARATOR).collect();

        routes
            .iter()
            .filter(|route| {
                route.routing_keys().iter().any(|pattern| {
                    let pattern: Vec<&str> = pattern.split(WORD_SEPARATOR).collect();
                    matches(&pattern, &words)
                })
            })
            .map(|route| route.target_key().clone())
            .collect()
    }
}

pub(crate) fn matches(pattern: &[&str], words: &[&str]) -> bool {
    // reachable[j]: the pattern prefix consumed so far can match words[..j]
    let mut reachable = vec![false; words.len() + 1];
    reachable[0] = true;

    for segment in pattern {
        let mut next = vec![false; words.len() + 1];
        match *segment {
            ANY_WORDS => {
                let mut seen = false;
                for j in 0..=words.len() {
                    seen |= reachable[j];
                    next[j] = seen;
                }
            }
            _ => {
                for j in 0..words.len() {
                    if reachable[j] && (*segment == ONE_WORD || *segment == words[j]) {
                        next[j + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }

    reachable[words.len()]
}

#[cfg(test)]
mod tests {
    use super::{matches, TopicRoutingStrategy};
    use crate::control_plane::route_table::Route;
    use crate::routing::strategy::RoutingStrategy;
    use crate::{ChannelKey, Message};
    use std::collections::BTreeSet;

    fn split(value: &str) -> Vec<&str> {
        value.split('.').collect()
    }

    fn is_match(pattern: &str, key: &str) -> bool {
        matches(&split(pattern), &split(key))
    }

    #[test]
    fn literal_words_must_all_match() {
        assert!(is_match("orders.eu", "orders.eu"));
        assert!(!is_match("orders.eu", "orders.us"));
        assert!(!is_match("orders.eu", "orders.eu.created"));
    }

    #[test]
    fn star_matches_exactly_one_word() {
        assert!(is_match("orders.*.created", "orders.eu.created"));
        assert!(!is_match("orders.*.created", "orders.created"));
        assert!(!is_match("orders.*", "orders.eu.created"));
    }

    #[test]
    fn hash_matches_zero_or_more_words() {
        assert!(is_match("orders.#", "orders"));
        assert!(is_match("orders.#", "orders.eu.created"));
        assert!(is_match("#.created", "orders.eu.created"));
        assert!(is_match("#", "anything.at.all"));
        assert!(!is_match("orders.#.deleted", "orders.eu.created"));
    }

    #[test]
    fn routes_to_every_matching_target_once() {
        let routes = vec![
            Route::new(
                ChannelKey::new("audit"),
                BTreeSet::from(["#".to_string(), "orders.*".to_string()]),
            )
            .expect("keys"),
            Route::new(ChannelKey::new("eu"), BTreeSet::from(["*.eu".to_string()])).expect("keys"),
            Route::new(ChannelKey::new("us"), BTreeSet::from(["*.us".to_string()])).expect("keys"),
        ];

        let targets =
            TopicRoutingStrategy.route(&Message::new("").with_routing_key("orders.eu"), &routes);

        assert_eq!(
            targets,
            BTreeSet::from([ChannelKey::new("audit"), ChannelKey::new("eu")])
        );
    }
}
