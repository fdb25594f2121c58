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

use anyhow::{bail, Context};
use channel_router::{
    InMemoryRouteStore, InMemoryVersionedBackend, OptimisticRouteStore, RouteStore,
    RoutingLoopConfig, RoutingStrategyKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub(crate) router_config: RoutingLoopConfig,
    #[serde(default)]
    pub(crate) store: StoreConfig,
    pub(crate) routers: Vec<RouterConfig>,
    #[serde(default)]
    pub(crate) seed_messages: Vec<SeedMessage>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    InMemory,
    Optimistic {
        max_attempts: usize,
    },
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    pub(crate) source: String,
    #[serde(default)]
    pub(crate) strategy: Option<RoutingStrategyKind>,
    #[serde(default)]
    pub(crate) routes: Vec<RouteConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub(crate) target: String,
    #[serde(default)]
    pub(crate) routing_keys: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SeedMessage {
    pub(crate) source: String,
    #[serde(default)]
    pub(crate) routing_key: Option<String>,
    pub(crate) body: String,
}

impl Config {
    pub(crate) fn load(path: &str) -> anyhow::Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("unable to read config file {path}"))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {path}"))
    }

    pub(crate) fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = json5::from_str(contents).context("unable to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let mut sources = BTreeSet::new();
        for router in &self.routers {
            if router.source.is_empty() {
                bail!("router source must not be empty");
            }
            if !sources.insert(router.source.as_str()) {
                bail!("duplicate router source: {}", router.source);
            }
            if let Some(route) = router.routes.iter().find(|route| route.target.is_empty()) {
                bail!("route of `{}` has an empty target: {route:?}", router.source);
            }
        }

        if let Some(seed) = self
            .seed_messages
            .iter()
            .find(|seed| !sources.contains(seed.source.as_str()))
        {
            bail!("seed message for unconfigured source: {}", seed.source);
        }

        if let StoreConfig::Optimistic { max_attempts: 0 } = self.store {
            bail!("optimistic store needs at least one attempt");
        }
        Ok(())
    }
}

impl StoreConfig {
    pub(crate) fn build(&self) -> Arc<dyn RouteStore> {
        match self {
            StoreConfig::InMemory => Arc::new(InMemoryRouteStore::new()),
            StoreConfig::Optimistic { max_attempts } => Arc::new(
                OptimisticRouteStore::with_max_attempts(
                    InMemoryVersionedBackend::new(),
                    *max_attempts,
                ),
            ),
        }
    }
}
