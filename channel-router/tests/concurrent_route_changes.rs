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

mod support;

use channel_router::{RouteStore, RouterContext};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use support::{in_memory_store, key, open_router, optimistic_store, route_keys};

const CALLERS: usize = 16;

async fn distinct_keys_converge(store: Arc<dyn RouteStore>) {
    let context = RouterContext::new(store);
    let _owner = open_router(&context, "source").await;

    let mut tasks = Vec::with_capacity(CALLERS);
    for caller in 0..CALLERS {
        let context = context.clone();
        tasks.push(tokio::spawn(async move {
            let router = open_router(&context, "source").await;
            let routing_key = format!("k{caller}");
            router
                .add_route(&key("target"), &[routing_key.as_str()])
                .await
                .expect("open router");
            router.close();
        }));
    }
    for joined in join_all(tasks).await {
        joined.expect("caller task");
    }

    let router = open_router(&context, "source").await;
    let expected: BTreeSet<String> = (0..CALLERS).map(|caller| format!("k{caller}")).collect();
    let actual: BTreeSet<String> = route_keys(&router, "target").await.into_iter().collect();
    assert_eq!(actual, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_converge_with_in_memory_store() {
    integration_test_utils::init_logging();

    distinct_keys_converge(in_memory_store()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_converge_with_optimistic_store() {
    integration_test_utils::init_logging();

    distinct_keys_converge(optimistic_store()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_changes_on_different_sources_stay_independent() {
    integration_test_utils::init_logging();

    let context = RouterContext::new(in_memory_store());
    let mut tasks = Vec::with_capacity(CALLERS);
    for caller in 0..CALLERS {
        let context = context.clone();
        tasks.push(tokio::spawn(async move {
            let source = format!("source-{}", caller % 4);
            let router = open_router(&context, &source).await;
            let target = key(&format!("target-{caller}"));
            router.add_route(&target, &[]).await.expect("open router");
            router.remove_route(&target, &[]).await.expect("open router");
            router.add_route(&target, &["kept"]).await.expect("open router");
        }));
    }
    for joined in join_all(tasks).await {
        joined.expect("caller task");
    }

    for source in 0..4 {
        let router = open_router(&context, &format!("source-{source}")).await;
        let routes = router.routes().await.expect("open router");
        assert_eq!(routes.len(), CALLERS / 4);
        assert!(routes.iter().all(|route| route.has_routing_key("kept")));
    }
}
