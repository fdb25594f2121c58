use channel_router::{
    ChannelKey, InMemoryRouteStore, InMemoryVersionedBackend, OptimisticRouteStore, RouteStore,
    Router, RouterContext,
};
use std::sync::Arc;

pub(crate) fn key(name: &str) -> ChannelKey {
    ChannelKey::new(name)
}

pub(crate) fn in_memory_store() -> Arc<dyn RouteStore> {
    Arc::new(InMemoryRouteStore::new())
}

#[allow(dead_code)]
pub(crate) fn optimistic_store() -> Arc<dyn RouteStore> {
    Arc::new(OptimisticRouteStore::new(InMemoryVersionedBackend::default()))
}

pub(crate) async fn open_router(context: &RouterContext, source: &str) -> Router {
    context
        .create_router(key(source))
        .await
        .expect("router creation should succeed")
}

#[allow(dead_code)]
pub(crate) async fn route_keys(router: &Router, target: &str) -> Vec<String> {
    router
        .routes()
        .await
        .expect("router should be open")
        .into_iter()
        .find(|route| route.target_key() == &key(target))
        .map(|route| route.routing_keys().iter().cloned().collect())
        .unwrap_or_default()
}
