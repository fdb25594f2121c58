//! Runtime integration layer.
//!
//! Keeps thread and tokio-runtime boundaries in one place so the rest of the
//! crate only deals in futures.
//!
//! ```
//! use std::sync::Arc;
//! use channel_router::{
//!     spawn_routing_loop, ChannelKey, InMemoryRouteStore, InMemoryTransport, RouteStore,
//!     RouteTableEntry, RoutingLoop, RoutingLoopConfig,
//! };
//!
//! let store = Arc::new(InMemoryRouteStore::new());
//! let transport = Arc::new(InMemoryTransport::new());
//! let source = ChannelKey::new("in");
//! transport.close_channel(&source);
//!
//! let routing_loop = RoutingLoop::new(
//!     source.clone(),
//!     store.clone(),
//!     transport,
//!     RoutingLoopConfig::default(),
//! );
//! tokio::runtime::Builder::new_current_thread()
//!     .build()
//!     .unwrap()
//!     .block_on(store.put_if_absent(RouteTableEntry::new(source)))
//!     .unwrap();
//!
//! let handle = spawn_routing_loop("doc-loop", routing_loop).unwrap();
//! assert_eq!(handle.worker_thread(), "doc-loop");
//! assert_eq!(handle.join().unwrap().received, 0);
//! ```

pub(crate) mod worker_runtime;
