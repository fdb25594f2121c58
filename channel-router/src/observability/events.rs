//! Canonical structured event names used across `channel-router`.

// Route store events.
pub const ROUTE_ENTRY_CREATED: &str = "route_entry_created";
pub const ROUTE_ENTRY_ABSENT: &str = "route_entry_absent";
pub const ROUTE_CAS_CONFLICT: &str = "route_cas_conflict";
pub const ROUTE_CAS_EXHAUSTED: &str = "route_cas_exhausted";

// Router handle lifecycle and mutation events.
pub const ROUTER_OPEN: &str = "router_open";
pub const ROUTER_CLOSE: &str = "router_close";
pub const ROUTER_CLOSED_CALL: &str = "router_closed_call";
pub const ROUTE_ADD: &str = "route_add";
pub const ROUTE_REMOVE: &str = "route_remove";
pub const ROUTE_STRATEGY_SET: &str = "route_strategy_set";

// Routing loop events.
pub const LOOP_START: &str = "loop_start";
pub const LOOP_STOP: &str = "loop_stop";
pub const LOOP_RECEIVE: &str = "loop_receive";
pub const LOOP_RECEIVE_FAILED: &str = "loop_receive_failed";
pub const LOOP_ENTRY_READ_FAILED: &str = "loop_entry_read_failed";
pub const LOOP_DROP_NO_TARGET: &str = "loop_drop_no_target";
pub const LOOP_SEND_ATTEMPT: &str = "loop_send_attempt";
pub const LOOP_SEND_OK: &str = "loop_send_ok";
pub const LOOP_SEND_FAILED: &str = "loop_send_failed";

// Runtime events.
pub const RUNTIME_THREAD_NAME_FALLBACK: &str = "runtime_thread_name_fallback";
pub const RUNTIME_SPAWN_OK: &str = "runtime_spawn_ok";
pub const RUNTIME_SPAWN_FAILED: &str = "runtime_spawn_failed";

// Protocol collaborator events.
pub const RECEIPT_WRITE: &str = "receipt_write";
pub const RECEIPT_WRITE_FAILED: &str = "receipt_write_failed";
pub const CLIENT_FAULT: &str = "client_fault";
