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

//! Runtime helper for running routing loops on dedicated worker threads.

use crate::data_plane::routing_loop::{RoutingLoop, RoutingLoopError, RoutingLoopStats};
use crate::observability::{events, fields};
use std::io;
use std::thread;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info, warn};

const COMPONENT: &str = "worker_runtime";
const ROUTING_LOOP_THREAD_NAME: &str = "channel-router-loop";

/// Failures starting, running or joining a routing-loop worker.
#[derive(Debug, Error)]
pub enum WorkerRuntimeError {
    #[error("failed to spawn routing loop thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("failed to build routing loop runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("routing loop thread `{0}` panicked")]
    Panicked(String),
    #[error(transparent)]
    Loop(#[from] RoutingLoopError),
}

/// Join handle of a routing loop running on its own thread.
pub struct RoutingLoopHandle {
    worker_thread: String,
    join_handle: thread::JoinHandle<Result<RoutingLoopStats, WorkerRuntimeError>>,
}

impl RoutingLoopHandle {
    pub fn worker_thread(&self) -> &str {
        &self.worker_thread
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Blocks until the loop stops and returns its final counters.
    pub fn join(self) -> Result<RoutingLoopStats, WorkerRuntimeError> {
        match self.join_handle.join() {
            Ok(result) => result,
            Err(_) => Err(WorkerRuntimeError::Panicked(self.worker_thread)),
        }
    }
}

/// Runs `routing_loop` to completion on a new named thread with its own
/// current-thread tokio runtime.
///
/// Names that the OS cannot carry (empty or containing NUL) fall back to a
/// fixed worker name.
pub fn spawn_routing_loop(
    thread_name: &str,
    mut routing_loop: RoutingLoop,
) -> Result<RoutingLoopHandle, WorkerRuntimeError> {
    let worker_thread = if thread_name.is_empty() || thread_name.contains('\0') {
        warn!(
            event = events::RUNTIME_THREAD_NAME_FALLBACK,
            component = COMPONENT,
            requested = ?thread_name,
            fallback = ROUTING_LOOP_THREAD_NAME,
            reason = fields::REASON_INVALID_THREAD_NAME,
            "using fallback routing loop thread name"
        );
        ROUTING_LOOP_THREAD_NAME.to_string()
    } else {
        thread_name.to_string()
    };

    let worker_id = routing_loop.worker_id().to_string();
    let channel_key = routing_loop.source_key().clone();
    let spawned = thread::Builder::new()
        .name(worker_thread.clone())
        .spawn(move || -> Result<RoutingLoopStats, WorkerRuntimeError> {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(WorkerRuntimeError::Runtime)?;

            Ok(runtime.block_on(routing_loop.run())?)
        });

    match spawned {
        Ok(join_handle) => {
            info!(
                event = events::RUNTIME_SPAWN_OK,
                component = COMPONENT,
                worker_id = %worker_id,
                worker_thread = %worker_thread,
                channel_key = %channel_key,
                "routing loop thread spawned"
            );
            Ok(RoutingLoopHandle {
                worker_thread,
                join_handle,
            })
        }
        Err(err) => {
            error!(
                event = events::RUNTIME_SPAWN_FAILED,
                component = COMPONENT,
                worker_id = %worker_id,
                worker_thread = %worker_thread,
                err = %err,
                "failed to spawn routing loop thread"
            );
            Err(WorkerRuntimeError::Spawn(err))
        }
    }
}
