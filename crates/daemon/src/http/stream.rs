// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /jobs/{id}/stream`: server-sent events over the job's
//! `ProgressBus` channel.
//!
//! Per spec.md §4.10, a subscriber gets a snapshot of the job and its
//! simulations the moment it connects, not just the next change — a client
//! attaching to an already-RUNNING job still needs to see where things
//! stand, and one attaching to an already-terminal job needs a defined end
//! to the stream rather than silence.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use sb_core::is_terminal_job;
use sb_engine::EngineError;
use sb_wire::{JobView, SimulationStatus, StreamEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio_stream::wrappers::ReceiverStream;

use crate::auth::CallerExt;
use crate::http::error::ApiError;
use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 32;

fn to_sse_event(event: &StreamEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_default();
    Event::default().event(event.event_name()).data(data)
}

pub async fn stream_job(
    State(state): State<AppState>,
    _caller: CallerExt,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError> {
    // Subscribe before reading the snapshot: any event published in the
    // gap between the two is merely re-sent as part of the snapshot catch-up
    // rather than lost.
    let mut broadcast_rx = state.progress.subscribe(&job_id);

    let (job, status) =
        state.scheduler.get_job(&job_id).ok_or_else(|| EngineError::NotFound(format!("job {job_id}")))?;
    let sims = state.scheduler.list_simulations(&job_id)?;

    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Event, Infallible>>(CHANNEL_CAPACITY);

    let job_event = StreamEvent::Job(JobView::from_job(&job, status));
    let sims_event = StreamEvent::Sims(sims.iter().map(SimulationStatus::from).collect());
    let _ = tx.send(Ok(to_sse_event(&job_event))).await;
    let _ = tx.send(Ok(to_sse_event(&sims_event))).await;

    if is_terminal_job(status) {
        // The snapshot above is the whole story for a terminal job; close
        // the stream instead of waiting on a channel that will never fire
        // again (`ProgressBus` drops a terminal job's channel on publish).
        drop(tx);
    } else {
        tokio::spawn(async move {
            loop {
                match broadcast_rx.recv().await {
                    Ok(event) => {
                        let wire_event = StreamEvent::from(&event);
                        if tx.send(Ok(to_sse_event(&wire_event))).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    let stream = ReceiverStream::new(rx);
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()).into_response())
}
