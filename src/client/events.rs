//! Long-poll subscription over `events/get`.
//!
//! ```text
//! subscribe(cancel) ──► spawn(listen) ──► EventStream
//!
//! listen:  poll(0) ──► drop backlog, cursor = last id
//!          loop {
//!              poll(cursor) ──ok──► send each event ──► cursor = last id
//!                           └─err─► sleep 5s (cursor kept)
//!          }
//! ```
//!
//! Every suspension point (the poll, the backoff, each handoff) races the
//! cancellation token, and the task owns the cursor exclusively.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::client::VkTeamsClient;
use crate::domain::{Event, PollTime};

/// Pause after a failed poll before retrying with the same cursor.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Ordered, unbounded sequence of events produced by [`VkTeamsClient::subscribe`].
///
/// The stream ends only when the subscription's token is cancelled. Once that
/// happens no further event is yielded, even one already handed over by the
/// background task. Dropping the stream stops the background task.
pub struct EventStream {
    rx: mpsc::Receiver<Event>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl EventStream {
    /// Wait for the next event. Returns `None` once the subscription is cancelled.
    pub async fn recv(&mut self) -> Option<Event> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            event = self.rx.recv() => event,
        }
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        if self.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl VkTeamsClient {
    /// Start a long-poll subscription and return its event stream.
    ///
    /// The first poll only skips the backlog: whatever the server already holds is
    /// dropped and the cursor moves past it, so a restarted bot does not replay old
    /// messages. After that every event is delivered once, in server order.
    ///
    /// Failed polls (network, HTTP status, malformed body, `"ok": false`) are logged
    /// and retried after 5 seconds with the same cursor, for as long as the
    /// subscription lives. The stream never carries errors.
    ///
    /// Each call gets its own task and cursor; nothing is shared between subscriptions
    /// and the cursor is not persisted.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn subscribe(&self, cancel: CancellationToken) -> EventStream {
        let cancel = cancel.child_token();
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(listen(self.clone(), tx, cancel.clone()));
        EventStream {
            rx,
            cancel: cancel.clone(),
            _guard: cancel.drop_guard(),
        }
    }
}

async fn listen(client: VkTeamsClient, tx: mpsc::Sender<Event>, cancel: CancellationToken) {
    let poll_time = client.poll_time;
    tracing::info!(poll_time = poll_time.seconds(), "start listening for events");

    let mut last_event_id = 0;
    let Some(backlog) = until_cancelled(&cancel, client.get_events(last_event_id, poll_time)).await
    else {
        tracing::info!("subscription cancelled; exiting");
        return;
    };
    match backlog {
        Ok(events) => {
            if let Some(last) = events.last() {
                last_event_id = last.id;
            }
            tracing::info!(event_count = events.len(), last_event_id, "dropped unread events");
        }
        Err(err) => tracing::warn!(error = %err, "unable to fetch unread events"),
    }

    loop {
        match poll_once(&client, &tx, &cancel, last_event_id, poll_time).await {
            Step::Advanced(Some(id)) => last_event_id = id,
            Step::Advanced(None) => {}
            Step::Failed => {
                if until_cancelled(&cancel, tokio::time::sleep(RETRY_DELAY))
                    .await
                    .is_none()
                {
                    tracing::info!("subscription cancelled; exiting");
                    return;
                }
            }
            Step::Cancelled => {
                tracing::info!("subscription cancelled; exiting");
                return;
            }
            Step::Closed => {
                tracing::info!("event stream dropped; exiting");
                return;
            }
        }
    }
}

enum Step {
    /// Batch delivered; carries the id of its last event, if any.
    Advanced(Option<u64>),
    Failed,
    Cancelled,
    Closed,
}

async fn poll_once(
    client: &VkTeamsClient,
    tx: &mpsc::Sender<Event>,
    cancel: &CancellationToken,
    last_event_id: u64,
    poll_time: PollTime,
) -> Step {
    tracing::debug!(last_event_id, "fetching events");
    let Some(result) = until_cancelled(cancel, client.get_events(last_event_id, poll_time)).await
    else {
        return Step::Cancelled;
    };
    let events = match result {
        Ok(events) => events,
        Err(err) => {
            tracing::warn!(
                error = %err,
                last_event_id,
                retry_in_secs = RETRY_DELAY.as_secs(),
                "unable to fetch events"
            );
            return Step::Failed;
        }
    };

    let last = events.last().map(|event| event.id);
    for event in events {
        let event_id = event.id;
        match until_cancelled(cancel, tx.send(event)).await {
            None => return Step::Cancelled,
            Some(Err(_)) => return Step::Closed,
            Some(Ok(())) => tracing::debug!(event_id, "event delivered"),
        }
    }
    Step::Advanced(last)
}

/// Run `future` unless `cancel` fires first. Cancellation wins ties.
async fn until_cancelled<F: Future>(cancel: &CancellationToken, future: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        output = future => Some(output),
    }
}
