//! The campaign countdown: one background task per room at most.
//!
//! The task broadcasts `campaign_timer` for every value from
//! `countdown_secs` down to 0, one per `tick_interval`, then one interval
//! later broadcasts `start_voting` and clears the room's running flag so a
//! later round can start a fresh timer. It is not cancellable: a client's
//! `start_voting` during the campaign broadcasts the options immediately
//! and the timer still runs to the end.
//!
//! The room lock is taken per broadcast, never across a sleep.

use std::sync::Arc;
use std::time::Duration;

use society_protocol::{RoomCode, ServerMessage};
use society_transport::Connection;
use tokio::time::{self, Instant};
use tracing::{debug, info, trace, warn};

use crate::{Phase, Room};

impl<C: Connection> Room<C> {
    /// Starts the countdown unless one is already running.
    ///
    /// Returns `true` if this call launched the timer task.
    pub async fn start_countdown(self: &Arc<Self>) -> bool {
        {
            let mut inner = self.inner.lock().await;
            if inner.countdown_running {
                debug!(room = %self.code(), "countdown already running");
                return false;
            }
            inner.countdown_running = true;
        }

        info!(
            room = %self.code(),
            secs = self.config().countdown_secs,
            "campaign countdown started"
        );
        tokio::spawn(run(Arc::clone(self)));
        true
    }
}

async fn run<C: Connection>(room: Arc<Room<C>>) {
    let interval = room.config().tick_interval;
    let mut next = Instant::now();

    for remaining in (0..=room.config().countdown_secs).rev() {
        wait_for_tick(room.code(), &mut next, interval).await;
        let report = room
            .broadcast(&ServerMessage::CampaignTimer { time: remaining })
            .await;
        trace!(
            room = %room.code(),
            remaining,
            delivered = report.delivered,
            "countdown tick"
        );
    }

    // Tick 0 gets its full interval before voting opens.
    wait_for_tick(room.code(), &mut next, interval).await;
    room.broadcast(&ServerMessage::start_voting()).await;

    {
        let mut inner = room.inner.lock().await;
        inner.countdown_running = false;
        inner.phase = Phase::Voting;
    }
    info!(room = %room.code(), "campaign countdown finished, voting open");
}

/// Sleeps until `next`, then schedules the following tick.
///
/// Waking more than a tenth of an interval late counts as an overrun: the
/// schedule restarts from now instead of firing the missed ticks in a
/// burst.
async fn wait_for_tick(code: &RoomCode, next: &mut Instant, interval: Duration) {
    time::sleep_until(*next).await;

    let now = Instant::now();
    let late_by = now.saturating_duration_since(*next);
    if !interval.is_zero() && late_by > interval / 10 {
        warn!(
            room = %code,
            late_ms = late_by.as_secs_f64() * 1000.0,
            "countdown tick overrun, rescheduling from now"
        );
        *next = now + interval;
    } else {
        *next += interval;
    }
}
