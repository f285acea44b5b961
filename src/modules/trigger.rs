//! Trigger sources and their composition.
//!
//! A trigger source is an async stream of [`ModuleArgs`]. Sources built
//! here are lazy, infinite and not restartable: once consumed, build a new
//! one. Order within a source is always preserved.

use super::ModuleArgs;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// A module's event source.
pub type TriggerStream = BoxStream<'static, ModuleArgs>;

/// Emit an empty event once per `period`.
///
/// The first event arrives one period after the stream is first polled. A
/// slow consumer delays later ticks rather than receiving a burst. Periods
/// below one millisecond are raised to one millisecond. A period too long
/// to represent as a deadline never fires.
pub fn interval_trigger(period: Duration) -> TriggerStream {
    let period = period.max(Duration::from_millis(1));
    stream::unfold(None::<Interval>, move |state| async move {
        let mut interval = state.unwrap_or_else(|| {
            let start = Instant::now()
                .checked_add(period)
                .unwrap_or_else(far_future);
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
        Some((ModuleArgs::default(), Some(interval)))
    })
    .boxed()
}

// Roughly 30 years from now, matching tokio's own overflow fallback.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86400 * 365 * 30)
}

/// Forward only the events `accept` returns true for.
pub fn filter_trigger<F>(source: TriggerStream, mut accept: F) -> TriggerStream
where
    F: FnMut(&ModuleArgs) -> bool + Send + 'static,
{
    source
        .filter(move |args| future::ready(accept(args)))
        .boxed()
}

/// Interleave several sources into one; each keeps its own order.
pub fn merge_triggers<I>(sources: I) -> TriggerStream
where
    I: IntoIterator<Item = TriggerStream>,
{
    stream::select_all(sources).boxed()
}

/// Turn a channel of externally produced events into a source.
///
/// Ends when every sender is dropped.
pub fn signal_trigger(rx: mpsc::Receiver<ModuleArgs>) -> TriggerStream {
    stream::unfold(rx, |mut rx| async move {
        let args = rx.recv().await?;
        Some((args, rx))
    })
    .boxed()
}
