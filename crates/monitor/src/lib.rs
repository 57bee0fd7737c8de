//! Status polling engine for the Yandex.Disk indicator.
//!
//! - [`PollWorker`] runs `yandex-disk status` on an interval, diffs each
//!   report against the previous one and hands non-empty
//!   [`UpdateRecord`](ydi_status::UpdateRecord)s to a sink.
//! - [`Coordinator`] runs user actions that change the daemon state with
//!   the worker stopped, so a poll never observes a half-finished
//!   start/stop.

mod coordinator;
mod worker;

pub use coordinator::Coordinator;
pub use worker::{PollWorker, SinkFn, WorkerState};

#[cfg(test)]
mod testing;
