//! Background fetch threads for the TUI.
//!
//! The two feeds are independent: each runs on its own thread, may complete
//! in either order, and may fail without affecting the other. Results are
//! delivered as messages over an `mpsc` channel and applied on the rendering
//! thread, so shared display state is only ever mutated there.
//!
//! Fetches are fire-and-forget: no cancellation, no timeouts. If the
//! receiver is gone by the time a fetch finishes, the result is dropped.

use std::sync::mpsc::Sender;
use std::thread;

use crate::data::CovidClient;
use crate::domain::{RegionIndex, Series};
use crate::error::AppError;

/// One fetch outcome, tagged by feed.
pub enum FetchResponse {
    National(Result<Series, AppError>),
    Regional(Result<RegionIndex, AppError>),
}

/// Kick off both fetches on background threads.
pub fn spawn_fetch(client: &CovidClient, tx: &Sender<FetchResponse>) {
    let national_client = client.clone();
    let national_tx = tx.clone();
    thread::spawn(move || {
        let _ = national_tx.send(FetchResponse::National(national_client.fetch_national()));
    });

    let regional_client = client.clone();
    let regional_tx = tx.clone();
    thread::spawn(move || {
        let _ = regional_tx.send(FetchResponse::Regional(regional_client.fetch_regional()));
    });
}
