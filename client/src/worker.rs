use rand::rngs::OsRng;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

use shared::constants::{SPIN_POLL_INTERVAL_MS, SYNC_POLL_INTERVAL_MS};
use shared::selection::{select_winner, SelectionError};
use shared::wheel::{Prize, SyncedState};

use crate::signal::SpinSignalChannel;
use crate::sync_store::SyncStore;

/// What the overlay's rendering layer reacts to. Selection happens here;
/// presentation (wheel animation, winner modal, error toast) is the
/// receiver's problem.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// A newer document was pulled and applied.
    StateChanged(SyncedState),
    /// A fresh spin command arrived and a winner was drawn.
    SpinStarted(Prize),
    /// A fresh spin command arrived but selection failed; must be shown
    /// to the operator, not just logged.
    SpinRejected(SelectionError),
}

/// Overlay-side polling loop: data sync every second, signal checks every
/// half second. One in-flight request per kind — each tick awaits its own
/// request before the next tick of that kind can fire.
pub struct OverlayWorker {
    store: SyncStore,
    signals: SpinSignalChannel,
    events: mpsc::Sender<OverlayEvent>,
}

impl OverlayWorker {
    pub fn new(base_url: &str, events: mpsc::Sender<OverlayEvent>) -> Self {
        Self {
            store: SyncStore::new(base_url),
            signals: SpinSignalChannel::new(base_url),
            events,
        }
    }

    pub async fn run(mut self) {
        if let Err(e) = self.store.pull_from_gateway().await {
            warn!("[SYNC] Initial pull failed, starting empty: {}", e);
        }

        let mut sync_ticks = interval(Duration::from_millis(SYNC_POLL_INTERVAL_MS));
        let mut spin_ticks = interval(Duration::from_millis(SPIN_POLL_INTERVAL_MS));

        loop {
            tokio::select! {
                _ = sync_ticks.tick() => self.sync_tick().await,
                _ = spin_ticks.tick() => self.spin_tick().await,
            }
            if self.events.is_closed() {
                break;
            }
        }
    }

    async fn sync_tick(&mut self) {
        match self.store.fetch_remote().await {
            // Only strictly newer documents are applied, so a response
            // resolving after a later tick's cannot roll state back.
            Ok(remote) if remote.last_updated > self.store.last_updated() => {
                self.store.apply_remote(remote.clone());
                let _ = self.events.send(OverlayEvent::StateChanged(remote)).await;
            }
            Ok(_) => {}
            Err(e) => warn!("[SYNC] Poll failed: {}", e),
        }
    }

    async fn spin_tick(&mut self) {
        let Some(signal) = self.signals.take_spin_trigger().await else {
            return;
        };

        match select_winner(self.store.prizes(), self.store.config(), &mut OsRng) {
            Ok(prize) => {
                info!("🎡 Spin t={:.3}: winner \"{}\" ({})", signal.timestamp, prize.text, prize.id);
                let _ = self.events.send(OverlayEvent::SpinStarted(prize.clone())).await;
            }
            Err(err) => {
                match err {
                    SelectionError::SecurityInvariantViolated => {
                        error!("Spin aborted: {}", err);
                    }
                    _ => warn!("Spin rejected: {}", err),
                }
                let _ = self.events.send(OverlayEvent::SpinRejected(err)).await;
            }
        }
    }
}
