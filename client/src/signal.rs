use tracing::{debug, warn};

use shared::constants::SPIN_ENDPOINT;
use shared::wheel::{now_secs, SpinPollResponse, SpinSignal, SpinTriggerRequest, SpinTriggerResponse};

use crate::error::{ClientError, ClientResult};

/// One-shot, time-windowed spin trigger between the admin surface and the
/// overlay. Decoupled from data sync so a spin never waits on a state
/// push.
pub struct SpinSignalChannel {
    client: reqwest::Client,
    base_url: String,
    /// Timestamp of the last signal this consumer acted on. A signal
    /// stays "fresh" for its whole 2 second window across several poll
    /// ticks; only a strictly newer timestamp may trigger again.
    last_acted: Option<f64>,
}

impl SpinSignalChannel {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            last_acted: None,
        }
    }

    /// Admin side: overwrite the gateway's signal slot with a fresh
    /// command.
    pub async fn signal_spin(&self, winner_index: Option<i64>) -> ClientResult<SpinSignal> {
        let url = format!("{}{}", self.base_url, SPIN_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .json(&SpinTriggerRequest { winner_index })
            .send()
            .await
            .map_err(|e| ClientError::Network(e, url.clone()))?;
        if !response.status().is_success() {
            return Err(ClientError::Api(response.status().to_string(), url));
        }
        let body: SpinTriggerResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parsing(e, url))?;
        debug!("[SPIN] Signal issued at t={:.3}", body.data.timestamp);
        Ok(body.data)
    }

    /// True iff the gateway reports an active command. Transport and
    /// parse failures degrade to false; the poll loop just retries on its
    /// next tick.
    pub async fn poll_spin_signal(&self) -> bool {
        self.fetch_active_signal().await.is_some()
    }

    /// Consumes the current signal at most once: returns it only when it
    /// is active *and* strictly newer than the last signal acted on.
    pub async fn take_spin_trigger(&mut self) -> Option<SpinSignal> {
        let signal = self.fetch_active_signal().await?;
        if self.last_acted.is_some_and(|t| signal.timestamp <= t) {
            return None;
        }
        self.last_acted = Some(signal.timestamp);
        Some(signal)
    }

    async fn fetch_active_signal(&self) -> Option<SpinSignal> {
        let url = format!("{}{}", self.base_url, SPIN_ENDPOINT);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("[SPIN] Poll failed: {}", e);
                return None;
            }
        };
        let body: SpinPollResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("[SPIN] Poll returned malformed body: {}", e);
                return None;
            }
        };

        // Trust but verify: the gateway already applied the freshness
        // window, re-check locally so a lagging response cannot trigger a
        // stale spin.
        match body {
            SpinPollResponse {
                has_command: true,
                data: Some(signal),
            } if signal.is_fresh_at(now_secs()) => Some(signal),
            _ => None,
        }
    }
}
