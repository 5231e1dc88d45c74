use tracing::{debug, warn};

use shared::constants::SYNC_ENDPOINT;
use shared::validation::{
    clamp_probability, clamp_prize_probabilities, unique_prize_id, validate_prize_text,
    ValidationError,
};
use shared::wheel::{Prize, SyncUpdate, SyncedState, WheelConfig, WheelTheme};

use crate::error::{ClientError, ClientResult};

/// Partial edit of one prize, as entered in the admin form.
#[derive(Debug, Clone, Default)]
pub struct PrizeUpdate {
    pub text: Option<String>,
    pub color: Option<String>,
    pub probability: Option<f64>,
}

/// Partial edit of the wheel configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub spin_duration: Option<f64>,
    pub winner_message: Option<String>,
    pub theme: Option<WheelTheme>,
    pub blocked_ids: Option<Vec<String>>,
    pub vip_mode: Option<bool>,
}

/// The in-memory source of truth for the surface that owns it.
///
/// Every mutation applies locally first and then pushes the changed slice
/// to the gateway without awaiting it; local reads right after a local
/// write always see that write. Push failures are logged and otherwise
/// dropped — the next successful pull reconverges. Two surfaces editing
/// concurrently resolve last-writer-wins at the gateway, which can drop a
/// concurrent edit; accepted for this single-operator tool.
pub struct SyncStore {
    client: reqwest::Client,
    base_url: String,
    prizes: Vec<Prize>,
    config: WheelConfig,
    is_visible: bool,
    last_updated: u64,
}

impl SyncStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            prizes: Vec::new(),
            config: WheelConfig::default(),
            is_visible: false,
            last_updated: 0,
        }
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn last_updated(&self) -> u64 {
        self.last_updated
    }

    /// Replaces the whole prize list. Duplicate ids keep their first
    /// occurrence so the uniqueness invariant survives bulk edits.
    pub fn set_prizes(&mut self, mut prizes: Vec<Prize>) {
        clamp_prize_probabilities(&mut prizes);
        let mut deduped: Vec<Prize> = Vec::with_capacity(prizes.len());
        for prize in prizes {
            if deduped.iter().any(|p| p.id == prize.id) {
                warn!("[SYNC] Dropping prize with duplicate id {}", prize.id);
                continue;
            }
            deduped.push(prize);
        }
        self.prizes = deduped;
        self.push_prizes();
    }

    /// Appends a prize, regenerating its id if it collides with an
    /// existing entry. A blank label is rejected before anything is
    /// stored or pushed. Returns the id actually stored.
    pub fn add_prize(&mut self, mut prize: Prize) -> Result<String, ValidationError> {
        validate_prize_text(&prize.text)?;
        prize.id = unique_prize_id(&self.prizes, &prize.id);
        prize.probability = clamp_probability(prize.probability);
        let id = prize.id.clone();
        self.prizes.push(prize);
        self.push_prizes();
        Ok(id)
    }

    pub fn remove_prize(&mut self, id: &str) {
        self.prizes.retain(|p| p.id != id);
        self.push_prizes();
    }

    /// Applies the provided fields to the matching prize; a blank label
    /// is ignored. Returns false when no prize carries that id.
    pub fn update_prize(&mut self, id: &str, update: PrizeUpdate) -> bool {
        let Some(prize) = self.prizes.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if let Some(text) = update.text {
            if validate_prize_text(&text).is_ok() {
                prize.text = text;
            } else {
                warn!("[SYNC] Ignoring blank label for prize {}", prize.id);
            }
        }
        if let Some(color) = update.color {
            prize.color = color;
        }
        if let Some(probability) = update.probability {
            prize.probability = clamp_probability(probability);
        }
        self.push_prizes();
        true
    }

    pub fn update_config(&mut self, update: ConfigUpdate) {
        if let Some(spin_duration) = update.spin_duration {
            self.config.spin_duration = spin_duration;
        }
        if let Some(winner_message) = update.winner_message {
            self.config.winner_message = winner_message;
        }
        if let Some(theme) = update.theme {
            self.config.theme = theme;
        }
        if let Some(blocked_ids) = update.blocked_ids {
            self.config.blocked_ids = blocked_ids;
        }
        if let Some(vip_mode) = update.vip_mode {
            self.config.vip_mode = vip_mode;
        }
        self.push(SyncUpdate {
            config: Some(self.config.clone()),
            ..Default::default()
        });
    }

    pub fn set_visible(&mut self, is_visible: bool) {
        self.is_visible = is_visible;
        self.push(SyncUpdate {
            is_visible: Some(is_visible),
            ..Default::default()
        });
    }

    /// Fetches the full document and replaces local state unconditionally.
    /// Used on initial load; pollers should prefer `fetch_remote` plus the
    /// strictly-newer guard.
    pub async fn pull_from_gateway(&mut self) -> ClientResult<()> {
        let remote = self.fetch_remote().await?;
        self.apply_remote(remote);
        debug!("[SYNC] State synced from gateway");
        Ok(())
    }

    pub async fn fetch_remote(&self) -> ClientResult<SyncedState> {
        let url = format!("{}{}", self.base_url, SYNC_ENDPOINT);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e, url.clone()))?;
        if !response.status().is_success() {
            return Err(ClientError::Api(response.status().to_string(), url));
        }
        response
            .json::<SyncedState>()
            .await
            .map_err(|e| ClientError::Parsing(e, url))
    }

    pub fn apply_remote(&mut self, state: SyncedState) {
        self.prizes = state.prizes;
        self.config = state.config;
        self.is_visible = state.is_visible;
        self.last_updated = state.last_updated;
    }

    fn push_prizes(&self) {
        self.push(SyncUpdate {
            prizes: Some(self.prizes.clone()),
            ..Default::default()
        });
    }

    /// Fire-and-forget push of the changed slice. The surface is never
    /// blocked on gateway round trips.
    fn push(&self, update: SyncUpdate) {
        if update.is_empty() {
            return;
        }
        let client = self.client.clone();
        let url = format!("{}{}", self.base_url, SYNC_ENDPOINT);
        tokio::spawn(async move {
            match client.post(&url).json(&update).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("[SYNC] State pushed to gateway");
                }
                Ok(response) => {
                    warn!("[SYNC] Push rejected by gateway: {}", response.status());
                }
                Err(e) => {
                    warn!("[SYNC] Push failed: {}", e);
                }
            }
        });
    }
}
