use serde::{Serialize, Deserialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{NORMALIZED_TOTAL, SPIN_COMMAND, SPIN_SIGNAL_WINDOW_SECS};

/// One segment of the wheel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prize {
    pub id: String,
    pub text: String,
    pub color: String,
    pub probability: f64,
}

impl Prize {
    pub fn new(id: impl Into<String>, text: impl Into<String>, color: impl Into<String>, probability: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            color: color.into(),
            probability: crate::validation::clamp_probability(probability),
        }
    }
}

/// Supported overlay themes. Purely presentational.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WheelTheme {
    Cyberpunk,
    Pop,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WheelConfig {
    pub spin_duration: f64,
    pub winner_message: String,
    pub theme: WheelTheme,
    /// Prize ids reserved for VIP spins. Excluded from normal selection,
    /// exclusively eligible while `vip_mode` is on.
    pub blocked_ids: Vec<String>,
    pub vip_mode: bool,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin_duration: 5.0,
            winner_message: "Parabéns! Você ganhou:".to_string(),
            theme: WheelTheme::Cyberpunk,
            blocked_ids: vec!["1".to_string(), "5".to_string()],
            vip_mode: false,
        }
    }
}

/// The unit of persistence and synchronization. One global document,
/// overwritten in full or in part by the admin surface, polled by the
/// overlay. `last_updated` (Unix milliseconds) is the sole conflict
/// resolution mechanism: last writer wins.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncedState {
    pub prizes: Vec<Prize>,
    pub config: WheelConfig,
    pub is_visible: bool,
    pub last_updated: u64,
}

impl SyncedState {
    /// The document created on first boot of the gateway.
    pub fn seed() -> Self {
        Self {
            prizes: vec![
                Prize::new("1", "5% OFF", "#FF5733", 10.0),
                Prize::new("2", "Frete Grátis", "#33FF57", 10.0),
                Prize::new("3", "Brinde Surpresa", "#3357FF", 5.0),
                Prize::new("4", "10% OFF", "#FF33A1", 10.0),
                Prize::new("5", "Tente Novamente", "#A133FF", 60.0),
                Prize::new("6", "R$ 10,00", "#33FFF5", 5.0),
            ],
            config: WheelConfig::default(),
            is_visible: false,
            last_updated: now_millis(),
        }
    }
}

/// Partial update accepted by `POST /api/sync`. Absent fields are left
/// untouched in the stored document.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prizes: Option<Vec<Prize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<WheelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl SyncUpdate {
    pub fn is_empty(&self) -> bool {
        self.prizes.is_none() && self.config.is_none() && self.is_visible.is_none()
    }
}

/// Ephemeral "spin now" command. Written by the admin surface, polled by
/// the overlay, and considered present only within a 2 second window of
/// its timestamp (Unix seconds). Never deleted; it simply goes stale.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinSignal {
    pub command: String,
    pub timestamp: f64,
    /// Advisory pre-selected winner index, -1 when absent. The overlay
    /// re-derives its own winner and does not consult this field.
    #[serde(default = "default_winner_index")]
    pub winner_index: i64,
}

fn default_winner_index() -> i64 {
    -1
}

impl SpinSignal {
    pub fn issued_at(now_secs: f64, winner_index: Option<i64>) -> Self {
        Self {
            command: SPIN_COMMAND.to_string(),
            timestamp: now_secs,
            winner_index: winner_index.unwrap_or(-1),
        }
    }

    /// Freshness check: `(now - timestamp) < 2.0`, closed at 0, open at 2.
    pub fn is_fresh_at(&self, now_secs: f64) -> bool {
        now_secs - self.timestamp < SPIN_SIGNAL_WINDOW_SECS
    }
}

// === API envelopes ===

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncPushResponse {
    pub success: bool,
    pub data: SyncedState,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinTriggerRequest {
    #[serde(rename = "winnerIndex", skip_serializing_if = "Option::is_none")]
    pub winner_index: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinTriggerResponse {
    pub success: bool,
    pub data: SpinSignal,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SpinPollResponse {
    pub has_command: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SpinSignal>,
}

// === Clock helpers ===

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Rescale all weights so they sum to exactly 100.0, keeping one decimal
/// place per entry; the last entry absorbs the rounding remainder. When
/// every weight is zero the total is split equally instead.
pub fn normalize_probabilities(prizes: &mut [Prize]) {
    if prizes.is_empty() {
        return;
    }

    let total: f64 = prizes.iter().map(|p| p.probability).sum();

    if total == 0.0 {
        let share = round1(NORMALIZED_TOTAL / prizes.len() as f64);
        for prize in prizes.iter_mut() {
            prize.probability = share;
        }
        return;
    }

    let mut running = 0.0;
    let last = prizes.len() - 1;
    for (i, prize) in prizes.iter_mut().enumerate() {
        if i == last {
            prize.probability = round1(NORMALIZED_TOTAL - running);
        } else {
            let rounded = round1(prize.probability / total * NORMALIZED_TOTAL);
            running += rounded;
            prize.probability = rounded;
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_fresh_within_window() {
        let signal = SpinSignal::issued_at(0.0, None);
        assert!(signal.is_fresh_at(0.0));
        assert!(signal.is_fresh_at(1.9));
    }

    #[test]
    fn signal_stale_at_and_past_boundary() {
        let signal = SpinSignal::issued_at(0.0, None);
        assert!(!signal.is_fresh_at(2.0));
        assert!(!signal.is_fresh_at(2.1));
    }

    #[test]
    fn signal_winner_index_defaults_to_minus_one() {
        let signal: SpinSignal = serde_json::from_str(r#"{"command":"SPIN","timestamp":12.5}"#).unwrap();
        assert_eq!(signal.winner_index, -1);
        assert_eq!(signal.command, SPIN_COMMAND);
    }

    #[test]
    fn synced_state_wire_names_are_camel_case() {
        let json = serde_json::to_string(&SyncedState::seed()).unwrap();
        assert!(json.contains("\"isVisible\""));
        assert!(json.contains("\"lastUpdated\""));
        assert!(json.contains("\"spinDuration\""));
        assert!(json.contains("\"blockedIds\""));
        assert!(json.contains("\"vipMode\""));
        assert!(json.contains("\"theme\":\"cyberpunk\""));
    }

    #[test]
    fn normalize_scales_to_one_hundred() {
        let mut prizes = vec![
            Prize::new("1", "a", "#fff", 3.0),
            Prize::new("2", "b", "#fff", 3.0),
            Prize::new("3", "c", "#fff", 3.0),
        ];
        normalize_probabilities(&mut prizes);
        let total: f64 = prizes.iter().map(|p| p.probability).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((prizes[0].probability - 33.3).abs() < 1e-9);
        assert!((prizes[2].probability - 33.4).abs() < 1e-9);
    }

    #[test]
    fn normalize_all_zero_splits_equally() {
        let mut prizes = vec![
            Prize::new("1", "a", "#fff", 0.0),
            Prize::new("2", "b", "#fff", 0.0),
            Prize::new("3", "c", "#fff", 0.0),
            Prize::new("4", "d", "#fff", 0.0),
        ];
        normalize_probabilities(&mut prizes);
        for prize in &prizes {
            assert!((prize.probability - 25.0).abs() < 1e-9);
        }
    }

    #[test]
    fn prize_constructor_clamps_negative_probability() {
        let prize = Prize::new("x", "bad", "#000", -5.0);
        assert_eq!(prize.probability, 0.0);
    }
}
