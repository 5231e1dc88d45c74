pub const SYNC_ENDPOINT: &str = "/api/sync";
pub const SPIN_ENDPOINT: &str = "/api/spin";
pub const HEALTH_ENDPOINT: &str = "/api/health_check";

pub const SPIN_COMMAND: &str = "SPIN";

/// A spin signal is only honored within this many seconds of being written.
pub const SPIN_SIGNAL_WINDOW_SECS: f64 = 2.0;

pub const SYNC_POLL_INTERVAL_MS: u64 = 1000;
pub const SPIN_POLL_INTERVAL_MS: u64 = 500;

pub const DEFAULT_PORT: u16 = 5001;
pub const STATE_FILE_NAME: &str = "data.json";
pub const SPIN_FILE_NAME: &str = "spin_command.json";

/// Target total for the "balance probabilities" admin action.
pub const NORMALIZED_TOTAL: f64 = 100.0;
