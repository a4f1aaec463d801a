// src/config/consts.rs

// Doors, in report order
pub const DOOR_LABELS: [&str; 4] = ["LAB", "FES", "NOC", "NOC-FES"];

// Identifiers
pub const CHAPA_LEN: usize = 5;
pub const CENSO_KEY_LEN: usize = 4;
pub const SHORT_CHAPA_PREFIX: char = '7'; // 4-digit chapas belong to the 7xxxx series
pub const TOKEN_MIN_DIGITS: usize = 3;
pub const TOKEN_MAX_DIGITS: usize = 5;

// Extraction
pub const CANDIDATE_TAGS: &[&str] = &["a", "span", "td", "b", "font", "div"];
pub const MIN_CANDIDATE_SIZE: f32 = 8.0;
pub const DENSE_ROW_MIN_TOKENS: usize = 10;

// Badge heuristic
pub const BADGE_MIN_SIZE: f32 = 14.0;
pub const BADGE_MAX_SIZE: f32 = 42.0;
pub const BADGE_MIN_RADIUS: f32 = 8.0;
pub const GRAY_TOLERANCE: u8 = 24;
pub const DARK_CHANNEL_MAX: u8 = 120; // exclusive

// Caller-side "is this really the roster page" check
pub const ROSTER_MIN_ENTRIES: usize = 20;
pub const ROSTER_MIN_DOORS: usize = 1;

// Diagnostics
pub const DIAG_MIN_SIZE: f32 = 6.0;
pub const DIAG_SAMPLE: usize = 120;

// Local files
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = ".store/debug.log";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_SNAPSHOT_FILE: &str = "snapshot.json";
