//! Output filename generation.
//!
//! `{stem}_{type}_{discriminator}.{ext}` where the discriminator depends on the
//! configured [`FileNaming`] strategy.

use crate::utils::sha256_hex_prefix;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use strum::{AsRefStr, Display, EnumString};

const MAX_STEM_LEN: usize = 50;
const HASH_LEN: usize = 12;

/// How the part after the template type is chosen.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum FileNaming {
    /// Epoch milliseconds; can collide within one millisecond.
    #[default]
    Timestamp,
    /// Epoch milliseconds plus a per-engine counter.
    Sequenced,
    /// Leading hex of the rendered bytes' SHA-256.
    ContentHash,
}

/// Source of "now" for filenames.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Always returns the same instant unless moved with [`FixedClock::set`].
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Keeps ASCII letters and digits, truncated to 50; empty falls back to `fallback`.
pub fn sanitize_stem(raw: &str, fallback: &str) -> String {
    let stem: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_STEM_LEN)
        .collect();
    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem
    }
}

/// Builds filenames according to a [`FileNaming`] strategy.
#[derive(Debug)]
pub struct FileNamer {
    strategy: FileNaming,
    sequence: AtomicU64,
}

impl FileNamer {
    pub fn new(strategy: FileNaming) -> Self {
        Self {
            strategy,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn strategy(&self) -> FileNaming {
        self.strategy
    }

    /// `stem` must already be sanitized.
    pub fn file_name(
        &self,
        stem: &str,
        kind: &str,
        extension: &str,
        now_millis: i64,
        content: &[u8],
    ) -> String {
        let discriminator = match self.strategy {
            FileNaming::Timestamp => now_millis.to_string(),
            FileNaming::Sequenced => {
                let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
                format!("{now_millis}-{seq:04}")
            }
            FileNaming::ContentHash => sha256_hex_prefix(content, HASH_LEN),
        };
        format!("{stem}_{kind}_{discriminator}.{extension}")
    }
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::new(FileNaming::default())
    }
}
