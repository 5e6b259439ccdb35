//! Runtime configuration for the CLI.

/// Default HALD level for `.cube` → `.png` conversion (1728×1728 image).
const DEFAULT_HALD_LEVEL: u32 = 12;
/// Default JPEG encoding quality.
const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Settings read once at startup. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Worker threads for grading. `None` keeps rayon's default.
    pub threads: Option<usize>,
    /// HALD level used when converting grid LUTs to images.
    pub hald_level: u32,
    /// Quality for JPEG output, 1-100.
    pub jpeg_quality: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl AppConfig {
    /// Build from an arbitrary key lookup; unset or unparseable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            threads: lookup("PRISM_THREADS")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0),
            hald_level: lookup("PRISM_HALD_LEVEL")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u32| n >= 2)
                .unwrap_or(DEFAULT_HALD_LEVEL),
            jpeg_quality: lookup("PRISM_JPEG_QUALITY")
                .and_then(|s| s.parse().ok())
                .filter(|q: &u8| (1..=100).contains(q))
                .unwrap_or(DEFAULT_JPEG_QUALITY),
        }
    }

    /// Size rayon's global pool. Only the first call in a process wins.
    pub fn init_thread_pool(&self) {
        let Some(threads) = self.threads else {
            return;
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            Ok(()) => tracing::debug!(threads, "configured worker pool"),
            Err(e) => tracing::warn!("worker pool already initialised: {e}"),
        }
    }
}
