//! Video module - synthesis of a video file from a text description
//!
//! [`VideoSynthesizer`] is the seam the pipeline talks to. Synthesizers never
//! return errors: a missing file means the attempt failed and the details
//! have already been logged.

mod gemini;

pub use gemini::GeminiVideoClient;

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;
use tracing::{debug, warn};

pub trait VideoSynthesizer: Send + Sync {
    /// Synthesize a video; the path of the local file on success
    fn create_video(&self, description: &str) -> Option<PathBuf>;

    /// Remove a local video once it has been published
    fn delete_local_video(&self, path: &Path) {
        remove_local_file(path);
    }
}

/// Best-effort removal of a local file
pub fn remove_local_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "deleted local video"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to delete local video"),
    }
}

/// Polling budget for long-running remote jobs
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// Call `check` until it yields a value, sleeping between attempts.
    ///
    /// `check` returning `Ok(None)` means "not done yet". Errors end the loop
    /// immediately. Exhausting the attempts is an error.
    pub fn run<T, F>(&self, mut check: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<Option<T>>,
    {
        for attempt in 1..=self.attempts {
            if let Some(value) = check(attempt)? {
                return Ok(value);
            }
            if attempt < self.attempts {
                sleep(self.interval);
            }
        }
        bail!("operation did not finish after {} attempts", self.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_poll_returns_first_value() {
        let policy = PollPolicy::new(5, Duration::ZERO);
        let mut calls = 0;
        let value = policy
            .run(|attempt| {
                calls += 1;
                Ok((attempt == 3).then_some("done"))
            })
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_poll_times_out() {
        let policy = PollPolicy::new(2, Duration::ZERO);
        let result: Result<()> = policy.run(|_| Ok(None));
        assert!(result.unwrap_err().to_string().contains("2 attempts"));
    }

    #[test]
    fn test_poll_stops_on_error() {
        let policy = PollPolicy::new(10, Duration::ZERO);
        let mut calls = 0;
        let result: Result<()> = policy.run(|_| {
            calls += 1;
            bail!("remote failure")
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_remove_local_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clip.mp4");
        std::fs::write(&path, b"video").unwrap();

        remove_local_file(&path);
        assert!(!path.exists());
        // missing file only warns
        remove_local_file(&path);
    }
}
