//! Battery indicator fed from a sysfs file

use std::fs;
use std::path::PathBuf;

/// Last good reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSample {
    pub value: String,
    pub polled_at_ms: u64,
}

pub struct StatusPoller {
    path: PathBuf,
    sample: Option<StatusSample>,
}

impl StatusPoller {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sample: None,
        }
    }

    /// Read the sensor once.
    ///
    /// A failed or empty read keeps the previous sample on screen.
    pub fn poll(&mut self, now_ms: u64) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Status read from {} failed: {}", self.path.display(), e);
                return;
            }
        };

        let value = content.lines().next().unwrap_or("").trim();
        if value.is_empty() {
            return;
        }

        self.sample = Some(StatusSample {
            value: value.to_string(),
            polled_at_ms: now_ms,
        });
    }

    pub fn sample(&self) -> Option<&StatusSample> {
        self.sample.as_ref()
    }

    /// Text for the status panel, e.g. `87 %`
    pub fn display(&self) -> Option<String> {
        self.sample.as_ref().map(|s| format!("{} %", s.value))
    }
}
