//! User-visible notices raised by cart operations.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use utoipa::ToSchema;

const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Bounded FIFO of notices for one session. When full, the oldest entry is dropped.
#[derive(Debug)]
pub struct NoticeBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<Notice>>,
}

impl Default for NoticeBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NoticeBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(notice = %message, "cart notice");
        self.push(NoticeLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(notice = %message, "cart notice");
        self.push(NoticeLevel::Error, message);
    }

    fn push(&self, level: NoticeLevel, message: String) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(Notice {
            level,
            message,
            at: Utc::now(),
        });
    }

    /// Copy of the pending notices, oldest first.
    pub fn peek(&self) -> Vec<Notice> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Remove and return the pending notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.entries.lock().drain(..).collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.entries.lock().back().cloned()
    }
}
