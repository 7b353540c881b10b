// tattva/src/notify.rs

//! Transient operator notifications ("toasts") raised by mutations.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationLevel {
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub level: NotificationLevel,
  pub message: String,
  pub raised_at: DateTime<Utc>,
}

impl Notification {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      level: NotificationLevel::Success,
      message: message.into(),
      raised_at: Utc::now(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: NotificationLevel::Error,
      message: message.into(),
      raised_at: Utc::now(),
    }
  }
}

pub trait Notifier: Send + Sync {
  fn notify(&self, notification: Notification);
}

/// Bounded queue of notifications waiting to be shown. The oldest entry is
/// dropped when full.
#[derive(Debug)]
pub struct NotificationCenter {
  queue: Mutex<VecDeque<Notification>>,
  capacity: usize,
}

impl NotificationCenter {
  pub const DEFAULT_CAPACITY: usize = 32;

  pub fn new() -> Self {
    Self::with_capacity(Self::DEFAULT_CAPACITY)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      queue: Mutex::new(VecDeque::with_capacity(capacity)),
      capacity: capacity.max(1),
    }
  }

  /// Takes every pending notification, oldest first.
  pub fn drain(&self) -> Vec<Notification> {
    self.queue.lock().drain(..).collect()
  }

  pub fn pending(&self) -> Vec<Notification> {
    self.queue.lock().iter().cloned().collect()
  }
}

impl Default for NotificationCenter {
  fn default() -> Self {
    Self::new()
  }
}

impl Notifier for NotificationCenter {
  fn notify(&self, notification: Notification) {
    match notification.level {
      NotificationLevel::Success => tracing::info!(message = %notification.message, "notification"),
      NotificationLevel::Error => tracing::warn!(message = %notification.message, "notification"),
    }
    let mut queue = self.queue.lock();
    if queue.len() == self.capacity {
      queue.pop_front();
    }
    queue.push_back(notification);
  }
}
