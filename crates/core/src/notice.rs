use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    ResourceCreated,
    MalformedResource,
    ResourceUnreadable,
    PersistenceFailed,
    ContentReplaced,
    ItemAdded,
    EmptyCatalog,
}

impl NoticeKind {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::ItemAdded | Self::EmptyCatalog => NoticeLevel::Info,
            Self::ResourceCreated | Self::ContentReplaced => NoticeLevel::Warning,
            Self::MalformedResource | Self::ResourceUnreadable | Self::PersistenceFailed => {
                NoticeLevel::Error
            }
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ResourceCreated => "catalog.load.created",
            Self::MalformedResource => "catalog.load.malformed",
            Self::ResourceUnreadable => "catalog.load.unreadable",
            Self::PersistenceFailed => "catalog.save.failed",
            Self::ContentReplaced => "catalog.save.replaced",
            Self::ItemAdded => "catalog.item.added",
            Self::EmptyCatalog => "catalog.listing.empty",
        }
    }
}

/// Human-readable event raised by catalog operations.
///
/// Notices replace direct console output: the store hands them to a [`NoticeSink`] and the
/// caller decides how to show them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub level: NoticeLevel,
    pub message: String,
    pub metadata: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            level: kind.level(),
            message: message.into(),
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "{label}: {}", self.message)
    }
}

pub trait NoticeSink: Send + Sync {
    fn emit(&self, notice: Notice);
}

#[derive(Clone, Default)]
pub struct InMemoryNoticeSink {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl InMemoryNoticeSink {
    pub fn notices(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(notices) => notices.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.notices().iter().map(|notice| notice.kind).collect()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut notices) => std::mem::take(&mut *notices),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl NoticeSink for InMemoryNoticeSink {
    fn emit(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
