//! Read/write diagnostic notifications.
//!
//! The exchange format is deliberately forgiving: truncated streams, unknown
//! object kinds and unmatched container end markers all produce usable
//! documents.  So that these conditions are not silently invisible, the
//! reader records each one as a [`Notification`] on the document instead of
//! raising an error.  Callers inspect [`Document::notifications`] after a
//! read to see what was encountered.
//!
//! [`Document::notifications`]: crate::document::Document

use std::fmt;

/// Category of a diagnostic notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// The stream ended in the middle of a code/value record; the document
    /// holds everything read up to that point.
    TruncatedStream,
    /// A code-0 value was not in the known dispatch table; the object was
    /// preserved as an opaque node.
    UnknownObjectType,
    /// An ENDSEC/ENDTAB/ENDBLK arrived with no matching open container.
    UnbalancedEndMarker,
    /// A known entity field failed to parse (failsafe mode only).
    FieldError,
    /// Anything else worth surfacing that did not stop the operation.
    Warning,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedStream => write!(f, "TruncatedStream"),
            Self::UnknownObjectType => write!(f, "UnknownObjectType"),
            Self::UnbalancedEndMarker => write!(f, "UnbalancedEndMarker"),
            Self::FieldError => write!(f, "FieldError"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single notification produced during reading or writing.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The category of the observation.
    pub kind: NotificationKind,
    /// A human-readable description.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Collects notifications during a read/write operation.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.items.push(Notification::new(kind, message));
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Check whether any notification of the given kind exists.
    pub fn has_kind(&self, kind: NotificationKind) -> bool {
        self.items.iter().any(|n| n.kind == kind)
    }

    /// Remove all notifications.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_and_query() {
        let mut coll = NotificationCollection::new();
        assert!(coll.is_empty());

        coll.notify(NotificationKind::UnknownObjectType, "WEIRD_ENTITY");
        assert_eq!(coll.len(), 1);
        assert!(coll.has_kind(NotificationKind::UnknownObjectType));
        assert!(!coll.has_kind(NotificationKind::TruncatedStream));
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationKind::UnbalancedEndMarker, "ENDBLK with no open BLOCK");
        assert_eq!(n.to_string(), "[UnbalancedEndMarker] ENDBLK with no open BLOCK");
    }
}
