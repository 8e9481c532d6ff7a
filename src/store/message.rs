//! Message records and the load-ordered message store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Subject shown for a referenced message that was never loaded.
pub const FILLER_SUBJECT: &str = "(message not archived)";
/// Sender shown for a referenced message that was never loaded.
pub const FILLER_SENDER: &str = "(unknown sender)";
/// Date text shown for a referenced message that was never loaded.
pub const FILLER_DATE: &str = "(unknown date)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Loaded,
    Filler,
}

/// One archived message.
///
/// Loaded records are never modified after parsing. Filler records stand in
/// for ancestors that are referenced but missing from the archive.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message-ID without surrounding angle brackets
    pub message_id: String,
    pub subject: String,
    pub from: String,
    /// Date header text, kept for display
    pub date_raw: String,
    /// Parsed send time, `None` when the date did not parse
    pub date: Option<DateTime<Utc>>,
    pub in_reply_to: Option<String>,
    /// Ancestor chain, oldest first
    pub references: Vec<String>,
    /// Raw To, Cc and Reply-To values
    pub recipients: Vec<String>,
    /// Original message bytes (empty for fillers)
    pub raw: Vec<u8>,
    origin: Origin,
}

impl Message {
    /// A loaded message. `raw` is kept so content can be extracted lazily.
    #[allow(clippy::too_many_arguments)]
    pub fn loaded(
        message_id: String,
        subject: String,
        from: String,
        date_raw: String,
        date: Option<DateTime<Utc>>,
        in_reply_to: Option<String>,
        references: Vec<String>,
        recipients: Vec<String>,
        raw: Vec<u8>,
    ) -> Self {
        Message {
            message_id,
            subject,
            from,
            date_raw,
            date,
            in_reply_to,
            references,
            recipients,
            raw,
            origin: Origin::Loaded,
        }
    }

    /// A placeholder for a referenced but missing message.
    ///
    /// `inferred_parent` is the reference that preceded this id in the chain
    /// it was discovered in, and plays the role of its In-Reply-To.
    pub fn filler(message_id: String, inferred_parent: Option<String>) -> Self {
        Message {
            message_id,
            subject: FILLER_SUBJECT.to_string(),
            from: FILLER_SENDER.to_string(),
            date_raw: FILLER_DATE.to_string(),
            date: None,
            in_reply_to: inferred_parent,
            references: Vec::new(),
            recipients: Vec::new(),
            raw: Vec::new(),
            origin: Origin::Filler,
        }
    }

    pub fn is_filler(&self) -> bool {
        self.origin == Origin::Filler
    }

    /// The single parent this message claims for itself.
    ///
    /// In-Reply-To wins, then the last References entry. A reference to the
    /// message's own id is ignored.
    pub fn authoritative_parent(&self) -> Option<&str> {
        let own = self.message_id.as_str();
        self.in_reply_to
            .as_deref()
            .filter(|id| *id != own)
            .or_else(|| {
                self.references
                    .last()
                    .map(String::as_str)
                    .filter(|id| *id != own)
            })
    }

    /// Whether any recipient header contains `needle`.
    pub fn matches_recipient(&self, needle: &str) -> bool {
        self.recipients.iter().any(|value| value.contains(needle))
    }
}

/// Messages keyed by message-id, iterated in load order.
///
/// Fillers are appended after the loaded messages, in synthesis order.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    index: HashMap<String, usize>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message. Returns `false` (and drops it) when the id is taken.
    pub fn insert(&mut self, message: Message) -> bool {
        if self.index.contains_key(&message.message_id) {
            return false;
        }
        self.index
            .insert(message.message_id.clone(), self.messages.len());
        self.messages.push(message);
        true
    }

    /// Synthesize a filler for `message_id` unless a message already exists.
    pub fn ensure_filler(&mut self, message_id: &str, inferred_parent: Option<&str>) -> bool {
        if self.contains(message_id) {
            return false;
        }
        let inferred_parent = inferred_parent
            .filter(|parent| *parent != message_id)
            .map(str::to_string);
        self.insert(Message::filler(message_id.to_string(), inferred_parent))
    }

    /// Remove fillers for which `keep` returns false.
    pub fn retain_fillers<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Message) -> bool,
    {
        let before = self.messages.len();
        self.messages
            .retain(|message| !message.is_filler() || keep(message));
        let removed = before - self.messages.len();
        if removed > 0 {
            self.index = self
                .messages
                .iter()
                .enumerate()
                .map(|(position, message)| (message.message_id.clone(), position))
                .collect();
        }
        removed
    }

    pub fn get(&self, message_id: &str) -> Option<&Message> {
        self.index
            .get(message_id)
            .map(|&position| &self.messages[position])
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.index.contains_key(message_id)
    }

    /// Load-order position of a message.
    pub fn position(&self, message_id: &str) -> Option<usize> {
        self.index.get(message_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn filler_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_filler()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, in_reply_to: Option<&str>, references: &[&str]) -> Message {
        Message::loaded(
            id.to_string(),
            format!("Subject {}", id),
            "tester@example.com".to_string(),
            String::new(),
            None,
            in_reply_to.map(str::to_string),
            references.iter().map(|r| r.to_string()).collect(),
            vec!["list@example.com".to_string()],
            Vec::new(),
        )
    }

    #[test]
    fn test_authoritative_parent_prefers_in_reply_to() {
        let msg = message("c", Some("b"), &["a", "x"]);
        assert_eq!(msg.authoritative_parent(), Some("b"));
    }

    #[test]
    fn test_authoritative_parent_falls_back_to_last_reference() {
        let msg = message("c", None, &["a", "b"]);
        assert_eq!(msg.authoritative_parent(), Some("b"));
        assert_eq!(message("c", None, &[]).authoritative_parent(), None);
    }

    #[test]
    fn test_authoritative_parent_ignores_self_reference() {
        let msg = message("c", Some("c"), &["a"]);
        assert_eq!(msg.authoritative_parent(), Some("a"));
        assert_eq!(message("c", Some("c"), &[]).authoritative_parent(), None);
    }

    #[test]
    fn test_store_keeps_first_duplicate() {
        let mut store = MessageStore::new();
        assert!(store.insert(message("a", None, &[])));
        let mut dup = message("a", None, &[]);
        dup.subject = "second".to_string();
        assert!(!store.insert(dup));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().subject, "Subject a");
    }

    #[test]
    fn test_filler_sentinels() {
        let mut store = MessageStore::new();
        assert!(store.ensure_filler("z", Some("y")));
        assert!(!store.ensure_filler("z", None));
        let filler = store.get("z").unwrap();
        assert!(filler.is_filler());
        assert_eq!(filler.subject, FILLER_SUBJECT);
        assert_eq!(filler.date_raw, FILLER_DATE);
        assert_eq!(filler.authoritative_parent(), Some("y"));
    }

    #[test]
    fn test_retain_fillers_rebuilds_index() {
        let mut store = MessageStore::new();
        store.ensure_filler("f1", None);
        store.insert(message("a", None, &[]));
        store.ensure_filler("f2", None);
        let removed = store.retain_fillers(|m| m.message_id == "f2");
        assert_eq!(removed, 1);
        assert!(!store.contains("f1"));
        assert_eq!(store.position("a"), Some(0));
        assert_eq!(store.position("f2"), Some(1));
    }

    #[test]
    fn test_matches_recipient() {
        let msg = message("a", None, &[]);
        assert!(msg.matches_recipient("list@"));
        assert!(!msg.matches_recipient("other@"));
    }
}
