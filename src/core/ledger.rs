//! Credential ledger.
//!
//! The decrypted contents of a store: one `key=value` entry per line, split
//! on the first `=` so values may contain `=`. Keys are unique and the last
//! write wins; entries keep the order they were (re)written in.

use tracing::debug;
use zeroize::Zeroizing;

/// A single credential.
#[derive(Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: Zeroizing<String>,
}

/// In-memory key to value mapping reconstructed from a store file.
///
/// Values are zeroized when the ledger is dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse decrypted plaintext.
    ///
    /// Blank lines are ignored. Lines without `=` or with an empty key are
    /// skipped rather than rejected; a repeated key keeps its last value.
    pub fn parse(plaintext: &str) -> Self {
        let mut ledger = Self::new();
        for (number, line) in plaintext.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    ledger.upsert(key, value);
                }
                _ => debug!(line = number + 1, "skipping malformed ledger line"),
            }
        }
        ledger
    }

    /// Serialize to plaintext, one `key=value\n` line per entry.
    pub fn serialize(&self) -> Zeroizing<String> {
        let capacity = self
            .entries
            .iter()
            .map(|e| e.key.len() + e.value.len() + 2)
            .sum();
        let mut out = Zeroizing::new(String::with_capacity(capacity));
        for entry in &self.entries {
            out.push_str(&entry.key);
            out.push('=');
            out.push_str(&entry.value);
            out.push('\n');
        }
        out
    }

    /// Insert or replace a credential.
    ///
    /// Any existing entry for `key` is removed and the new one appended.
    ///
    /// # Returns
    ///
    /// `true` if an existing entry was replaced.
    pub fn upsert(&mut self, key: &str, value: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        let replaced = self.entries.len() != before;
        self.entries.push(Entry {
            key: key.to_string(),
            value: Zeroizing::new(value.to_string()),
        });
        replaced
    }

    /// Look up a credential value.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// All entries in ledger order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
    }

    /// All keys in ledger order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Number of credentials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Three-way merge of a local ledger onto the remote one.
    ///
    /// Starts from `theirs` and re-applies every entry of `ours` that differs
    /// from `base` (the common ancestor). Keys changed on both sides take the
    /// local value.
    pub fn reconcile(base: &Ledger, theirs: &Ledger, ours: &Ledger) -> Ledger {
        let mut merged = theirs.clone();
        for (key, value) in ours.all() {
            if base.lookup(key) != Some(value) {
                merged.upsert(key, value);
            }
        }
        merged
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
