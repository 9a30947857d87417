// SPDX-License-Identifier: GPL-3.0-only

//! Confirmation of decoded codes
//!
//! A decoded code never enters the list directly. It waits in a single
//! pending slot until the user accepts or cancels it.

use crate::list::CodeList;
use crate::storage::{CodeListStore, KeyValueStore};
use tracing::{debug, info};

/// Pending-scan state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfirmationFlow {
    #[default]
    Idle,
    /// A decoded code awaiting accept or cancel
    Pending(String),
}

/// What [`ConfirmationFlow::accept`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The code was appended to the list
    Added(String),
    /// The code is already in the list; nothing changed
    Duplicate(String),
    NothingPending,
}

impl ConfirmationFlow {
    /// Record a decoded code
    ///
    /// Returns `false` when a code is already pending; the first decode wins.
    pub fn on_decoded(&mut self, code: impl Into<String>) -> bool {
        match self {
            ConfirmationFlow::Idle => {
                let code = code.into();
                debug!(code = %code, "Code pending confirmation");
                *self = ConfirmationFlow::Pending(code);
                true
            }
            ConfirmationFlow::Pending(current) => {
                debug!(pending = %current, "Ignoring decode while confirmation is open");
                false
            }
        }
    }

    pub fn pending(&self) -> Option<&str> {
        match self {
            ConfirmationFlow::Idle => None,
            ConfirmationFlow::Pending(code) => Some(code),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConfirmationFlow::Pending(_))
    }

    /// Whether the pending code is already in `list`
    pub fn is_duplicate(&self, list: &CodeList) -> bool {
        self.pending().is_some_and(|code| list.contains(code))
    }

    /// Accept the pending code into the store
    ///
    /// Accepting a duplicate is a no-op and leaves the code pending, so the
    /// user still has to cancel it.
    pub fn accept<S: KeyValueStore>(&mut self, store: &mut CodeListStore<S>) -> AcceptOutcome {
        let ConfirmationFlow::Pending(code) = self else {
            return AcceptOutcome::NothingPending;
        };

        if store.get().contains(code) {
            debug!(code = %code, "Accept ignored for duplicate code");
            return AcceptOutcome::Duplicate(code.clone());
        }

        let code = std::mem::take(code);
        *self = ConfirmationFlow::Idle;
        store.append(&code);
        info!(code = %code, "Code added");
        AcceptOutcome::Added(code)
    }

    /// Discard the pending code, returning it
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::take(self) {
            ConfirmationFlow::Idle => None,
            ConfirmationFlow::Pending(code) => {
                debug!(code = %code, "Pending code discarded");
                Some(code)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store_with(codes: &[&str]) -> CodeListStore<MemoryStore> {
        let mut store = CodeListStore::open(MemoryStore::new());
        for code in codes {
            store.append(code);
        }
        store
    }

    #[test]
    fn test_accept_adds_new_code() {
        let mut store = store_with(&["A"]);
        let mut flow = ConfirmationFlow::default();

        assert!(flow.on_decoded("B"));
        assert!(!flow.is_duplicate(store.get()));
        assert_eq!(flow.accept(&mut store), AcceptOutcome::Added("B".into()));

        assert_eq!(flow, ConfirmationFlow::Idle);
        assert_eq!(store.get().as_slice(), ["A", "B"]);
    }

    #[test]
    fn test_accept_duplicate_leaves_list_unchanged() {
        let mut store = store_with(&["A", "B"]);
        let mut flow = ConfirmationFlow::default();

        flow.on_decoded("A");
        assert!(flow.is_duplicate(store.get()));
        assert_eq!(flow.accept(&mut store), AcceptOutcome::Duplicate("A".into()));

        assert_eq!(flow.pending(), Some("A"));
        assert_eq!(store.get().as_slice(), ["A", "B"]);

        assert_eq!(flow.cancel(), Some("A".to_string()));
        assert_eq!(flow, ConfirmationFlow::Idle);
    }

    #[test]
    fn test_cancel_does_not_touch_list() {
        let mut store = store_with(&["A"]);
        let mut flow = ConfirmationFlow::default();

        flow.on_decoded("B");
        assert_eq!(flow.cancel(), Some("B".to_string()));
        assert_eq!(flow.accept(&mut store), AcceptOutcome::NothingPending);
        assert_eq!(store.get().as_slice(), ["A"]);
        assert_eq!(flow.cancel(), None);
    }

    #[test]
    fn test_first_decode_wins() {
        let mut flow = ConfirmationFlow::default();
        assert!(flow.on_decoded("first"));
        assert!(!flow.on_decoded("second"));
        assert_eq!(flow.pending(), Some("first"));
    }

    #[test]
    fn test_no_duplicates_across_accept_cancel_delete() {
        let mut store = store_with(&[]);
        let mut flow = ConfirmationFlow::default();
        let codes = ["A", "B", "A", "C", "B", "A"];

        for (step, code) in codes.iter().cycle().take(60).enumerate() {
            flow.on_decoded(*code);
            match step % 4 {
                0 | 1 => {
                    if let AcceptOutcome::Duplicate(_) = flow.accept(&mut store) {
                        flow.cancel();
                    }
                }
                2 => {
                    flow.cancel();
                }
                _ => {
                    flow.cancel();
                    store.remove(code);
                }
            }

            let list = store.get().as_slice();
            let mut sorted = list.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), list.len(), "duplicate after step {step}");
        }
    }
}
