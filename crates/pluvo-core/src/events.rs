//! Notifications emitted by successful ledger operations.
//!
//! Events are produced inside an operation and only become visible once that
//! operation commits. A rejected operation emits nothing.

use serde::{Deserialize, Serialize};

use crate::types::Address;

/// An observable side effect of a committed operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Tokens moved between accounts by `transfer` or `transfer_from`.
    Transfer { from: Address, to: Address, amount: u64 },
    /// An owner set the delegated-transfer quota of a spender.
    Approval { owner: Address, spender: Address, amount: u64 },
    /// A participant converted owed rainfall into spendable balance.
    Collection { recipient: Address, amount: u64 },
}

impl LedgerEvent {
    /// Short name of the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::Collection { .. } => "Collection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        assert_eq!(LedgerEvent::Transfer { from: a, to: b, amount: 1 }.name(), "Transfer");
        assert_eq!(LedgerEvent::Approval { owner: a, spender: b, amount: 1 }.name(), "Approval");
        assert_eq!(LedgerEvent::Collection { recipient: a, amount: 1 }.name(), "Collection");
    }

    #[test]
    fn event_json_is_tagged() {
        let ev = LedgerEvent::Collection {
            recipient: Address::repeat_byte(3),
            amount: 25,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "collection");
        assert_eq!(json["amount"], 25);
        assert_eq!(json["recipient"], Address::repeat_byte(3).to_string());
    }
}
