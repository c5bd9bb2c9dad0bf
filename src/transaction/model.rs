use serde::{Deserialize, Serialize};

/// Sender label used for system-minted mining rewards.
pub const REWARD_SENDER: &str = "0";

/// A value transfer between two opaque labels.
///
/// Field order is part of the block hash preimage and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: i64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;

    #[test]
    fn serializes_fields_in_declared_order() {
        let json = serde_json::to_string(&Transaction::new("a", "b", 5)).unwrap();
        assert_eq!(json, r#"{"sender":"a","recipient":"b","amount":5}"#);
    }
}
