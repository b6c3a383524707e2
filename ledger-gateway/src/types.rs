//! Wire types for the external ledger authority
//!
//! JSON request/response bodies keyed exactly as the ledger expects:
//! `transaction_id`, `from_account`, `to_account`, `amount`, `approvers`,
//! `approver_id`, `status`. Contract endpoints use the ledger's camelCase
//! keys (`contractId`, `supplierId`, `totalAmount`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body for `submit_create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferWire {
    /// Globally unique transaction id (caller-assigned before the call)
    pub transaction_id: String,

    /// Funds source account
    pub from_account: String,

    /// Funds destination account
    pub to_account: String,

    /// Transfer amount
    pub amount: Decimal,

    /// Required approver ids
    pub approvers: Vec<String>,
}

/// Body for `submit_approve`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveWire {
    /// Transaction being approved
    pub transaction_id: String,

    /// Participant granting approval
    pub approver_id: String,
}

/// World state as returned by the ledger
///
/// The `status` here is authoritative; callers overwrite any locally
/// computed status with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldStateWire {
    /// Transaction id
    pub transaction_id: String,

    /// Funds source account
    #[serde(default)]
    pub from_account: String,

    /// Funds destination account
    #[serde(default)]
    pub to_account: String,

    /// Transfer amount
    #[serde(default)]
    pub amount: Decimal,

    /// Authoritative status string (PENDING, PARTIALLY_APPROVED, ...)
    pub status: String,

    /// Count of approvals the ledger has recorded
    #[serde(default)]
    pub approval_count: u32,

    /// Ledger-side last update time
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// One supplier entry in a contract submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierWire {
    /// Supplier id
    pub supplier_id: String,

    /// Amount owed to this supplier
    pub amount: Decimal,
}

/// Body for `submit_contract`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractWire {
    /// Contract id (assigned before the call)
    pub contract_id: String,

    /// Buyer (anchor) id
    pub buyer: String,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Supplier lines
    pub suppliers: Vec<SupplierWire>,

    /// Sum of supplier amounts
    pub total_amount: Decimal,

    /// Optional attached document reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// Body for `approve_contract`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractApprovalWire {
    /// Contract being approved
    pub contract_id: String,

    /// Supplier granting approval
    pub supplier_id: String,
}

/// Acknowledgement for contract endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    /// "success" is the only success signal
    pub status: String,
}

impl Ack {
    /// Whether the ledger accepted the submission
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_wire_keys() {
        let wire = CreateTransferWire {
            transaction_id: "tx-1".to_string(),
            from_account: "A".to_string(),
            to_account: "B".to_string(),
            amount: Decimal::from(100),
            approvers: vec!["x".to_string(), "y".to_string()],
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("transaction_id").is_some());
        assert!(json.get("from_account").is_some());
        assert!(json.get("to_account").is_some());
        assert!(json.get("approvers").is_some());
        assert_eq!(json["amount"], serde_json::json!(100.0));
    }

    #[test]
    fn test_contract_wire_camel_case() {
        let wire = ContractApprovalWire {
            contract_id: "c-1".to_string(),
            supplier_id: "s-1".to_string(),
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("contractId").is_some());
        assert!(json.get("supplierId").is_some());
    }

    #[test]
    fn test_world_state_wire_decodes_minimal_body() {
        let ws: WorldStateWire = serde_json::from_str(
            r#"{"transaction_id":"tx-1","status":"PARTIALLY_APPROVED","approval_count":1}"#,
        )
        .unwrap();
        assert_eq!(ws.status, "PARTIALLY_APPROVED");
        assert_eq!(ws.approval_count, 1);
        assert!(ws.last_updated.is_none());
    }

    #[test]
    fn test_ack_success() {
        assert!(Ack { status: "success".to_string() }.is_success());
        assert!(!Ack { status: "error".to_string() }.is_success());
    }
}
