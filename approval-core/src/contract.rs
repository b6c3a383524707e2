//! Contract aggregate
//!
//! A multi-supplier payment obligation. Each supplier line carries its
//! own approval status; the contract is APPROVED exactly when every line
//! is approved and the line list is non-empty. Line status is monotonic:
//! PENDING moves to APPROVED and never reverts.

use crate::directory::Directory;
use crate::types::ParticipantId;
use crate::{ContractId, Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-supplier line status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineStatus {
    /// Awaiting this supplier's approval
    Pending,
    /// Approved by this supplier (never reverts)
    Approved,
}

/// Overall contract status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    /// At least one supplier line still pending
    Pending,
    /// Every supplier line approved
    Approved,
}

impl ContractStatus {
    /// Stable wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Pending => "PENDING",
            ContractStatus::Approved => "APPROVED",
        }
    }
}

/// One supplier's share of the contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierLine {
    /// Supplier identity
    pub supplier_id: ParticipantId,

    /// Display name, filled by read-time enrichment only
    pub display_name: Option<String>,

    /// Amount owed to this supplier (positive)
    pub amount: Decimal,

    /// Line approval status
    pub status: LineStatus,
}

/// Input for a new supplier line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLine {
    /// Supplier identity
    pub supplier_id: ParticipantId,

    /// Amount owed to this supplier
    pub amount: Decimal,
}

/// Multi-supplier payment obligation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// Contract id, generated once and immutable
    pub contract_id: ContractId,

    /// Buyer (anchor) reference
    pub buyer: ParticipantId,

    /// Free-form description
    pub description: Option<String>,

    /// Ordered supplier lines
    pub lines: Vec<SupplierLine>,

    /// Sum of line amounts, recomputed at creation and held invariant
    pub total_amount: Decimal,

    /// Overall status (Approved iff all lines approved, non-empty)
    pub status: ContractStatus,

    /// Optional reference to an attached document
    pub file_ref: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Monotonically non-decreasing update time
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Create a new pending contract
    ///
    /// Rejects an empty line list or any non-positive line amount.
    pub fn create(
        buyer: ParticipantId,
        lines: Vec<NewLine>,
        description: Option<String>,
        file_ref: Option<String>,
    ) -> Result<Self> {
        if lines.is_empty() {
            return Err(Error::InvalidArgument(
                "contract requires at least one supplier line".to_string(),
            ));
        }
        for line in &lines {
            if line.amount <= Decimal::ZERO {
                return Err(Error::InvalidArgument(format!(
                    "line amount for {} must be positive, got {}",
                    line.supplier_id, line.amount
                )));
            }
        }

        let total_amount: Decimal = lines.iter().map(|l| l.amount).sum();
        let now = Utc::now();

        Ok(Self {
            contract_id: ContractId::generate(),
            buyer,
            description,
            lines: lines
                .into_iter()
                .map(|l| SupplierLine {
                    supplier_id: l.supplier_id,
                    display_name: None,
                    amount: l.amount,
                    status: LineStatus::Pending,
                })
                .collect(),
            total_amount,
            status: ContractStatus::Pending,
            file_ref,
            created_at: now,
            updated_at: now,
        })
    }

    /// Approve the line belonging to `supplier_id`
    ///
    /// `NotFound` when no such line exists; `AlreadyApproved` when the
    /// line is already approved (callers treat this as an idempotent
    /// no-op and return the current contract).
    pub fn approve_line(&mut self, supplier_id: &ParticipantId) -> Result<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| &l.supplier_id == supplier_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "supplier {} not on contract {}",
                    supplier_id, self.contract_id
                ))
            })?;

        if line.status == LineStatus::Approved {
            return Err(Error::AlreadyApproved(format!(
                "supplier {} already approved contract {}",
                supplier_id, self.contract_id
            )));
        }

        line.status = LineStatus::Approved;
        self.status = if self.all_lines_approved() {
            ContractStatus::Approved
        } else {
            ContractStatus::Pending
        };
        self.touch();
        Ok(())
    }

    /// True when the list is non-empty and every line approved
    pub fn all_lines_approved(&self) -> bool {
        !self.lines.is_empty()
            && self.lines.iter().all(|l| l.status == LineStatus::Approved)
    }

    /// Attach supplier display names from the directory
    ///
    /// A pure read-time join: one batched lookup, no persistence. Names
    /// are never written back into the stored contract to avoid stale
    /// name drift.
    pub fn enriched(&self, directory: &dyn Directory) -> Contract {
        let ids: Vec<ParticipantId> =
            self.lines.iter().map(|l| l.supplier_id.clone()).collect();
        let resolved = directory.get_many(&ids);

        let mut enriched = self.clone();
        for line in &mut enriched.lines {
            if let Some(participant) = resolved.get(&line.supplier_id) {
                line.display_name = Some(participant.display_name.clone());
            }
        }
        enriched
    }

    /// Whether a participant appears on this contract (buyer or line)
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.buyer == participant
            || self.lines.iter().any(|l| &l.supplier_id == participant)
    }

    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::types::{Participant, Role};

    fn lines(pairs: &[(&str, i64)]) -> Vec<NewLine> {
        pairs
            .iter()
            .map(|(id, amount)| NewLine {
                supplier_id: ParticipantId::new(*id),
                amount: Decimal::from(*amount),
            })
            .collect()
    }

    fn contract(pairs: &[(&str, i64)]) -> Contract {
        Contract::create(ParticipantId::new("buyer"), lines(pairs), None, None).unwrap()
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let c = contract(&[("s1", 40), ("s2", 60)]);
        assert_eq!(c.total_amount, Decimal::from(100));
        assert_eq!(c.status, ContractStatus::Pending);
        assert!(c.lines.iter().all(|l| l.status == LineStatus::Pending));
    }

    #[test]
    fn test_create_rejects_empty_and_nonpositive() {
        assert!(matches!(
            Contract::create(ParticipantId::new("b"), vec![], None, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Contract::create(ParticipantId::new("b"), lines(&[("s1", 0)]), None, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Contract::create(ParticipantId::new("b"), lines(&[("s1", -5)]), None, None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_approval_scenario() {
        // suppliers [{S1,40},{S2,60}] -> total 100, PENDING
        let mut c = contract(&[("s1", 40), ("s2", 60)]);

        c.approve_line(&ParticipantId::new("s1")).unwrap();
        assert_eq!(c.status, ContractStatus::Pending); // s2 still pending

        c.approve_line(&ParticipantId::new("s2")).unwrap();
        assert_eq!(c.status, ContractStatus::Approved);
    }

    #[test]
    fn test_duplicate_line_approval() {
        let mut c = contract(&[("s1", 40), ("s2", 60)]);
        c.approve_line(&ParticipantId::new("s1")).unwrap();

        let err = c.approve_line(&ParticipantId::new("s1")).unwrap_err();
        assert!(matches!(err, Error::AlreadyApproved(_)));
        assert_eq!(c.status, ContractStatus::Pending);
    }

    #[test]
    fn test_unknown_supplier_not_found() {
        let mut c = contract(&[("s1", 40)]);
        let err = c.approve_line(&ParticipantId::new("nobody")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_enrichment_does_not_mutate_original() {
        let directory = InMemoryDirectory::new();
        directory
            .register(Participant {
                id: ParticipantId::new("s1"),
                display_name: "Acme Components".to_string(),
                role: Role::Supplier,
            })
            .unwrap();

        let c = contract(&[("s1", 40), ("s2", 60)]);
        let enriched = c.enriched(&directory);

        assert_eq!(
            enriched.lines[0].display_name.as_deref(),
            Some("Acme Components")
        );
        // s2 is unknown to the directory, stays unresolved
        assert_eq!(enriched.lines[1].display_name, None);
        // original record untouched
        assert!(c.lines.iter().all(|l| l.display_name.is_none()));
    }

    #[test]
    fn test_involves() {
        let c = contract(&[("s1", 40)]);
        assert!(c.involves(&ParticipantId::new("buyer")));
        assert!(c.involves(&ParticipantId::new("s1")));
        assert!(!c.involves(&ParticipantId::new("s2")));
    }
}
