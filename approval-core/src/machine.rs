//! Approval state machine
//!
//! Shared transition logic for transfers and contracts: given the current
//! status, the fixed quorum, and the decisions recorded so far, compute the
//! next status for an incoming decision.
//!
//! Duplicate submissions from the same participant (network retries to the
//! ledger can duplicate approval submissions) are no-ops: `accepted = false`
//! and no state change. Only approver identity matters, never timestamps.

use crate::types::{Decision, ParticipantId, Quorum, TransferStatus};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Outcome of applying one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status after the decision
    pub status: TransferStatus,

    /// Whether the decision changed state (false for duplicates)
    pub accepted: bool,
}

/// Apply an incoming decision to the current state
///
/// `recorded` maps each participant to the decision already accepted from
/// them; the caller inserts the new entry only when `accepted` is true.
///
/// Rules:
/// - APPROVE from `p` is accepted iff `p` is in the quorum and has not
///   already decided. Approved count == quorum size → Approved, otherwise
///   PartiallyApproved.
/// - REJECT from a required approver is accepted only while status is
///   Pending or PartiallyApproved and transitions immediately to Rejected.
/// - EXECUTE is accepted only from Approved; it is a ledger-confirmed event
///   and must never be applied from local approvals alone.
pub fn apply(
    current: TransferStatus,
    quorum: &Quorum,
    recorded: &BTreeMap<ParticipantId, Decision>,
    participant: &ParticipantId,
    decision: Decision,
) -> Result<Transition> {
    if decision == Decision::Execute {
        if current != TransferStatus::Approved {
            return Err(Error::Conflict(format!(
                "cannot execute transfer in status {}",
                current
            )));
        }
        return Ok(Transition {
            status: TransferStatus::Executed,
            accepted: true,
        });
    }

    if !quorum.contains(participant) {
        return Err(Error::InvalidArgument(format!(
            "{} is not a required approver",
            participant
        )));
    }

    // Identity-based dedup: a second submission from the same participant
    // is rejected regardless of arrival order or timestamp.
    if recorded.contains_key(participant) {
        return Ok(Transition {
            status: current,
            accepted: false,
        });
    }

    if current.is_terminal() {
        return Err(Error::Conflict(format!(
            "transfer is terminal in status {}",
            current
        )));
    }

    match decision {
        Decision::Approve => {
            if current == TransferStatus::Approved {
                return Err(Error::Conflict(
                    "quorum already complete".to_string(),
                ));
            }
            let approved = recorded
                .values()
                .filter(|d| **d == Decision::Approve)
                .count()
                + 1;
            let status = if approved >= quorum.size() {
                TransferStatus::Approved
            } else {
                TransferStatus::PartiallyApproved
            };
            Ok(Transition {
                status,
                accepted: true,
            })
        }
        Decision::Reject => {
            if !matches!(
                current,
                TransferStatus::Pending | TransferStatus::PartiallyApproved
            ) {
                return Err(Error::Conflict(format!(
                    "cannot reject transfer in status {}",
                    current
                )));
            }
            Ok(Transition {
                status: TransferStatus::Rejected,
                accepted: true,
            })
        }
        Decision::Execute => unreachable!("handled above"),
    }
}
