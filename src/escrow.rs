//! Escrow transaction record and its lifecycle.
//!
//! Maintains the invariant: `vendor_amount + commission_fee == total_amount`.

use crate::amount::Amount;
use crate::fee::FeeCalculation;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Escrow lifecycle.
///
/// ```text
/// pending ──hold──> held ──release──> released
///    │                │
///    └────refund──────┴──refund────> refunded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EscrowStatus {
    /// Created, funds not yet committed.
    #[default]
    Pending,
    /// Funds committed by the renter.
    Held,
    /// Returned to the renter.
    Refunded,
    /// Paid out to the vendor, commission retained.
    Released,
}

impl EscrowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EscrowStatus::Refunded | EscrowStatus::Released)
    }
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscrowStatus::Pending => write!(f, "pending"),
            EscrowStatus::Held => write!(f, "held"),
            EscrowStatus::Refunded => write!(f, "refunded"),
            EscrowStatus::Released => write!(f, "released"),
        }
    }
}

/// Fields supplied by the caller when opening an escrow.
#[derive(Debug, Clone)]
pub struct NewEscrow {
    pub rental_id: String,
    pub renter_id: String,
    pub vendor_id: String,
    pub total_amount: Amount,
}

/// Funds notionally held between a renter and a vendor.
///
/// # Invariants
///
/// - `vendor_amount + commission_fee == total_amount`
/// - The fee split is fixed at creation and never recalculated
/// - `completed_at` is set only by release, `refunded_at` only by refund
#[derive(Debug, Clone, Serialize)]
pub struct EscrowTransaction {
    pub id: String,
    pub rental_id: String,
    pub renter_id: String,
    pub vendor_id: String,
    pub total_amount: Amount,
    pub commission_fee: Amount,
    pub vendor_amount: Amount,
    pub status: EscrowStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
}

impl EscrowTransaction {
    /// Opens a pending escrow using a precomputed fee split.
    pub(crate) fn open(fields: NewEscrow, fee: &FeeCalculation, now: DateTime<Utc>) -> Self {
        EscrowTransaction {
            id: generate_id(now),
            rental_id: fields.rental_id,
            renter_id: fields.renter_id,
            vendor_id: fields.vendor_id,
            total_amount: fields.total_amount,
            commission_fee: fee.commission_fee,
            vendor_amount: fee.vendor_amount,
            status: EscrowStatus::Pending,
            created_at: now,
            completed_at: None,
            refunded_at: None,
        }
    }

    /// Commits funds. Returns `false` unless `pending`.
    pub(crate) fn hold(&mut self) -> bool {
        if self.status != EscrowStatus::Pending {
            return false;
        }

        self.status = EscrowStatus::Held;
        true
    }

    /// Pays out to the vendor. Returns `false` unless `held`.
    pub(crate) fn release(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != EscrowStatus::Held {
            return false;
        }

        self.status = EscrowStatus::Released;
        self.completed_at = Some(now);
        true
    }

    /// Returns funds to the renter. Returns `false` from a terminal state.
    pub(crate) fn refund(&mut self, now: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        self.status = EscrowStatus::Refunded;
        self.refunded_at = Some(now);
        true
    }

    /// Verifies the invariant: `vendor_amount + commission_fee == total_amount`.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        self.vendor_amount + self.commission_fee == self.total_amount
    }
}

/// `escrow_<unix millis>_<9 hex chars>`.
pub(crate) fn generate_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("escrow_{}_{}", now.timestamp_millis(), &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::calculate_fee;

    fn open(total: i64) -> EscrowTransaction {
        let total_amount = Amount::rupees(total);
        let fee = calculate_fee(total_amount, None);
        EscrowTransaction::open(
            NewEscrow {
                rental_id: "rental-1".into(),
                renter_id: "renter-1".into(),
                vendor_id: "vendor-1".into(),
                total_amount,
            },
            &fee,
            Utc::now(),
        )
    }

    #[test]
    fn test_open_is_pending_with_split() {
        let tx = open(1000);
        assert_eq!(tx.status, EscrowStatus::Pending);
        assert_eq!(tx.commission_fee, Amount::rupees(50));
        assert_eq!(tx.vendor_amount, Amount::rupees(950));
        assert!(tx.completed_at.is_none());
        assert!(tx.refunded_at.is_none());
        assert!(tx.check_invariant());
    }

    #[test]
    fn test_id_shape() {
        let tx = open(100);
        let parts: Vec<&str> = tx.id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "escrow");
        assert_eq!(parts[1], tx.created_at.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
        assert_ne!(open(100).id, tx.id);
    }

    #[test]
    fn test_release_requires_hold() {
        let mut tx = open(500);
        assert!(!tx.release(Utc::now()));
        assert_eq!(tx.status, EscrowStatus::Pending);

        assert!(tx.hold());
        assert!(!tx.hold());
        assert!(tx.release(Utc::now()));
        assert_eq!(tx.status, EscrowStatus::Released);
        assert!(tx.completed_at.is_some());
        assert!(tx.refunded_at.is_none());
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let mut released = open(500);
        released.hold();
        released.release(Utc::now());
        assert!(!released.hold());
        assert!(!released.refund(Utc::now()));
        assert!(!released.release(Utc::now()));
        assert_eq!(released.status, EscrowStatus::Released);

        let mut refunded = open(500);
        assert!(refunded.refund(Utc::now()));
        assert!(!refunded.hold());
        assert!(!refunded.refund(Utc::now()));
        assert!(!refunded.release(Utc::now()));
        assert_eq!(refunded.status, EscrowStatus::Refunded);
        assert!(refunded.completed_at.is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(EscrowStatus::Pending.to_string(), "pending");
        assert_eq!(EscrowStatus::Released.to_string(), "released");
    }
}
