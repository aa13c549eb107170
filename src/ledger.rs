//! In-memory escrow ledger.
//!
//! The ledger is an explicit value: construct one per session and pass it
//! to whatever needs it. Nothing is persisted, so dropping the ledger drops
//! the history.

use crate::amount::Amount;
use crate::escrow::{generate_id, EscrowStatus, EscrowTransaction, NewEscrow};
use crate::fee::{FeeSchedule, UserHistory};
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Registry of escrow transactions and their settlement totals.
///
/// Transitions report failure with `false` and leave the record untouched.
/// Unknown ids also return `false`.
///
/// # Ordering
///
/// [`EscrowLedger::transactions`] yields records in creation order.
pub struct EscrowLedger {
    schedule: FeeSchedule,

    /// Records in creation order.
    entries: Vec<EscrowTransaction>,

    /// Escrow id to position in `entries`.
    index: HashMap<String, usize>,

    /// Commission retained on released escrows.
    platform_revenue: Amount,

    /// Vendor share paid out on released escrows, per vendor.
    vendor_payouts: HashMap<String, Amount>,
}

impl EscrowLedger {
    /// Creates an empty ledger on the default fee schedule.
    pub fn new() -> Self {
        Self::with_schedule(FeeSchedule::default())
    }

    pub fn with_schedule(schedule: FeeSchedule) -> Self {
        EscrowLedger {
            schedule,
            entries: Vec::new(),
            index: HashMap::new(),
            platform_revenue: Amount::ZERO,
            vendor_payouts: HashMap::new(),
        }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Opens a pending escrow with the standard commission.
    pub fn create_escrow(&mut self, fields: NewEscrow) -> EscrowTransaction {
        self.create_escrow_with_history(fields, None)
    }

    /// Opens a pending escrow, pricing the commission from the renter's history.
    ///
    /// The amount is not validated here; callers check it with
    /// [`FeeSchedule::validate`] first.
    pub fn create_escrow_with_history(
        &mut self,
        fields: NewEscrow,
        history: Option<&UserHistory>,
    ) -> EscrowTransaction {
        let fee = self.schedule.calculate(fields.total_amount, history);
        let tx = EscrowTransaction::open(fields, &fee, Utc::now());

        debug!(
            "Opened escrow {} for rental {}: total {}, commission {}, vendor {}",
            tx.id, tx.rental_id, tx.total_amount, tx.commission_fee, tx.vendor_amount
        );
        #[cfg(debug_assertions)]
        debug_assert!(tx.check_invariant());

        self.admit(tx)
    }

    /// Appends `tx`, giving it a fresh id if its id is already taken.
    fn admit(&mut self, mut tx: EscrowTransaction) -> EscrowTransaction {
        while self.index.contains_key(&tx.id) {
            let fresh = generate_id(tx.created_at);
            warn!("Escrow id {} already in use, reissuing as {}", tx.id, fresh);
            tx.id = fresh;
        }

        self.index.insert(tx.id.clone(), self.entries.len());
        self.entries.push(tx.clone());
        tx
    }

    /// Moves a pending escrow to held.
    pub fn hold_funds(&mut self, id: &str) -> bool {
        let Some(tx) = self.entry_mut(id, "hold") else {
            return false;
        };

        if !tx.hold() {
            warn!("Cannot hold escrow {} in state {}", id, tx.status);
            return false;
        }

        debug!("Escrow {} funds held", id);
        true
    }

    /// Releases a held escrow: the vendor is paid and the commission booked.
    pub fn release_funds(&mut self, id: &str) -> bool {
        let Some(tx) = self.entry_mut(id, "release") else {
            return false;
        };

        if !tx.release(Utc::now()) {
            warn!("Cannot release escrow {} in state {}", id, tx.status);
            return false;
        }

        let vendor_id = tx.vendor_id.clone();
        let vendor_amount = tx.vendor_amount;
        let commission_fee = tx.commission_fee;

        self.platform_revenue += commission_fee;
        *self
            .vendor_payouts
            .entry(vendor_id.clone())
            .or_insert(Amount::ZERO) += vendor_amount;

        info!(
            "Escrow {} released: {} to vendor {}, {} commission retained",
            id, vendor_amount, vendor_id, commission_fee
        );
        true
    }

    /// Refunds a pending or held escrow to the renter.
    pub fn refund_funds(&mut self, id: &str) -> bool {
        let Some(tx) = self.entry_mut(id, "refund") else {
            return false;
        };

        let from = tx.status;
        if !tx.refund(Utc::now()) {
            warn!("Cannot refund escrow {} in state {}", id, from);
            return false;
        }

        info!(
            "Escrow {} refunded from {}: {} returned to renter {}",
            id, from, tx.total_amount, tx.renter_id
        );
        true
    }

    /// Current record for `id`, or `None` if it was never created here.
    pub fn get_transaction_status(&self, id: &str) -> Option<&EscrowTransaction> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// All records in creation order.
    pub fn transactions(&self) -> impl Iterator<Item = &EscrowTransaction> {
        self.entries.iter()
    }

    pub fn transactions_for_renter<'a>(
        &'a self,
        renter_id: &'a str,
    ) -> impl Iterator<Item = &'a EscrowTransaction> + 'a {
        self.entries.iter().filter(move |tx| tx.renter_id == renter_id)
    }

    pub fn transactions_for_vendor<'a>(
        &'a self,
        vendor_id: &'a str,
    ) -> impl Iterator<Item = &'a EscrowTransaction> + 'a {
        self.entries.iter().filter(move |tx| tx.vendor_id == vendor_id)
    }

    /// Number of records in `status`.
    pub fn count_in(&self, status: EscrowStatus) -> usize {
        self.entries.iter().filter(|tx| tx.status == status).count()
    }

    /// Total commission retained across released escrows.
    pub fn platform_revenue(&self) -> Amount {
        self.platform_revenue
    }

    /// Total paid out to `vendor_id` across released escrows.
    pub fn vendor_payout(&self, vendor_id: &str) -> Amount {
        self.vendor_payouts
            .get(vendor_id)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, id: &str, op: &str) -> Option<&mut EscrowTransaction> {
        match self.index.get(id) {
            Some(&pos) => self.entries.get_mut(pos),
            None => {
                warn!("Cannot {} unknown escrow {}", op, id);
                None
            }
        }
    }
}

impl Default for EscrowLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rental(n: u32, vendor: &str, total: i64) -> NewEscrow {
        NewEscrow {
            rental_id: format!("rental-{}", n),
            renter_id: format!("renter-{}", n % 2),
            vendor_id: vendor.to_string(),
            total_amount: Amount::rupees(total),
        }
    }

    #[test]
    fn test_create_is_pending_and_retrievable() {
        let mut ledger = EscrowLedger::new();
        let tx = ledger.create_escrow(rental(1, "v1", 100));

        assert_eq!(tx.status, EscrowStatus::Pending);
        assert_eq!(tx.commission_fee, Amount::rupees(10));
        assert_eq!(tx.vendor_amount, Amount::rupees(90));

        let stored = ledger.get_transaction_status(&tx.id).unwrap();
        assert_eq!(stored.id, tx.id);
        assert_eq!(stored.status, EscrowStatus::Pending);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_release_before_hold_fails() {
        let mut ledger = EscrowLedger::new();
        let tx = ledger.create_escrow(rental(1, "v1", 500));

        assert!(!ledger.release_funds(&tx.id));
        let stored = ledger.get_transaction_status(&tx.id).unwrap();
        assert_eq!(stored.status, EscrowStatus::Pending);
        assert!(stored.completed_at.is_none());
        assert_eq!(ledger.platform_revenue(), Amount::ZERO);
    }

    #[test]
    fn test_full_settlement_books_totals() {
        let mut ledger = EscrowLedger::new();
        let tx = ledger.create_escrow(rental(1, "v1", 1000));

        assert!(ledger.hold_funds(&tx.id));
        assert!(ledger.release_funds(&tx.id));

        let stored = ledger.get_transaction_status(&tx.id).unwrap();
        assert_eq!(stored.status, EscrowStatus::Released);
        assert!(stored.completed_at.is_some());

        assert!(!ledger.refund_funds(&tx.id));
        assert_eq!(ledger.platform_revenue(), Amount::rupees(50));
        assert_eq!(ledger.vendor_payout("v1"), Amount::rupees(950));
    }

    #[test]
    fn test_refund_books_nothing() {
        let mut ledger = EscrowLedger::new();
        let a = ledger.create_escrow(rental(1, "v1", 1000));
        let b = ledger.create_escrow(rental(2, "v1", 1000));

        assert!(ledger.refund_funds(&a.id));
        assert!(ledger.hold_funds(&b.id));
        assert!(ledger.refund_funds(&b.id));

        assert_eq!(ledger.platform_revenue(), Amount::ZERO);
        assert_eq!(ledger.vendor_payout("v1"), Amount::ZERO);
        assert_eq!(ledger.count_in(EscrowStatus::Refunded), 2);
    }

    #[test]
    fn test_unknown_id() {
        let mut ledger = EscrowLedger::new();
        assert!(!ledger.hold_funds("escrow_0_missing"));
        assert!(!ledger.release_funds("escrow_0_missing"));
        assert!(!ledger.refund_funds("escrow_0_missing"));
        assert!(ledger.get_transaction_status("escrow_0_missing").is_none());
    }

    #[test]
    fn test_loyalty_history_prices_commission() {
        let mut ledger = EscrowLedger::new();
        let history = UserHistory {
            completed_rentals: 12,
            total_transactions: 12,
            trust_score: 80,
        };
        let tx = ledger.create_escrow_with_history(rental(1, "v1", 1000), Some(&history));
        assert_eq!(tx.commission_fee, Amount::rupees(30));
        assert_eq!(tx.vendor_amount, Amount::rupees(970));
    }

    #[test]
    fn test_listing_preserves_creation_order() {
        let mut ledger = EscrowLedger::new();
        let ids: Vec<String> = (0..5)
            .map(|n| ledger.create_escrow(rental(n, "v1", 200)).id)
            .collect();

        let listed: Vec<String> = ledger.transactions().map(|tx| tx.id.clone()).collect();
        assert_eq!(listed, ids);

        let renter0: Vec<&str> = ledger
            .transactions_for_renter("renter-0")
            .map(|tx| tx.rental_id.as_str())
            .collect();
        assert_eq!(renter0, vec!["rental-0", "rental-2", "rental-4"]);
    }

    #[test]
    fn test_colliding_id_is_reissued() {
        let mut ledger = EscrowLedger::new();
        let first = ledger.create_escrow(rental(1, "v1", 300));
        ledger.hold_funds(&first.id);

        let second = ledger.admit(first.clone());
        assert_ne!(second.id, first.id);
        assert!(second.id.starts_with("escrow_"));
        assert_eq!(ledger.len(), 2);

        // The original record is still the one behind its id
        let stored = ledger.get_transaction_status(&first.id).unwrap();
        assert_eq!(stored.status, EscrowStatus::Held);
        assert_eq!(
            ledger.get_transaction_status(&second.id).unwrap().status,
            EscrowStatus::Pending
        );
    }

    #[test]
    fn test_ledgers_are_independent() {
        let mut first = EscrowLedger::new();
        let second = EscrowLedger::new();
        let tx = first.create_escrow(rental(1, "v1", 300));

        assert!(second.get_transaction_status(&tx.id).is_none());
        assert!(second.is_empty());
    }
}
