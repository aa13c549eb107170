//! # Campus Rentals
//!
//! Settlement and matching logic for a campus rental marketplace: commission
//! calculation, an in-memory escrow ledger, and keyword-weighted catalog
//! matching.
//!
//! ## Design Principles
//!
//! - **Fixed-point money**: amounts carry 4 decimal places via `rust_decimal`
//! - **Explicit ledger**: no global state; callers own an [`EscrowLedger`]
//! - **Non-throwing transitions**: ledger operations return `bool` / `Option`
//! - **Deterministic scoring**: additive rule tables, stable ordering
//!
//! ## Example
//!
//! ```
//! use campus_rentals::{Amount, EscrowLedger, EscrowStatus, NewEscrow};
//!
//! let mut ledger = EscrowLedger::new();
//! let tx = ledger.create_escrow(NewEscrow {
//!     rental_id: "rental-1".into(),
//!     renter_id: "renter-1".into(),
//!     vendor_id: "vendor-1".into(),
//!     total_amount: Amount::rupees(1000),
//! });
//!
//! assert!(ledger.hold_funds(&tx.id));
//! assert!(ledger.release_funds(&tx.id));
//! assert_eq!(
//!     ledger.get_transaction_status(&tx.id).unwrap().status,
//!     EscrowStatus::Released
//! );
//! ```

pub mod amount;
pub mod catalog;
pub mod categorize;
pub mod error;
pub mod escrow;
pub mod fee;
pub mod ledger;
pub mod matching;
pub mod recommend;

pub use amount::Amount;
pub use catalog::{Catalog, CatalogItem, CatalogRecord, Category};
pub use categorize::{suggest_category, CategorySuggestion};
pub use error::{Error, Result};
pub use escrow::{EscrowStatus, EscrowTransaction, NewEscrow};
pub use fee::{
    calculate_fee, format_currency, validate_transaction_amount, FeeBreakdown, FeeCalculation,
    FeeSchedule, UserHistory,
};
pub use ledger::EscrowLedger;
pub use matching::{match_request, match_request_with, ItemRequest, MatchingConfig, ScoredItem};
pub use recommend::{recommend_for, UserContext};
