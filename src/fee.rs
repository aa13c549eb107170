//! Platform commission calculation.
//!
//! The commission is a flat percentage of the rental price with a reduced
//! rate for loyal renters, then clamped to a floor and a cap. The floor is
//! applied before the cap.

use crate::amount::Amount;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rental history used to decide loyalty pricing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHistory {
    pub completed_rentals: u32,
    pub total_transactions: u32,
    pub trust_score: u8,
}

/// Commission parameters.
///
/// `Default` carries the marketplace's live pricing: 5% standard, 3% for
/// renters with more than 10 completed rentals, ₹10 floor, ₹100 cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    pub standard_rate: Decimal,
    pub loyalty_rate: Decimal,
    /// Loyalty applies when completed rentals strictly exceed this.
    pub loyalty_threshold: u32,
    pub minimum_fee: Amount,
    pub maximum_fee: Amount,
    /// Largest amount accepted by [`validate_transaction_amount`].
    pub max_transaction: Amount,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            standard_rate: Decimal::new(5, 2),
            loyalty_rate: Decimal::new(3, 2),
            loyalty_threshold: 10,
            minimum_fee: Amount::rupees(10),
            maximum_fee: Amount::rupees(100),
            max_transaction: Amount::rupees(1_000_000),
        }
    }
}

/// Which adjustment rules fired for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    pub base_rate: Decimal,
    /// Difference between the standard and loyalty commission, for display.
    pub loyalty_discount: Option<Amount>,
    pub minimum_fee_applied: bool,
    pub maximum_fee_capped: bool,
}

/// Result of a fee calculation. Never stored.
///
/// # Negative Vendor Amount
///
/// `vendor_amount` is not floored. A rental cheaper than the minimum fee
/// yields a negative vendor share; `vendor_amount + commission_fee` still
/// equals `rental_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeCalculation {
    pub rental_amount: Amount,
    pub commission_rate: Decimal,
    pub commission_fee: Amount,
    pub vendor_amount: Amount,
    pub breakdown: FeeBreakdown,
}

impl FeeSchedule {
    fn is_loyal(&self, history: Option<&UserHistory>) -> bool {
        history.is_some_and(|h| h.completed_rentals > self.loyalty_threshold)
    }

    /// Computes the commission split for `rental_amount`.
    ///
    /// Does not validate the amount; see [`FeeSchedule::validate`].
    pub fn calculate(
        &self,
        rental_amount: Amount,
        user_history: Option<&UserHistory>,
    ) -> FeeCalculation {
        let loyal = self.is_loyal(user_history);
        let rate = if loyal {
            self.loyalty_rate
        } else {
            self.standard_rate
        };

        let mut commission_fee = rental_amount * rate;

        let minimum_fee_applied = commission_fee < self.minimum_fee;
        if minimum_fee_applied {
            commission_fee = self.minimum_fee;
        }

        let maximum_fee_capped = commission_fee > self.maximum_fee;
        if maximum_fee_capped {
            commission_fee = self.maximum_fee;
        }

        let loyalty_discount = loyal
            .then(|| rental_amount * self.standard_rate - rental_amount * self.loyalty_rate);

        FeeCalculation {
            rental_amount,
            commission_rate: rate,
            commission_fee,
            vendor_amount: rental_amount - commission_fee,
            breakdown: FeeBreakdown {
                base_rate: rate,
                loyalty_discount,
                minimum_fee_applied,
                maximum_fee_capped,
            },
        }
    }

    /// Returns `true` iff `0 < amount <= max_transaction`.
    pub fn validate(&self, amount: Amount) -> bool {
        amount.is_positive() && amount <= self.max_transaction
    }
}

/// [`FeeSchedule::calculate`] with the default schedule.
pub fn calculate_fee(rental_amount: Amount, user_history: Option<&UserHistory>) -> FeeCalculation {
    FeeSchedule::default().calculate(rental_amount, user_history)
}

/// Returns `true` iff `0 < amount <= 1,000,000`.
pub fn validate_transaction_amount(amount: Amount) -> bool {
    FeeSchedule::default().validate(amount)
}

/// Formats an amount as rupees with Indian digit grouping, e.g. `₹1,00,000.00`.
pub fn format_currency(amount: Amount) -> String {
    let rounded = amount
        .value()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (whole, paise) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut out = String::with_capacity(plain.len() + 8);
    if negative {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&group_indian(whole));
    out.push('.');
    out.push_str(paise);
    out
}

/// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
