//! Weekday aggregation of paired receipts and fees

use bigdecimal::BigDecimal;
use chrono::Weekday;
use serde::Serialize;

use crate::reconciliation::pairing::PairingResult;

/// Weekdays in reporting order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Paired receipt and fee totals for one weekday
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayTotals {
    pub weekday: Weekday,
    pub receipt_count: usize,
    pub fee_count: usize,
    /// Sum of receipt amounts
    pub receipts: BigDecimal,
    /// Sum of absolute fee amounts
    pub fees: BigDecimal,
    /// `receipts - fees`
    pub net: BigDecimal,
}

impl WeekdayTotals {
    fn empty(weekday: Weekday) -> Self {
        Self {
            weekday,
            receipt_count: 0,
            fee_count: 0,
            receipts: BigDecimal::from(0),
            fees: BigDecimal::from(0),
            net: BigDecimal::from(0),
        }
    }

    /// Whether any receipt or fee fell on this weekday
    pub fn is_active(&self) -> bool {
        self.receipt_count > 0 || self.fee_count > 0
    }
}

/// Totals for all seven weekdays, Monday to Sunday
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBreakdown {
    days: Vec<WeekdayTotals>,
}

impl WeekdayBreakdown {
    /// Totals for one weekday
    pub fn get(&self, weekday: Weekday) -> &WeekdayTotals {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// All seven weekdays, including inactive ones
    pub fn days(&self) -> &[WeekdayTotals] {
        &self.days
    }

    /// Weekdays with at least one receipt or fee
    pub fn active(&self) -> impl Iterator<Item = &WeekdayTotals> {
        self.days.iter().filter(|day| day.is_active())
    }

    pub fn total_receipts(&self) -> BigDecimal {
        self.days.iter().map(|day| &day.receipts).sum()
    }

    pub fn total_fees(&self) -> BigDecimal {
        self.days.iter().map(|day| &day.fees).sum()
    }

    pub fn total_net(&self) -> BigDecimal {
        self.days.iter().map(|day| &day.net).sum()
    }
}

/// Sum paired receipts and fees by the weekday of their timestamp
pub fn aggregate_by_weekday(pairing: &PairingResult<'_>) -> WeekdayBreakdown {
    let mut days: Vec<WeekdayTotals> = WEEKDAYS.iter().map(|d| WeekdayTotals::empty(*d)).collect();

    for receipt in &pairing.paired_receipts {
        let day = &mut days[receipt.weekday().num_days_from_monday() as usize];
        day.receipt_count += 1;
        day.receipts += &receipt.amount;
    }

    for fee in &pairing.paired_fees {
        let day = &mut days[fee.weekday().num_days_from_monday() as usize];
        day.fee_count += 1;
        day.fees += fee.abs_amount();
    }

    for day in &mut days {
        day.net = &day.receipts - &day.fees;
    }

    WeekdayBreakdown { days }
}
