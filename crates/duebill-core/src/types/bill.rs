//! Bill types: stored record, create draft, partial update.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DueBillError, Result};

/// A recurring monthly bill as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: i64,
    pub name: String,
    pub recipient: String,
    /// Day-of-month the bill recurs on, 1-31. Not validated against any
    /// concrete month's length.
    pub due_day: u8,
    pub amount: Decimal,
    pub paid: bool,
}

/// Fields for creating a new bill. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillDraft {
    pub name: String,
    pub recipient: String,
    pub due_day: u8,
    pub amount: Decimal,
    #[serde(default)]
    pub paid: bool,
}

impl BillDraft {
    pub fn new(
        name: impl Into<String>,
        recipient: impl Into<String>,
        due_day: u8,
        amount: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            recipient: recipient.into(),
            due_day,
            amount,
            paid: false,
        }
    }

    /// Check the draft's invariants: non-empty name, due day in 1-31.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DueBillError::validation("bill name must not be empty"));
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(DueBillError::validation(format!(
                "due day must be between 1 and 31, got {}",
                self.due_day
            )));
        }
        Ok(())
    }
}

/// Partial update for an existing bill. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillPatch {
    pub name: Option<String>,
    pub recipient: Option<String>,
    pub due_day: Option<u8>,
    pub amount: Option<Decimal>,
    pub paid: Option<bool>,
}

impl BillPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.recipient.is_none()
            && self.due_day.is_none()
            && self.amount.is_none()
            && self.paid.is_none()
    }

    /// Apply this patch to a bill in place.
    pub fn apply(&self, bill: &mut Bill) {
        if let Some(name) = &self.name {
            bill.name = name.clone();
        }
        if let Some(recipient) = &self.recipient {
            bill.recipient = recipient.clone();
        }
        if let Some(due_day) = self.due_day {
            bill.due_day = due_day;
        }
        if let Some(amount) = self.amount {
            bill.amount = amount;
        }
        if let Some(paid) = self.paid {
            bill.paid = paid;
        }
    }
}
