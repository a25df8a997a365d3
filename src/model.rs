// src/model.rs
//
// Wire types for the records service. The service is the source of
// truth; everything here is a transient, re-fetchable snapshot.
//
// Amount convention: `amount` is an unsigned magnitude and `category`
// is the explicit income/expense marker. Signed values only exist at
// aggregation time (server side). `normalized` repairs payloads from
// older deployments that still encode the category in the sign.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Income,
    Expense,
}

impl Default for Category {
    fn default() -> Self {
        Category::Income
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

/// Server-side list filter; maps onto the `?type=` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Income,
    Expense,
}

impl CategoryFilter {
    pub fn query_value(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money(pub Decimal);

impl Money {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }
}

/// One transaction as reported by the service. `id` and `date` are
/// server-assigned and never produced by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
    pub category: Category,
    pub description: String,
}

impl FinancialRecord {
    /// Repairs sign-encoded payloads: a negative amount means Expense,
    /// whatever the category field claims.
    pub fn normalized(mut self) -> Self {
        if self.amount.0.is_sign_negative() {
            self.amount = Money(self.amount.0.abs());
            self.category = Category::Expense;
        }
        self
    }

    /// Signed view used for aggregation checks; expenses are negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.category {
            Category::Income => self.amount.0.abs(),
            Category::Expense => -self.amount.0.abs(),
        }
    }
}

/// Create payload; the service assigns `id` and `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub amount: Money,
    pub category: Category,
    pub description: String,
}

/// Update payload for an existing record (addressed by id in the path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub amount: Money,
    pub category: Category,
    pub description: String,
}

/// Read-only aggregate computed server-side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NetWorthData {
    pub net_worth: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
}

impl NetWorthData {
    /// Fixes the expense sign: `total_expenses` is displayed and
    /// compared as a magnitude, so `net_worth = income - expenses`.
    pub fn normalized(mut self) -> Self {
        self.total_expenses = self.total_expenses.abs();
        self
    }
}

/// Mutation acknowledgment body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}
