use thiserror::Error;

use crate::ai::ReceiptScan;
use crate::models::{Category, FinancialTransaction, NewTransaction, TransactionKind};
use crate::utils::parse_date;

pub const RECEIPT_FALLBACK_DESCRIPTION: &str = "Parsed from receipt";

#[derive(Debug, Error, PartialEq)]
pub enum FinanceError {
    #[error("Description is required")]
    MissingDescription,
    #[error("Amount must be a number greater than zero")]
    InvalidAmount,
    #[error("Category {category} is not valid for {kind} transactions")]
    InvalidCategory { category: Category, kind: &'static str },
    #[error("Date must be in YYYY-MM-DD format: {0}")]
    InvalidDate(String),
    #[error("Could not parse the receipt image. Please try again.")]
    UnreadableReceipt,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
}

/// Income, expenses and net balance in a single pass.
pub fn summarize(transactions: &[FinancialTransaction]) -> FinanceSummary {
    let (income, expenses) = transactions.iter().fold((0.0, 0.0), |(income, expenses), t| {
        match t.kind {
            TransactionKind::Income => (income + t.amount, expenses),
            TransactionKind::Expense => (income, expenses + t.amount),
        }
    });
    FinanceSummary {
        total_income: income,
        total_expenses: expenses,
        net_balance: income - expenses,
    }
}

/// Display order: newest date first. The sort is stable, so entries sharing
/// a date keep their collection order.
pub fn newest_first(transactions: &[FinancialTransaction]) -> Vec<&FinancialTransaction> {
    let mut ordered: Vec<&FinancialTransaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
}

pub fn format_amount(transaction: &FinancialTransaction) -> String {
    let sign = match transaction.kind {
        TransactionKind::Expense => '-',
        TransactionKind::Income => '+',
    };
    format!("{}${:.2}", sign, transaction.amount)
}

/// Raw values of the manual entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub description: String,
    pub amount: String,
    pub category: Category,
    pub date: String,
}

impl TransactionDraft {
    pub fn new(today: String) -> Self {
        Self {
            kind: TransactionKind::Expense,
            description: String::new(),
            amount: String::new(),
            category: Category::EXPENSE[0],
            date: today,
        }
    }

    /// Switch between income and expense. The category resets to the first
    /// one offered for the new kind.
    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
        self.category = Category::for_kind(self.kind)[0];
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let options = Category::for_kind(self.kind);
        let index = options.iter().position(|c| *c == self.category).unwrap_or(0);
        let next = if forward {
            (index + 1) % options.len()
        } else {
            (index + options.len() - 1) % options.len()
        };
        self.category = options[next];
    }

    pub fn validate(&self) -> Result<NewTransaction, FinanceError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FinanceError::MissingDescription);
        }
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| FinanceError::InvalidAmount)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FinanceError::InvalidAmount);
        }
        if !self.category.is_valid_for(self.kind) {
            return Err(FinanceError::InvalidCategory {
                category: self.category,
                kind: self.kind.label(),
            });
        }
        let date = self.date.trim();
        parse_date(date).map_err(|_| FinanceError::InvalidDate(date.to_string()))?;
        Ok(NewTransaction {
            kind: self.kind,
            category: self.category,
            amount,
            date: date.to_string(),
            description: description.to_string(),
        })
    }
}

/// Turn a scanned receipt into an expense, or reject it when the scan failed
/// or carries no usable amount.
pub fn transaction_from_receipt(scan: &ReceiptScan, today: &str) -> Result<NewTransaction, FinanceError> {
    if scan.is_failure() {
        return Err(FinanceError::UnreadableReceipt);
    }
    let amount = match scan.amount {
        Some(amount) if amount.is_finite() && amount != 0.0 => amount.abs(),
        _ => return Err(FinanceError::UnreadableReceipt),
    };
    let date = scan
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(today);
    let description = scan
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(RECEIPT_FALLBACK_DESCRIPTION);
    Ok(NewTransaction {
        kind: TransactionKind::Expense,
        category: Category::Receipt,
        amount,
        date: date.to_string(),
        description: description.to_string(),
    })
}
