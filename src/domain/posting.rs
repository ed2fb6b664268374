//! Double-entry posting lines and the ledger that carries them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    currency::{checked_sum, Cents},
    errors::PostingError,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Side::Debit => "debit",
            Side::Credit => "credit",
        };
        f.write_str(label)
    }
}

/// One ledger row. A line carries its amount on exactly one side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostingLine {
    pub date: NaiveDate,
    pub journal: String,
    pub account: String,
    pub label: String,
    /// Item identifier; `None` on global lines.
    pub item_ref: Option<String>,
    pub debit: Cents,
    pub credit: Cents,
}

impl PostingLine {
    pub fn new(
        side: Side,
        date: NaiveDate,
        journal: &str,
        account: &str,
        label: String,
        item_ref: Option<String>,
        amount: Cents,
    ) -> Self {
        let (debit, credit) = match side {
            Side::Debit => (amount, Cents::ZERO),
            Side::Credit => (Cents::ZERO, amount),
        };
        Self {
            date,
            journal: journal.to_string(),
            account: account.to_string(),
            label,
            item_ref,
            debit,
            credit,
        }
    }

    pub fn side(&self) -> Side {
        if self.credit.is_zero() {
            Side::Debit
        } else {
            Side::Credit
        }
    }

    pub fn amount(&self) -> Cents {
        self.debit + self.credit
    }

    pub fn is_global(&self) -> bool {
        self.item_ref.is_none()
    }
}

/// Debit and credit sums of a ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerTotals {
    pub debit: Cents,
    pub credit: Cents,
}

impl LedgerTotals {
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Ordered posting lines produced by one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    lines: Vec<PostingLine>,
}

impl Ledger {
    pub fn new(lines: Vec<PostingLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[PostingLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Debit and credit sums, or [`PostingError::TotalOverflow`] when a side
    /// leaves the cent range.
    pub fn totals(&self) -> Result<LedgerTotals, PostingError> {
        let side_total = |side: Side| {
            let amounts = self.lines.iter().map(|line| match side {
                Side::Debit => line.debit,
                Side::Credit => line.credit,
            });
            checked_sum(amounts).ok_or(PostingError::TotalOverflow { side })
        };
        Ok(LedgerTotals {
            debit: side_total(Side::Debit)?,
            credit: side_total(Side::Credit)?,
        })
    }

    /// Fails with [`PostingError::LedgerImbalance`] unless debits equal credits.
    pub fn verify_balance(&self) -> Result<LedgerTotals, PostingError> {
        let totals = self.totals()?;
        if totals.is_balanced() {
            Ok(totals)
        } else {
            Err(PostingError::LedgerImbalance {
                debit: totals.debit,
                credit: totals.credit,
            })
        }
    }

    /// Lines booked on `account`, in ledger order.
    pub fn lines_for_account<'a>(
        &'a self,
        account: &'a str,
    ) -> impl Iterator<Item = &'a PostingLine> + 'a {
        self.lines.iter().filter(move |line| line.account == account)
    }
}
