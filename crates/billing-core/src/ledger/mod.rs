//! Income/expense ledger.

mod accounts;
mod normalize;
mod summary;
mod types;

pub use accounts::{
    accounts, add_expense, add_income_from_bill, add_manual_entry, load_entries, Accounts,
    ACCOUNTS_KEY,
};
pub use normalize::normalize;
pub use summary::{filter_entries, summarize, BILLS_KEY};
pub use types::{EntryKind, EntrySource, LedgerEntry, LedgerFilter, Period, Summary};
