#![allow(non_snake_case)]

pub mod ledger;
pub mod revenue;
pub mod sample;

pub use ledger::{Ledger, LedgerData, LedgerError};
