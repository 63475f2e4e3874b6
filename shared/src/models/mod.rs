//! Wire models for the external inventory API

mod catalog;
mod dashboard;
mod document;
mod ledger;
mod party;
mod stock;

pub use catalog::*;
pub use dashboard::*;
pub use document::*;
pub use ledger::*;
pub use party::*;
pub use stock::*;
