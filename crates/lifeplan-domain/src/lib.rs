//! lifeplan-domain
//!
//! Pure finance models (recurring templates, transactions, payday settings, pay periods).
//! No I/O, no CLI, no storage. Only data types, calendar helpers, and core enums.

pub mod common;
pub mod finances;
pub mod payday;
pub mod period;
pub mod template;
pub mod transaction;

pub use common::*;
pub use finances::*;
pub use payday::*;
pub use period::*;
pub use template::*;
pub use transaction::*;
