//! lifeplan-core
//!
//! Evaluation and request-layer services for Lifeplan finances.
//! Depends on lifeplan-domain. No CLI, no terminal I/O, no direct file access.

pub mod aggregate_service;
pub mod dashboard_service;
pub mod error;
pub mod pay_period_service;
pub mod schedule_service;
pub mod storage;
pub mod template_service;
pub mod time;
pub mod transaction_service;

pub use aggregate_service::*;
pub use dashboard_service::*;
pub use error::CoreError;
pub use pay_period_service::*;
pub use schedule_service::*;
pub use storage::*;
pub use template_service::*;
pub use transaction_service::*;
