#![doc(test(attr(deny(warnings))))]

//! Lifeplan turns recurring income and expense templates, recorded transactions and
//! payday settings into occurrences, range totals and pay-period summaries.
//!
//! The evaluation lives in `lifeplan-core`; this crate wires it to configuration,
//! JSON storage and the `lifeplan_cli` front end.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Lifeplan tracing initialized.");
    });
}
