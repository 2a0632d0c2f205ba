//! Pure business rules with no database or HTTP dependencies.
//!
//! The services own transaction choreography; the arithmetic and guards they
//! apply live here so they can be tested without a database.

pub mod documents;
pub mod stock;
pub mod totals;
