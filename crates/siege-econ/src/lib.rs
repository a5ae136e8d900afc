#![deny(warnings)]

//! Stateless economic services for Holdfast: worker allocation across job
//! sites and standing-trade resolution at the trading post. Both operate
//! on state passed by reference and own no persistent data.

pub mod allocator;
pub mod trading;

pub use allocator::{
    allocate, remove_workers_proportionally, set_assignment, AllocationError,
};
pub use trading::resolve_trades;
