//! Pure data types for a ventilation run. No I/O lives here.

pub mod allocation;
pub mod item;
pub mod posting;

pub use allocation::*;
pub use item::*;
pub use posting::*;
