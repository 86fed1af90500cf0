//! Domain types shared by the repository, service and HTTP layers.

pub mod filter;
pub mod reading;
pub mod station;

pub use filter::*;
pub use reading::*;
pub use station::*;
