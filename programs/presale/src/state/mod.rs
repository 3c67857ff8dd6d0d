pub mod participant;
pub mod sale;
pub mod vesting_schedule;

pub use participant::*;
pub use sale::*;
pub use vesting_schedule::*;
