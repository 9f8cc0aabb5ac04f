pub mod schedule;

#[cfg(feature = "arm")]
pub mod arm;

#[cfg(feature = "graduated")]
pub mod graduated;
