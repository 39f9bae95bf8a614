// File: twtw-common/src/traits/mod.rs
pub mod host_traits;

pub use host_traits::Host;
