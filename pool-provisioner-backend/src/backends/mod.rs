//! Backend adapter implementations.

pub(crate) mod common;

#[cfg(feature = "crs")]
mod crs;
#[cfg(feature = "cpa")]
mod cpa;
#[cfg(feature = "s2a")]
mod s2a;
#[cfg(feature = "sub2api")]
mod sub2api;

pub use common::TransportOptions;

#[cfg(feature = "crs")]
pub use crs::{CrsBackend, OwnerImport};
#[cfg(feature = "cpa")]
pub use cpa::CpaBackend;
#[cfg(feature = "s2a")]
pub use s2a::S2aBackend;
#[cfg(feature = "sub2api")]
pub use sub2api::Sub2apiBackend;
