//! Share allocation: how one expense is divided among its participants.

pub mod allocation;
pub mod share;

#[cfg(test)]
mod props;

pub use allocation::{Share, ShareAllocator};
pub use share::compute_share;
