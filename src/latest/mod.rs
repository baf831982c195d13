//! Latest-set maintenance: identity resolution, selection, eviction.

pub mod evict;
pub mod identity;
pub mod select;

pub use evict::{STALENESS_WINDOW, evict_stale};
pub use select::{copy_latest, select_latest};
