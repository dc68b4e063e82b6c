//! Application-wide constants

pub const DEFAULT_PAGE_INDEX: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Upper bound on the number of keys accepted by a batch delete request.
pub const MAX_BATCH_DELETE: usize = 10;
