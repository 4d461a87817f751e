pub mod comments;
pub mod reactions;
pub mod status;
pub mod units;
