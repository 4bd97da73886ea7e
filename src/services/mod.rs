pub mod biography;
pub mod completion;
pub mod rate_limiter;
