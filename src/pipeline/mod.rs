pub mod accumulate;
pub mod normalize;
pub mod sentence;

pub use accumulate::{accumulate, SeriesMode};
pub use normalize::{normalize, DecodePolicy};
