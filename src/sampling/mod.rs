pub mod surface;
pub mod addressing;
pub mod sampler;
