pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod warp;
pub mod scenario;
