pub mod agent;
pub mod constants;
pub mod level;
pub mod logging;
pub mod render;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod tile;
pub mod types;
pub mod world;
