pub mod math;
pub mod orbit;
pub mod scale;
pub mod spin;
pub mod resolver;
pub mod system;
pub mod time;
