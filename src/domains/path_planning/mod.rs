pub mod agent_state;
pub mod geometry;
pub mod map;
pub mod messages;
pub mod planner;
pub mod ports;
pub mod registry;
pub mod roadmap;
pub mod scheduler;

pub use agent_state::*;
pub use geometry::*;
pub use map::*;
pub use messages::*;
pub use planner::*;
pub use ports::*;
pub use registry::*;
pub use roadmap::*;
pub use scheduler::*;
