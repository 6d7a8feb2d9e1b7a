pub mod path_subscriber;
pub mod pathfinder_service;

pub use path_subscriber::*;
pub use pathfinder_service::*;
