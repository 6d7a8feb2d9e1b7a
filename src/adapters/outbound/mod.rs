pub mod console_logger;
pub mod datagram_sink;
pub mod file_logger;
pub mod map_data;
pub mod multi_logger;
pub mod noop_logger;

pub use console_logger::*;
pub use datagram_sink::*;
pub use file_logger::*;
pub use map_data::*;
pub use multi_logger::*;
pub use noop_logger::*;
