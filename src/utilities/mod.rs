pub mod collections;
pub use self::collections::*;

pub mod memory;

mod thread_dispatcher;
pub use self::thread_dispatcher::*;
