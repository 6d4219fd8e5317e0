pub mod arena;
pub mod random;
pub mod sync;

pub use arena::{Arena, SequenceId};
pub use random::Random;
pub use sync::{drain_one, join_all, try_recv_timeout, BoundedChannel, Shutdown};
