//! Task scheduling for tile-parallel rendering.
//!
//! A [`ThreadPool`] owns a fixed set of workers that pull boxed tasks from a
//! FIFO queue guarded by a [`SpinLock`]. There is no global pool; callers
//! create one and pass it by reference.

mod spin_lock;
mod thread_pool;

pub use spin_lock::{SpinLock, SpinLockGuard};
pub use thread_pool::{Task, ThreadPool};
