use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::SpinLock;

/// A unit of work, executed exactly once by some worker.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// How long an idle worker sleeps before polling the queue again.
const IDLE_SLEEP: Duration = Duration::from_millis(2);

/// Extra subdivision applied to each chunk edge for tasks with uneven cost.
const COMPLEX_SUBDIVISION: f32 = 4.0;

struct Shared {
    tasks: SpinLock<VecDeque<Task>>,
    pending: AtomicUsize,
    alive: AtomicBool,
}

/// Fixed-size pool of worker threads draining a FIFO task queue.
///
/// Dropping the pool waits for all outstanding tasks, then joins the workers.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `thread_count` workers, or one per logical CPU when zero.
    pub fn new(thread_count: usize) -> Self {
        let thread_count = if thread_count == 0 {
            num_cpus::get()
        } else {
            thread_count
        };

        let shared = Arc::new(Shared {
            tasks: SpinLock::new(VecDeque::new()),
            pending: AtomicUsize::new(0),
            alive: AtomicBool::new(true),
        });

        let workers = (0..thread_count)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || worker_loop(&shared))
            })
            .collect();

        log::debug!("Thread pool started with {} workers", thread_count);

        Self { shared, workers }
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of submitted tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    pub fn add_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut tasks = self.shared.tasks.lock();
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        tasks.push_back(Box::new(task));
    }

    /// Invoke `body(x, y)` exactly once for every cell of a `width` x `height`
    /// grid, batched into rectangular chunks.
    ///
    /// `complex` splits the grid into roughly 16 times as many chunks, which
    /// balances work whose per-cell cost varies a lot. Returns immediately;
    /// call [`ThreadPool::wait`] to block until the grid is done.
    pub fn parallel_for<F>(&self, width: usize, height: usize, body: F, complex: bool)
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        let body = Arc::new(body);
        let (chunk_width, chunk_height) = self.chunk_size(width, height, complex);

        let mut tasks = self.shared.tasks.lock();
        for x in (0..width).step_by(chunk_width) {
            for y in (0..height).step_by(chunk_height) {
                // Edge chunks are clipped to the grid
                let x_end = (x + chunk_width).min(width);
                let y_end = (y + chunk_height).min(height);
                let body = Arc::clone(&body);

                self.shared.pending.fetch_add(1, Ordering::AcqRel);
                tasks.push_back(Box::new(move || {
                    for cx in x..x_end {
                        for cy in y..y_end {
                            body(cx, cy);
                        }
                    }
                }));
            }
        }
    }

    fn chunk_size(&self, width: usize, height: usize, complex: bool) -> (usize, usize) {
        let mut divisor = (self.workers.len().max(1) as f32).sqrt();
        if complex {
            divisor *= COMPLEX_SUBDIVISION;
        }
        let edge = |dim: usize| ((dim as f32 / divisor).ceil() as usize).max(1);
        (edge(width), edge(height))
    }

    /// Block until every task submitted so far has finished.
    pub fn wait(&self) {
        while self.shared.pending.load(Ordering::Acquire) > 0 {
            std::thread::yield_now();
        }
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.wait();
        self.shared.alive.store(false, Ordering::Release);
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Worker thread exited with a panic");
            }
        }
    }
}

fn worker_loop(shared: &Shared) {
    while shared.alive.load(Ordering::Acquire) {
        let task = shared.tasks.lock().pop_front();
        match task {
            Some(task) => {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                    log::error!("Task panicked: {}", panic_message(&*payload));
                }
                shared.pending.fetch_sub(1, Ordering::AcqRel);
            }
            None => std::thread::sleep(IDLE_SLEEP),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
