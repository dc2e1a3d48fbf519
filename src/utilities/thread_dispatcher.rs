use crossbeam_utils::thread;
use log::trace;

/// Provides multithreading dispatch primitives and a thread count for the simulation to use.
///
/// Note that the simulation does not require a true load balancing for loop implementation. All that's needed is a way to jumpstart some threads.
/// All systems which use multithreading tend to have some form of domain specific load balancing that a general purpose thread pool
/// couldn't match, so a dispatcher only has to run one closure per worker.
pub trait ThreadDispatcher: Send + Sync {
    /// Gets the number of workers available in the thread dispatcher.
    fn thread_count(&self) -> usize;

    /// Dispatches the available workers, up to `maximum_worker_count`, and blocks until every one has returned.
    ///
    /// Each invocation of `worker_body` receives a distinct worker index in `0..worker_count`.
    fn dispatch_workers(&self, worker_body: &(dyn Fn(usize) + Sync), maximum_worker_count: usize);
}

/// Dispatcher that spawns scoped threads for every dispatch.
///
/// Worker 0 runs on the calling thread.
#[derive(Debug, Clone, Copy)]
pub struct ScopedThreadDispatcher {
    thread_count: usize,
}

impl ScopedThreadDispatcher {
    pub fn new(thread_count: usize) -> Self {
        debug_assert!(thread_count > 0, "A dispatcher needs at least one worker.");
        Self {
            thread_count: thread_count.max(1),
        }
    }
}

impl ThreadDispatcher for ScopedThreadDispatcher {
    fn thread_count(&self) -> usize {
        self.thread_count
    }

    fn dispatch_workers(&self, worker_body: &(dyn Fn(usize) + Sync), maximum_worker_count: usize) {
        let worker_count = self.thread_count.min(maximum_worker_count.max(1));
        trace!("dispatching {} workers", worker_count);
        if worker_count == 1 {
            worker_body(0);
            return;
        }
        let result = thread::scope(|scope| {
            for worker_index in 1..worker_count {
                scope.spawn(move |_| worker_body(worker_index));
            }
            worker_body(0);
        });
        if let Err(payload) = result {
            std::panic::resume_unwind(payload);
        }
    }
}
