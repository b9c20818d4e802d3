//! Bounded-queue worker pool draining one gate application.

use crossbeam_channel::bounded;
use crossbeam_utils::thread;
use log::trace;

use crate::error::{Error, Result};
use crate::task::Kernel;

/// Runs every task to completion on `thread_count` worker threads.
///
/// The queue holds at most `thread_count` tasks, so the producing side
/// backpressures instead of materializing the whole partition. Dropping the
/// sender is the sole termination signal: a worker exits once the queue is
/// closed and empty. The scope joins every worker before this function
/// returns, so no task outlives the buffer it references, and the caller sees
/// a fully updated buffer on `Ok`.
///
/// A panicking worker is fatal for the whole call: the remaining workers
/// still drain their tasks, but the buffer is only piecewise consistent and
/// the error tells the caller to discard the state.
pub(crate) fn run_tasks<K, I>(tasks: I, thread_count: usize) -> Result<()>
where
    K: Kernel,
    I: Iterator<Item = K>,
{
    let outcome = thread::scope(|scope| {
        let (tx, rx) = bounded::<K>(thread_count);
        for worker in 0..thread_count {
            let rx = rx.clone();
            scope.spawn(move |_| {
                let mut executed = 0usize;
                while let Ok(task) = rx.recv() {
                    task.run();
                    executed += 1;
                }
                trace!("worker {} exiting after {} tasks", worker, executed);
            });
        }
        drop(rx);
        for task in tasks {
            // send only fails when every worker is gone; the scope reports
            // the panic that killed them
            if tx.send(task).is_err() {
                break;
            }
        }
    });
    outcome.map_err(|_| Error::WorkerPanic)
}
