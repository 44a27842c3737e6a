use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info, warn};
use tokio::sync::broadcast;

use crate::broadcast::StageProgressEvent;
use crate::pipeline::{BroadcastProgress, NoopProgress, Pipeline, PipelineError};
use crate::storage::OutputStore;
use crate::worker::job::{Job, JobResult};

/// Fixed set of threads running independent pipeline runs, one file each.
/// Runs share nothing but the pipeline and the output store.
pub struct WorkerPool {
    job_sender: Sender<Job>,
    result_receiver: Receiver<JobResult>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    /// Kept so the channel outlives individual runs; workers hold clones.
    #[allow(dead_code)]
    progress_sender: Option<Arc<broadcast::Sender<StageProgressEvent>>>,
}

impl WorkerPool {
    pub fn new(pipeline: Arc<Pipeline>, store: OutputStore, worker_count: usize) -> Self {
        Self::with_progress_sender(pipeline, store, worker_count, None)
    }

    /// Creates a new worker pool with an optional stage progress broadcaster.
    ///
    /// # Panics
    /// Panics if `worker_count` is 0.
    pub fn with_progress_sender(
        pipeline: Arc<Pipeline>,
        store: OutputStore,
        worker_count: usize,
        progress_sender: Option<Arc<broadcast::Sender<StageProgressEvent>>>,
    ) -> Self {
        assert!(worker_count > 0, "worker_count must be > 0");
        let (job_sender, job_receiver) = bounded::<Job>(worker_count * 2);
        let (result_sender, result_receiver) = bounded::<JobResult>(worker_count * 2);
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let context = WorkerContext {
                worker_id,
                pipeline: Arc::clone(&pipeline),
                store: store.clone(),
                progress_sender: progress_sender.clone(),
            };
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let shutdown_flag = Arc::clone(&shutdown);

            let handle = thread::spawn(move || {
                run_worker(context, job_rx, result_tx, shutdown_flag);
            });

            workers.push(handle);
        }

        info!("Started {} workers", worker_count);

        Self {
            job_sender,
            result_receiver,
            workers,
            shutdown,
            progress_sender,
        }
    }

    pub fn submit(&self, job: Job) -> Result<(), crate::error::WorkerError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(crate::error::WorkerError::ChannelClosed);
        }

        self.job_sender
            .send(job)
            .map_err(|_| crate::error::WorkerError::ChannelClosed)
    }

    pub fn try_recv_result(&self) -> Option<JobResult> {
        self.result_receiver.try_recv().ok()
    }

    pub fn recv_result(&self) -> Option<JobResult> {
        self.result_receiver.recv().ok()
    }

    pub fn shutdown(&self) {
        info!("Shutting down worker pool...");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn wait(self) {
        // Dropping the sender lets idle workers see a disconnected channel
        drop(self.job_sender);

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

struct WorkerContext {
    worker_id: usize,
    pipeline: Arc<Pipeline>,
    store: OutputStore,
    progress_sender: Option<Arc<broadcast::Sender<StageProgressEvent>>>,
}

impl WorkerContext {
    fn process(&self, job: Job) -> JobResult {
        let run_id = job.id.clone();
        let relative_path = job.relative_path.clone();
        let state = job.into_state();

        let (report, _state) = match self.progress_sender {
            Some(ref sender) => {
                let progress = BroadcastProgress::new(&run_id, &relative_path, Arc::clone(sender));
                self.pipeline.run_with_id(run_id, state, &progress)
            }
            None => self.pipeline.run_with_id(run_id, state, &NoopProgress),
        };

        if !report.succeeded() {
            let error = report
                .error_log
                .clone()
                .unwrap_or_else(|| "Run failed without a diagnostic".to_string());
            return JobResult::failure(&report, error);
        }

        let code = report.final_code.as_deref().unwrap_or_default();
        match self.store.store(&relative_path, code) {
            Ok(output_path) => JobResult::success(&report, output_path),
            Err(e) => {
                let e = PipelineError::from(e);
                warn!(
                    "Worker {} could not persist {}: {}",
                    self.worker_id, relative_path, e
                );
                JobResult::failure(&report, e.to_string())
            }
        }
    }
}

fn run_worker(
    context: WorkerContext,
    job_receiver: Receiver<Job>,
    result_sender: Sender<JobResult>,
    shutdown: Arc<AtomicBool>,
) {
    let worker_id = context.worker_id;
    debug!("Worker {} started", worker_id);

    loop {
        if shutdown.load(Ordering::Relaxed) {
            debug!("Worker {} received shutdown signal", worker_id);
            break;
        }

        match job_receiver.recv_timeout(std::time::Duration::from_millis(100)) {
            Ok(job) => {
                debug!("Worker {} processing {}", worker_id, job.relative_path);

                let result = context.process(job);

                if let Err(e) = result_sender.send(result) {
                    error!("Worker {} failed to send result: {}", worker_id, e);
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                continue;
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                debug!("Worker {} job channel disconnected", worker_id);
                break;
            }
        }
    }

    debug!("Worker {} stopped", worker_id);
}
