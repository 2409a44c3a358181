use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, instrument, warn};

use crate::engine::llm_client::CompletionBackend;
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{AdviceCallback, AdviceCommand};
use crate::engine::snapshot_builder;
use crate::error::CoordinatorError;
use crate::model::advice::{Advice, AdviceResponse, CompletionResult};
use crate::model::host_state::HostGame;

pub const CANCELLED_MESSAGE: &str = "Advice request cancelled: coordinator is shutting down";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Answer everything already queued, then stop.
    Drain,
    /// Finish the request in flight; queued ones get a cancellation error.
    Discard,
}

/// One full pass: snapshot, prompt, completion. A snapshot taken with no run
/// active is answered with its error text as advisory advice.
pub fn advise_once<H, B>(host: &H, backend: &B) -> CompletionResult
where
    H: HostGame + ?Sized,
    B: CompletionBackend + ?Sized,
{
    let snapshot = snapshot_builder::extract(host);
    if let Some(message) = &snapshot.error {
        return Ok(Advice::Advisory(message.clone()));
    }

    let prompt = PromptBuilder::build(&snapshot);
    debug!(prompt_len = prompt.len(), "Prompt created");

    backend.get_advice(&prompt)
}

/// Accepts advice requests from the game loop and answers them, in order,
/// on a single background thread.
pub struct AdviceCoordinator {
    tx: Option<Sender<AdviceCommand>>,
    worker: Option<JoinHandle<()>>,
    discard: Arc<AtomicBool>,
    next_id: AtomicU64,
}

impl AdviceCoordinator {
    pub fn new<H, B>(host: Arc<H>, backend: B) -> Result<Self, CoordinatorError>
    where
        H: HostGame + Send + Sync + ?Sized + 'static,
        B: CompletionBackend,
    {
        let (tx, rx) = mpsc::channel();
        let discard = Arc::new(AtomicBool::new(false));

        let mut worker = AdviceWorker {
            rx,
            host,
            backend,
            discard: Arc::clone(&discard),
        };

        let handle = thread::Builder::new()
            .name("advice-worker".into())
            .spawn(move || worker.run())?;

        info!("Advice coordinator started");

        Ok(Self {
            tx: Some(tx),
            worker: Some(handle),
            discard,
            next_id: AtomicU64::new(1),
        })
    }

    /// Queues a request and returns straight away with its id. The callback
    /// fires later on the worker thread. After shutdown the request is
    /// refused and the callback dropped without firing.
    pub fn request_advice<C: AdviceCallback>(&self, callback: C) -> Result<u64, CoordinatorError> {
        let tx = self.tx.as_ref().ok_or(CoordinatorError::ShutDown)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        tx.send(AdviceCommand::Request {
            id,
            callback: Box::new(callback),
        })
        .map_err(|_| {
            error!(id, "Advice worker is gone, request dropped");
            CoordinatorError::ShutDown
        })?;

        info!(id, "Requesting AI advice");
        Ok(id)
    }

    /// Convenience for polling callers: the answer arrives on the returned
    /// receiver.
    pub fn request_advice_channel(&self) -> Result<Receiver<AdviceResponse>, CoordinatorError> {
        let (tx, rx) = mpsc::channel();
        self.request_advice(tx)?;
        Ok(rx)
    }

    pub fn is_running(&self) -> bool {
        self.tx.is_some()
    }

    /// Stops accepting requests and waits for the worker to exit. The
    /// request in flight, if any, always runs to completion. Calling it
    /// again is a no-op.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self, mode: ShutdownMode) {
        if mode == ShutdownMode::Discard {
            self.discard.store(true, Ordering::SeqCst);
        }

        // closing the queue ends the worker loop once it is empty
        self.tx.take();

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("Advice worker panicked during shutdown");
            }
            info!("Advice coordinator stopped");
        }
    }
}

impl Drop for AdviceCoordinator {
    fn drop(&mut self) {
        // don't block the game on drop; the worker drains on its own
        self.tx.take();
    }
}

struct AdviceWorker<H: ?Sized, B> {
    rx: Receiver<AdviceCommand>,
    host: Arc<H>,
    backend: B,
    discard: Arc<AtomicBool>,
}

impl<H, B> AdviceWorker<H, B>
where
    H: HostGame + ?Sized,
    B: CompletionBackend,
{
    fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                AdviceCommand::Request { id, callback } => {
                    let response = if self.discard.load(Ordering::SeqCst) {
                        debug!(id, "Discarding queued advice request");
                        AdviceResponse::Error(CANCELLED_MESSAGE.to_string())
                    } else {
                        self.handle(id)
                    };

                    let delivered =
                        panic::catch_unwind(AssertUnwindSafe(|| callback.deliver(response)));
                    if let Err(payload) = delivered {
                        error!(id, panic = %panic_message(&*payload), "Advice callback panicked");
                    }
                }
            }
        }

        debug!("Advice queue closed, worker exiting");
    }

    fn handle(&self, id: u64) -> AdviceResponse {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            advise_once(&*self.host, &self.backend)
        }));

        match outcome {
            Ok(Ok(advice)) => {
                if advice.is_advisory() {
                    warn!(id, advice = advice.text(), "Returning advisory instead of advice");
                } else {
                    info!(id, "Advice received");
                }
                AdviceResponse::Advice(advice.into_text())
            }
            Ok(Err(err)) => {
                error!(id, kind = ?err.kind(), error = %err, "Error getting advice");
                AdviceResponse::Error(err.to_string())
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                error!(id, panic = %message, "Advice pipeline panicked");
                AdviceResponse::Error(format!("Failed to prepare advice: {}", message))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
