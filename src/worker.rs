//! Single-slot background execution of conversion jobs.
//!
//! A front end hands one job at a time to a [`ConversionWorker`] and keeps
//! its own thread responsive. While a job is in flight further submissions
//! are rejected with [`ConvertError::WorkerBusy`]; the caller typically
//! disables its "convert" control until [`PendingConversion::wait`] resolves.
//!
//! ```rust,no_run
//! use pdfpix::{ConversionConfig, ConversionJob, ConversionWorker, ConverterKind, OutputFormat};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), pdfpix::ConvertError> {
//! let worker = ConversionWorker::new(ConversionConfig::default());
//! let job = ConversionJob::new("photo.jpg", "out", OutputFormat::Pdf);
//! let pending = worker.submit(ConverterKind::ImageToPdf, job)?;
//! let result = pending.wait().await?;
//! println!("success: {}", result.success);
//! # Ok(())
//! # }
//! ```

use crate::config::ConversionConfig;
use crate::convert::convert;
use crate::converter::ConverterKind;
use crate::error::ConvertError;
use crate::job::{ConversionJob, ConversionResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Runs at most one conversion at a time on tokio's blocking pool.
///
/// Cloning yields a handle to the same slot.
#[derive(Debug, Clone)]
pub struct ConversionWorker {
    config: Arc<ConversionConfig>,
    busy: Arc<AtomicBool>,
}

impl ConversionWorker {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config: Arc::new(config),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `true` while a submitted job has not finished.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start `job` in the background.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// [`ConvertError::WorkerBusy`] if a job is already running.
    pub fn submit(
        &self,
        kind: ConverterKind,
        job: ConversionJob,
    ) -> Result<PendingConversion, ConvertError> {
        let slot = SlotGuard::acquire(&self.busy).ok_or(ConvertError::WorkerBusy)?;
        let config = Arc::clone(&self.config);
        debug!(converter = kind.name(), input = %job.input_path.display(), "Job submitted");

        let handle = tokio::task::spawn_blocking(move || {
            let _slot = slot;
            convert(kind, &job, &config)
        });
        Ok(PendingConversion { handle })
    }
}

/// A submitted job; resolves once the conversion ends.
#[derive(Debug)]
pub struct PendingConversion {
    handle: JoinHandle<Result<ConversionResult, ConvertError>>,
}

impl PendingConversion {
    /// `true` once the job has ended (the result is ready for [`Self::wait`]).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the job. Same contract as [`crate::convert`].
    pub async fn wait(self) -> Result<ConversionResult, ConvertError> {
        self.handle
            .await
            .map_err(|e| ConvertError::Internal(format!("Conversion task panicked: {}", e)))?
    }
}

/// Holds the worker's slot; releases it on drop, including when the job
/// panics or the task is dropped unrun.
struct SlotGuard(Arc<AtomicBool>);

impl SlotGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotGuard(Arc::clone(flag)))
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
