//! Export orchestration
//!
//! The pipeline is strictly sequential for a given export: capture, then
//! layout, then writing. Any stage error aborts the whole export and no
//! partial output ever reaches the caller. The async [`Exporter`] handle is
//! backed by a dedicated worker thread that owns the snapshot provider, so
//! callers get an async interface without requiring the provider to be
//! shared across threads.

use crate::capture::SnapshotProvider;
use crate::error::{Error, Result};
use crate::layout::{self, plan_placements, PlacementInstruction};
use crate::writer::{DocumentWriter, PdfWriter};
use crate::ExportConfig;
use log::{debug, error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

const DOC_TITLE: &str = "Panel Export";

/// Terminal success value of an export: the document bytes plus the
/// placement plan that produced them. The plan is exposed for diagnostics
/// and for idempotence checks; the bytes are the downloadable file.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub placements: Vec<PlacementInstruction>,
}

impl ExportedDocument {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }
}

/// Pipeline stage, observable through [`Exporter::phase`] so a UI can
/// disable its export affordance while an export is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Capturing,
    LayingOut,
    Writing,
}

/// The sequential export pipeline. Geometry is checked before the capture
/// stage runs, so a collapsing margin configuration never touches the
/// provider.
fn pipeline<W: DocumentWriter>(
    provider: &mut dyn SnapshotProvider,
    mut writer: W,
    config: &ExportConfig,
    observe: &mut dyn FnMut(ExportPhase),
) -> Result<ExportedDocument> {
    config.validate()?;
    layout::printable_area(&config.page_size, &config.margins)?;

    observe(ExportPhase::Capturing);
    debug!("export: capturing region {:?}", config.region);
    let bitmap = provider.capture(&config.region, &config.capture_options())?;

    observe(ExportPhase::LayingOut);
    debug!(
        "export: planning layout for {}x{} bitmap",
        bitmap.width(),
        bitmap.height()
    );
    let placements = plan_placements(bitmap.width(), bitmap.height(), config)?;

    observe(ExportPhase::Writing);
    debug!("export: writing {} page(s)", placements.len());
    for p in &placements {
        let slice = bitmap.crop(&p.region)?;
        writer.add_image_page(
            &slice,
            p.dest_x,
            p.dest_y,
            p.dest_width,
            p.dest_height,
            p.page_break,
        )?;
    }
    let bytes = writer.finalize()?;

    Ok(ExportedDocument { bytes, placements })
}

/// Run one export synchronously with a caller-supplied document writer.
pub fn run_export<W: DocumentWriter>(
    provider: &mut dyn SnapshotProvider,
    writer: W,
    config: &ExportConfig,
) -> Result<ExportedDocument> {
    pipeline(provider, writer, config, &mut |_| {})
}

/// Run one export synchronously, producing a PDF.
pub fn export_panel(
    provider: &mut dyn SnapshotProvider,
    config: &ExportConfig,
) -> Result<ExportedDocument> {
    run_export(provider, PdfWriter::new(config.page_size, DOC_TITLE), config)
}

enum Command {
    Export(ExportConfig, oneshot::Sender<Result<ExportedDocument>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly export handle backed by a dedicated worker thread.
///
/// The worker thread owns the snapshot provider and runs exports
/// sequentially. A second `export` while one is in flight fails fast with
/// [`Error::ExportInProgress`] rather than relying on the provider to
/// serialize overlapping captures internally.
#[derive(Clone)]
pub struct Exporter {
    cmd_tx: Sender<Command>,
    in_flight: Arc<AtomicBool>,
    phase: Arc<Mutex<ExportPhase>>,
}

impl Exporter {
    /// Spawn a worker thread that owns `provider`.
    pub fn new<P: SnapshotProvider + 'static>(provider: P) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let phase = Arc::new(Mutex::new(ExportPhase::Idle));
        let worker_phase = Arc::clone(&phase);

        thread::spawn(move || {
            let mut provider = provider;
            let set_phase = |p: ExportPhase| {
                if let Ok(mut guard) = worker_phase.lock() {
                    *guard = p;
                }
            };

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Export(config, resp) => {
                        let result = pipeline(
                            &mut provider,
                            PdfWriter::new(config.page_size, DOC_TITLE),
                            &config,
                            &mut |p| set_phase(p),
                        );
                        set_phase(ExportPhase::Idle);
                        // Errors are logged once here, at the orchestrator
                        // boundary; stage-specific detail stays in the log
                        // and the caller decides what the user sees.
                        if let Err(e) = &result {
                            error!("Export failed: {}", e);
                        }
                        let _ = resp.send(result);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        Self {
            cmd_tx,
            in_flight: Arc::new(AtomicBool::new(false)),
            phase,
        }
    }

    /// Current pipeline stage.
    pub fn phase(&self) -> ExportPhase {
        self.phase
            .lock()
            .map(|g| *g)
            .unwrap_or(ExportPhase::Idle)
    }

    /// Whether an export is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one export. Fails immediately with `ExportInProgress` when
    /// another export is still in flight, and with `Timeout` when the
    /// configured `timeout_ms` elapses before the pipeline finishes.
    pub async fn export(&self, config: ExportConfig) -> Result<ExportedDocument> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::ExportInProgress);
        }

        let result = self.export_inner(config).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn export_inner(&self, config: ExportConfig) -> Result<ExportedDocument> {
        let timeout_ms = config.timeout_ms;
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Export(config, tx))
            .map_err(|e| Error::Other(format!("Export worker unavailable: {}", e)))?;

        let wait = async {
            rx.await
                .map_err(|e| Error::Other(format!("Export canceled: {}", e)))?
        };

        match timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), wait)
                .await
                .map_err(|_| Error::Timeout(ms))?,
            None => wait.await,
        }
    }

    /// Shut down the worker thread.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}
