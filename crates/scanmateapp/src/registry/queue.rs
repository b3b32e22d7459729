//! Single-writer access to the registry.
//!
//! [`RegistryHandle::spawn`] moves a [`PdfRegistry`] onto a dedicated writer
//! thread. Every read and mutation is sent as a command over one channel and
//! answered on a per-command reply channel, so concurrent callers (a delete
//! from the list view racing a compression that is still downloading) are
//! applied strictly in arrival order instead of "last save wins".
//!
//! Handles are cheap to clone. The writer thread exits once every handle has
//! been dropped; calls made after that fail with a store error.

use super::{ClearReport, PdfRegistry, RecordSink, Removal};
use crate::error::{Result, ScanmateError};
use crate::model::PdfRecord;
use crate::store::backend::StorageBackend;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::debug;

const WRITER_THREAD_NAME: &str = "registry-writer";

type Reply<T> = Sender<T>;

enum Command {
    Records(Reply<Vec<PdfRecord>>),
    Get(String, Reply<Option<PdfRecord>>),
    Register(PdfRecord, Reply<Result<Vec<PdfRecord>>>),
    Rename(String, String, Reply<Result<Vec<PdfRecord>>>),
    Remove(String, Reply<Result<Removal>>),
    Reconcile(Reply<Vec<PdfRecord>>),
    ClearAll(Reply<Result<ClearReport>>),
    MissingFiles(Reply<Vec<PdfRecord>>),
}

#[derive(Clone)]
pub struct RegistryHandle {
    commands: Sender<Command>,
}

impl RegistryHandle {
    /// Starts the writer thread that owns `registry`.
    pub fn spawn<B>(registry: PdfRegistry<B>) -> Result<Self>
    where
        B: StorageBackend + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || run_writer(registry, rx))
            .map_err(ScanmateError::Io)?;
        Ok(Self { commands: tx })
    }

    pub fn records(&self) -> Result<Vec<PdfRecord>> {
        self.request(Command::Records)
    }

    pub fn get(&self, id: &str) -> Result<Option<PdfRecord>> {
        let id = id.to_string();
        self.request(|reply| Command::Get(id, reply))
    }

    pub fn register(&self, record: PdfRecord) -> Result<Vec<PdfRecord>> {
        self.request(|reply| Command::Register(record, reply))?
    }

    pub fn rename(&self, id: &str, new_name: &str) -> Result<Vec<PdfRecord>> {
        let (id, new_name) = (id.to_string(), new_name.to_string());
        self.request(|reply| Command::Rename(id, new_name, reply))?
    }

    pub fn remove(&self, id: &str) -> Result<Removal> {
        let id = id.to_string();
        self.request(|reply| Command::Remove(id, reply))?
    }

    pub fn reconcile(&self) -> Result<Vec<PdfRecord>> {
        self.request(Command::Reconcile)
    }

    pub fn clear_all(&self) -> Result<ClearReport> {
        self.request(Command::ClearAll)?
    }

    pub fn missing_files(&self) -> Result<Vec<PdfRecord>> {
        self.request(Command::MissingFiles)
    }

    fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.commands
            .send(build(reply_tx))
            .map_err(|_| writer_stopped())?;
        reply_rx.recv().map_err(|_| writer_stopped())
    }
}

impl RecordSink for RegistryHandle {
    fn register(&mut self, record: PdfRecord) -> Result<Vec<PdfRecord>> {
        RegistryHandle::register(self, record)
    }
}

fn writer_stopped() -> ScanmateError {
    ScanmateError::Store("registry writer has stopped".to_string())
}

fn run_writer<B: StorageBackend>(mut registry: PdfRegistry<B>, commands: Receiver<Command>) {
    debug!("registry writer started");
    // A dropped reply receiver only means the caller stopped waiting.
    for command in commands {
        match command {
            Command::Records(reply) => {
                let _ = reply.send(registry.records().to_vec());
            }
            Command::Get(id, reply) => {
                let _ = reply.send(registry.get(&id).cloned());
            }
            Command::Register(record, reply) => {
                let _ = reply.send(registry.register(record));
            }
            Command::Rename(id, name, reply) => {
                let _ = reply.send(registry.rename(&id, &name));
            }
            Command::Remove(id, reply) => {
                let _ = reply.send(registry.remove_with_report(&id));
            }
            Command::Reconcile(reply) => {
                let _ = reply.send(registry.reconcile().to_vec());
            }
            Command::ClearAll(reply) => {
                let _ = reply.send(registry.clear_all());
            }
            Command::MissingFiles(reply) => {
                let _ = reply.send(registry.missing_files());
            }
        }
    }
    debug!("registry writer stopped");
}
