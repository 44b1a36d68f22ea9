//! Background persistence so ledger mutations never wait on disk I/O.

use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use tracing::{debug, error, warn};

use super::{KeyValueStore, Result, BALANCE_KEY, TRANSACTIONS_KEY};

/// Encoded snapshot waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub transactions: String,
    /// Only present when the baseline changed.
    pub baseline: Option<String>,
}

enum WriteCommand {
    Persist(PendingWrite),
    Flush(Sender<()>),
}

/// Single writer thread applying snapshot writes in submission order.
///
/// Failures are logged and dropped; there is no retry and no rollback.
pub struct PersistenceWriter {
    sender: Option<Sender<WriteCommand>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistenceWriter {
    pub fn spawn(backend: Arc<dyn KeyValueStore>) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("spendly-writer".into())
            .spawn(move || run(backend, receiver))?;
        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queues `write` and returns immediately.
    pub fn submit(&self, write: PendingWrite) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        if sender.send(WriteCommand::Persist(write)).is_err() {
            error!("persistence writer has stopped; snapshot not written");
        }
    }

    /// Blocks until every write submitted so far has been attempted.
    pub fn flush(&self) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if sender.send(WriteCommand::Flush(ack_tx)).is_err() {
            warn!("persistence writer has stopped; nothing to flush");
            return;
        }
        let _ = ack_rx.recv();
    }
}

impl Drop for PersistenceWriter {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain the queue and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("persistence writer panicked");
            }
        }
    }
}

fn run(backend: Arc<dyn KeyValueStore>, receiver: Receiver<WriteCommand>) {
    for command in receiver {
        match command {
            WriteCommand::Persist(write) => apply(backend.as_ref(), &write),
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("persistence writer stopped");
}

fn apply(backend: &dyn KeyValueStore, write: &PendingWrite) {
    match backend.set(TRANSACTIONS_KEY, &write.transactions) {
        Ok(()) => debug!(bytes = write.transactions.len(), "transactions persisted"),
        Err(err) => error!(error = %err, "failed to persist transactions"),
    }
    if let Some(baseline) = write.baseline.as_deref() {
        match backend.set(BALANCE_KEY, baseline) {
            Ok(()) => debug!(baseline, "baseline persisted"),
            Err(err) => error!(error = %err, "failed to persist baseline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn flush_waits_for_queued_writes() {
        let backend = Arc::new(MemoryStore::new());
        let writer = PersistenceWriter::spawn(backend.clone()).unwrap();
        writer.submit(PendingWrite {
            transactions: "[]".into(),
            baseline: Some("42".into()),
        });
        writer.flush();
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(backend.get(BALANCE_KEY).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn baseline_is_left_alone_when_unchanged() {
        let backend = Arc::new(MemoryStore::with_entries([(BALANCE_KEY, "7")]));
        let writer = PersistenceWriter::spawn(backend.clone()).unwrap();
        writer.submit(PendingWrite {
            transactions: "[]".into(),
            baseline: None,
        });
        writer.flush();
        assert_eq!(backend.get(BALANCE_KEY).unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn drop_drains_pending_writes() {
        let backend = Arc::new(MemoryStore::new());
        {
            let writer = PersistenceWriter::spawn(backend.clone()).unwrap();
            writer.submit(PendingWrite {
                transactions: "[1]".into(),
                baseline: None,
            });
        }
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn failed_writes_do_not_stop_the_worker() {
        let backend = Arc::new(MemoryStore::new());
        let writer = PersistenceWriter::spawn(backend.clone()).unwrap();
        backend.set_fail_writes(true);
        writer.submit(PendingWrite {
            transactions: "[]".into(),
            baseline: Some("1".into()),
        });
        writer.flush();
        backend.set_fail_writes(false);
        writer.submit(PendingWrite {
            transactions: "[2]".into(),
            baseline: None,
        });
        writer.flush();
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[2]"));
        assert_eq!(backend.get(BALANCE_KEY).unwrap(), None);
    }
}
