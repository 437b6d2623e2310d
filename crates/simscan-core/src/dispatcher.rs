use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::classifier::{self, EntryKind};
use crate::error::Error;
use crate::fingerprint::{Fingerprint, Fingerprinter};
use crate::progress::ProgressReporter;
use crate::walker::{self, WalkOptions};

pub struct DispatchOptions<'a> {
    pub fingerprinter: &'a dyn Fingerprinter,
    pub parallel: usize,
    pub smallfile_threshold: u64,
    pub max_depth: usize,
    pub fingerprint_top_level: bool,
}

/// Fingerprint every entry of the root archive on a fixed worker pool.
///
/// A single producer feeds all top-level entry indices through a bounded
/// queue of the same capacity as the pool, then closes it to signal the
/// drain. Each worker owns a private accumulator and walks nested containers
/// in-line, so no locking is needed until the accumulators are concatenated
/// (in worker order) after the join.
///
/// Failure to open the root archive is fatal; everything per-entry is a
/// logged warning and a skip.
pub fn fingerprint_archive(
    root_bytes: &[u8],
    opts: &DispatchOptions<'_>,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<Fingerprint>, Error> {
    // Parse the central directory once up front so a corrupt root archive
    // fails the run before any workers start.
    let entry_count = ZipArchive::new(Cursor::new(root_bytes))?.len();
    info!("Open root archive success: {} top-level entries", entry_count);

    let workers = opts.parallel.max(1);
    let (tx, rx) = bounded::<usize>(workers);
    let processed = AtomicUsize::new(0);
    let processed = &processed;

    let accumulators = thread::scope(|scope| -> Result<Vec<Vec<Fingerprint>>, Error> {
        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let rx = rx.clone();
            handles.push(scope.spawn(move || {
                worker_loop(
                    worker_id,
                    root_bytes,
                    rx,
                    opts,
                    reporter,
                    processed,
                    entry_count,
                )
            }));
        }
        drop(rx);

        for index in 0..entry_count {
            if tx.send(index).is_err() {
                // Every worker is gone; nothing left to feed.
                break;
            }
        }
        drop(tx);

        let mut accumulators = Vec::with_capacity(workers);
        for handle in handles {
            let local = handle
                .join()
                .map_err(|_| Error::Other("fingerprint worker panicked".to_string()))?;
            accumulators.push(local);
        }
        Ok(accumulators)
    })?;

    Ok(accumulators.into_iter().flatten().collect())
}

fn worker_loop(
    worker_id: usize,
    root_bytes: &[u8],
    rx: Receiver<usize>,
    opts: &DispatchOptions<'_>,
    reporter: &dyn ProgressReporter,
    processed: &AtomicUsize,
    entry_count: usize,
) -> Vec<Fingerprint> {
    let mut local: Vec<Fingerprint> = Vec::new();

    // Entry handles borrow the archive, so they cannot cross the channel;
    // each worker re-opens the (in-memory) archive and receives indices.
    let mut archive = match ZipArchive::new(Cursor::new(root_bytes)) {
        Ok(archive) => archive,
        Err(err) => {
            warn!("Worker {} could not open root archive: {}", worker_id, err);
            return local;
        }
    };

    for index in rx.iter() {
        let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.on_extract_progress(done, entry_count);

        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error opening entry #{}: {}", index, err);
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        debug!("{}", name);

        let mut buf = Vec::with_capacity(entry.size() as usize);
        if let Err(err) = entry.read_to_end(&mut buf) {
            warn!("Error reading entry {}: {}", name, err);
            continue;
        }

        match classifier::classify(&buf) {
            EntryKind::Container => {
                debug!("Recursing into {}", name);
                let walk_opts = WalkOptions {
                    fingerprinter: opts.fingerprinter,
                    smallfile_threshold: opts.smallfile_threshold,
                    max_depth: opts.max_depth,
                };
                local.extend(walker::walk_container(
                    buf,
                    format!("{}:", name),
                    &walk_opts,
                ));
            }
            EntryKind::Unsupported(kind) => {
                warn!("Entry {} is a {} archive, skipping", name, kind);
            }
            EntryKind::Leaf => {
                // Top-level leaves were never hashed by the original
                // behavior; only entries reached through container recursion
                // were. `fingerprint_top_level` opts into hashing them.
                if !opts.fingerprint_top_level {
                    debug!("Top-level entry {} is not a container, skipping", name);
                    continue;
                }
                if (buf.len() as u64) < opts.smallfile_threshold {
                    debug!("Skipping small entry {} ({} bytes)", name, buf.len());
                    continue;
                }
                match opts.fingerprinter.fingerprint(&buf) {
                    Ok(digest) => local.push(Fingerprint { path: name, digest }),
                    Err(err) => warn!("Error fingerprinting {}: {}", name, err),
                }
            }
        }
    }

    local
}
