//! First listing of a directory: one size task per immediate child.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::error::{DirsizeError, Result};
use crate::fs::{EntryKind, FileSystem};

use super::entry::ScanEntry;
use super::size::{measure, SizeReport};

/// Signal each size task sends exactly once when it is finished.
enum Completion {
    Done,
    Failed(DirsizeError),
}

/// Size every immediate child of `directory` concurrently.
///
/// Each child gets its own task on the global rayon pool, with no cap on the
/// number of tasks. Unreadable parts of a child only shrink that child's
/// size. The first fatal error fails the whole scan, but running tasks are
/// left to finish and their results are dropped.
///
/// The result is sorted by size, largest first; equal sizes keep listing
/// order.
pub fn scan_top_level<F: FileSystem + ?Sized>(fs: &F, directory: &Path) -> Result<Vec<ScanEntry>> {
    let listing = fs
        .read_dir(directory)
        .map_err(|e| DirsizeError::from_io(directory, e))?;

    if listing.is_empty() {
        return Ok(Vec::new());
    }

    tracing::debug!(
        path = %directory.display(),
        tasks = listing.len(),
        "Starting top-level scan"
    );

    let results: Mutex<Vec<(usize, ScanEntry)>> = Mutex::new(Vec::with_capacity(listing.len()));
    let (tx, rx) = crossbeam_channel::unbounded();

    // tasks go to the global pool; the scope returns once all of them ran
    rayon::scope(|scope| {
        for (index, child) in listing.iter().enumerate() {
            let tx = tx.clone();
            let results = &results;
            let path = directory.join(&child.name);
            let kind = EntryKind::from_is_dir(child.is_dir);

            scope.spawn(move |_| {
                // a panic counts as a failed task
                let measured = panic::catch_unwind(AssertUnwindSafe(|| measure(fs, &path)))
                    .unwrap_or_else(|_| Err(DirsizeError::ScanTask(path.clone())));
                report_completion(&tx, results, index, path, kind, measured);
            });
        }
    });
    drop(tx);

    await_completions(&rx, listing.len(), directory)?;

    let mut results = results.into_inner();
    results.sort_by(|(ia, a), (ib, b)| b.size.cmp(&a.size).then(ia.cmp(ib)));

    Ok(results.into_iter().map(|(_, entry)| entry).collect())
}

fn report_completion(
    tx: &Sender<Completion>,
    results: &Mutex<Vec<(usize, ScanEntry)>>,
    index: usize,
    path: PathBuf,
    kind: EntryKind,
    measured: Result<SizeReport>,
) {
    match measured {
        Ok(report) => {
            results.lock().push((
                index,
                ScanEntry {
                    path,
                    kind,
                    size: report.bytes,
                    warnings: report.warnings.len(),
                },
            ));
            let _ = tx.send(Completion::Done);
        }
        Err(err) => {
            let _ = tx.send(Completion::Failed(err));
        }
    }
}

/// Wait for one signal per task, stopping at the first failure.
fn await_completions(rx: &Receiver<Completion>, expected: usize, directory: &Path) -> Result<()> {
    for _ in 0..expected {
        match rx.recv() {
            Ok(Completion::Done) => {}
            Ok(Completion::Failed(err)) => return Err(err),
            // every sender is gone but a task never reported
            Err(_) => return Err(DirsizeError::ScanTask(directory.to_path_buf())),
        }
    }
    Ok(())
}
