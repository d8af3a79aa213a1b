use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, info, warn};

use super::error::{FileReadError, LoadError};
use super::graph::{BuildOptions, TagGraph, TagGraphBuilder};

/// A selected input item: a display name plus a blocking text read.
pub trait TagSource: Sync {
    fn name(&self) -> &str;
    fn read_text(&self) -> io::Result<String>;
}

#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

impl TagSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

#[derive(Debug)]
pub struct LoadReport {
    pub graph: TagGraph,
    pub files_read: usize,
    pub failures: Vec<FileReadError>,
    pub ignored: Vec<String>,
}

pub fn is_tag_file(name: &str) -> bool {
    name.ends_with(".txt")
}

const MAX_READERS: usize = 8;

fn reader_count(files: usize) -> usize {
    thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(MAX_READERS)
        .min(files)
        .max(1)
}

/// Reads `sources` on a small pool pulling from a shared cursor. Results come
/// back in input order. The calling thread reads too, so a refused thread
/// only slows the batch down.
fn read_all<S: TagSource>(sources: &[&S]) -> Vec<io::Result<String>> {
    let next = AtomicUsize::new(0);
    let drain = || {
        let mut done = Vec::new();
        loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            let Some(source) = sources.get(index) else {
                break;
            };
            done.push((index, source.read_text()));
        }
        done
    };
    let mut slots = sources.iter().map(|_| None).collect::<Vec<_>>();

    thread::scope(|scope| {
        let workers = (1..reader_count(sources.len()))
            .filter_map(|worker| {
                thread::Builder::new()
                    .name(format!("tag-reader-{worker}"))
                    .spawn_scoped(scope, &drain)
                    .inspect_err(|error| warn!(%error, "could not start reader thread"))
                    .ok()
            })
            .collect::<Vec<_>>();

        for (index, read) in drain() {
            slots[index] = Some(read);
        }
        for worker in workers {
            if let Ok(done) = worker.join() {
                for (index, read) in done {
                    slots[index] = Some(read);
                }
            }
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(io::Error::other("reader thread panicked"))))
        .collect()
}

/// Reads every `.txt` source concurrently and folds their tags into one graph.
///
/// Unreadable files are recorded in the report and contribute nothing.
pub fn collect_tag_graph<S: TagSource>(
    sources: &[S],
    options: BuildOptions,
) -> Result<LoadReport, LoadError> {
    let (accepted, rejected): (Vec<&S>, Vec<&S>) =
        sources.iter().partition(|source| is_tag_file(source.name()));

    let ignored = rejected
        .iter()
        .map(|source| source.name().to_owned())
        .collect::<Vec<_>>();
    for name in &ignored {
        debug!(%name, "ignoring non-.txt item");
    }

    if accepted.is_empty() {
        return Err(LoadError::NoValidFiles {
            selected: sources.len(),
        });
    }

    let reads = read_all(&accepted);

    let mut builder = TagGraphBuilder::new(options);
    let mut failures = Vec::new();
    for (source, read) in accepted.iter().zip(reads) {
        match read {
            Ok(text) => builder.fold(&text),
            Err(error) => {
                warn!(name = source.name(), %error, "failed to read tag file");
                failures.push(FileReadError {
                    name: source.name().to_owned(),
                    source: error,
                });
            }
        }
    }

    let files_read = builder.payloads();
    let graph = match builder.finish() {
        Ok(graph) => graph,
        Err(_) => {
            return Err(LoadError::EmptyInput {
                attempted: accepted.len(),
                failures,
                ignored,
            });
        }
    };

    info!(
        files = files_read,
        failed = failures.len(),
        ignored = ignored.len(),
        nodes = graph.node_count(),
        links = graph.link_count(),
        "built tag graph"
    );

    Ok(LoadReport {
        graph,
        files_read,
        failures,
        ignored,
    })
}
