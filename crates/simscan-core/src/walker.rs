use std::io::{Cursor, Read};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::classifier::{self, EntryKind};
use crate::fingerprint::{Fingerprint, Fingerprinter};

pub struct WalkOptions<'a> {
    pub fingerprinter: &'a dyn Fingerprinter,
    pub smallfile_threshold: u64,
    pub max_depth: usize,
}

/// Walk one container archive (and any containers nested inside it),
/// fingerprinting every leaf entry.
///
/// `prefix` is the logical path accumulated so far; leaves append their entry
/// name, nested containers extend it with `name + "/"`. Uses an explicit
/// worklist with a depth counter so pathologically deep nesting is bounded by
/// `max_depth` instead of the call stack.
///
/// Per-entry failures (corrupt nested archive, unreadable entry, fingerprint
/// error) are logged warnings and contribute nothing; they never abort the
/// walk.
pub fn walk_container(
    data: Vec<u8>,
    prefix: String,
    opts: &WalkOptions<'_>,
) -> Vec<Fingerprint> {
    let mut results = Vec::new();
    let mut worklist = vec![(data, prefix, 1usize)];

    while let Some((bytes, prefix, depth)) = worklist.pop() {
        let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
            Ok(archive) => archive,
            Err(err) => {
                warn!("Error opening nested archive {}: {}", prefix, err);
                continue;
            }
        };

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Error opening entry #{} in {}: {}", index, prefix, err);
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            debug!("{}{}", prefix, name);

            let mut buf = Vec::with_capacity(entry.size() as usize);
            if let Err(err) = entry.read_to_end(&mut buf) {
                warn!("Error reading entry {}{}: {}", prefix, name, err);
                continue;
            }

            if (buf.len() as u64) < opts.smallfile_threshold {
                debug!(
                    "Skipping small entry {}{} ({} bytes)",
                    prefix,
                    name,
                    buf.len()
                );
                continue;
            }

            match classifier::classify(&buf) {
                EntryKind::Container => {
                    if depth >= opts.max_depth {
                        warn!(
                            "Container depth limit {} reached at {}{}, skipping subtree",
                            opts.max_depth, prefix, name
                        );
                        continue;
                    }
                    debug!("Recursing into {}{}", prefix, name);
                    worklist.push((buf, format!("{}{}/", prefix, name), depth + 1));
                }
                EntryKind::Unsupported(kind) => {
                    warn!("Entry {}{} is a {} archive, skipping", prefix, name, kind);
                }
                EntryKind::Leaf => match opts.fingerprinter.fingerprint(&buf) {
                    Ok(digest) => {
                        results.push(Fingerprint {
                            path: format!("{}{}", prefix, name),
                            digest,
                        });
                    }
                    Err(err) => {
                        warn!("Error fingerprinting {}{}: {}", prefix, name, err);
                    }
                },
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::SimHasher;
    use std::io::Write;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn opts(fingerprinter: &SimHasher, smallfile_threshold: u64, max_depth: usize) -> WalkOptions<'_> {
        WalkOptions {
            fingerprinter,
            smallfile_threshold,
            max_depth,
        }
    }

    #[test]
    fn leaves_are_fingerprinted_with_joined_paths() {
        let content = vec![b'x'; 300];
        let archive = zip_bytes(&[("hw1/sol.c", &content), ("hw1/extra.c", &content)]);

        let hasher = SimHasher;
        let results = walk_container(archive, "alice123456.zip:".to_string(), &opts(&hasher, 256, 16));

        let mut paths: Vec<&str> = results.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(
            paths,
            vec!["alice123456.zip:hw1/extra.c", "alice123456.zip:hw1/sol.c"]
        );
    }

    #[test]
    fn small_entries_are_never_fingerprinted() {
        let archive = zip_bytes(&[("stub.txt", b"tiny"), ("real.txt", &vec![b'y'; 300])]);

        let hasher = SimHasher;
        let results = walk_container(archive, "sub.zip:".to_string(), &opts(&hasher, 256, 16));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "sub.zip:real.txt");
    }

    #[test]
    fn nested_containers_extend_the_path() {
        let content = vec![b'z'; 300];
        let inner = zip_bytes(&[("deep.txt", &content)]);
        let outer = zip_bytes(&[("inner.zip", &inner)]);

        let hasher = SimHasher;
        let results = walk_container(outer, "outer.zip:".to_string(), &opts(&hasher, 64, 16));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "outer.zip:inner.zip/deep.txt");
    }

    #[test]
    fn depth_cap_skips_the_subtree() {
        let content = vec![b'z'; 300];
        let inner = zip_bytes(&[("deep.txt", &content)]);
        let outer = zip_bytes(&[("inner.zip", &inner), ("shallow.txt", &content)]);

        let hasher = SimHasher;
        let results = walk_container(outer, "outer.zip:".to_string(), &opts(&hasher, 64, 1));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "outer.zip:shallow.txt");
    }

    #[test]
    fn corrupt_nested_archive_does_not_abort_the_walk() {
        // Zip magic followed by garbage: classified as a container, fails to open.
        let mut corrupt = b"PK\x03\x04".to_vec();
        corrupt.extend_from_slice(&vec![0xAB; 300]);
        let content = vec![b'w'; 300];
        let archive = zip_bytes(&[("broken.zip", &corrupt), ("ok.txt", &content)]);

        let hasher = SimHasher;
        let results = walk_container(archive, "sub.zip:".to_string(), &opts(&hasher, 64, 16));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "sub.zip:ok.txt");
    }

    #[test]
    fn directories_are_skipped() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        writer.add_directory("hw1/", options).unwrap();
        writer.start_file("hw1/sol.c", options).unwrap();
        writer.write_all(&vec![b'q'; 300]).unwrap();
        let archive = writer.finish().unwrap().into_inner();

        let hasher = SimHasher;
        let results = walk_container(archive, "sub.zip:".to_string(), &opts(&hasher, 256, 16));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "sub.zip:hw1/sol.c");
    }
}
