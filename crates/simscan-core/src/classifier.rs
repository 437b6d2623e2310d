use infer::MatcherType;

/// Coarse content classification, sniffed from decompressed bytes rather
/// than file extensions or declared entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A zip archive we can open and walk recursively.
    Container,
    /// A recognized archive format we cannot open (rar, 7z, tar, ...).
    /// Carries the sniffed extension for the warning.
    Unsupported(&'static str),
    /// Anything else; handed to the fingerprinter.
    Leaf,
}

pub fn classify(data: &[u8]) -> EntryKind {
    match infer::get(data) {
        Some(kind) if kind.mime_type() == "application/zip" => EntryKind::Container,
        Some(kind) if kind.matcher_type() == MatcherType::Archive => {
            EntryKind::Unsupported(kind.extension())
        }
        _ => EntryKind::Leaf,
    }
}
