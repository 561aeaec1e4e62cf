//! Diagnostic sanitizer
//!
//! Failure traces often mention absolute paths from the machine that produced them. Before a trace is embedded in a
//! report, every path-shaped substring that points at something existing on this machine is scrubbed:
//!
//! - existing file: `C:\Users\me\proj\Foo.cs` becomes `[removed]\Foo.cs`
//! - existing directory: the whole path becomes `[removed]`
//! - anything else is left alone
//!
//! A path starts at a drive letter (`C:`), a UNC prefix (`\\`) or, optionally, a POSIX root (`/`), must be preceded
//! by the start of a line or a non-word character, and runs until the next `:` or line break.

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

/// Marker substituted for scrubbed path prefixes.
pub const DEFAULT_REDACTION_MARKER: &str = "[removed]";

const DATA_URI_PREFIX: &str = "data:text/plain;base64,";

// The regex crate has no look-behind, so the preceding boundary is captured and written back.
static WINDOWS_PATHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|\W)((?:[A-Za-z]:|\\\\)[^:\r\n]+)").expect("INVARIANT: path pattern is valid")
});

static ALL_PATHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|\W)((?:[A-Za-z]:|\\\\|/)[^:\r\n]+)").expect("INVARIANT: path pattern is valid")
});

/// What a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    Missing,
}

/// Answers whether a path exists, and as what.
pub trait PathProbe: Send + Sync {
    fn probe(&self, path: &str) -> io::Result<PathKind>;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn probe(&self, path: &str) -> io::Result<PathKind> {
        match std::fs::metadata(Path::new(path)) {
            Ok(meta) if meta.is_dir() => Ok(PathKind::Directory),
            Ok(_) => Ok(PathKind::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
            Err(e) => Err(e),
        }
    }
}

/// Scrubs local paths from diagnostic text.
#[derive(Clone)]
pub struct Sanitizer {
    marker: String,
    scrub_posix: bool,
    probe: Arc<dyn PathProbe>,
}

impl Sanitizer {
    /// A sanitizer probing the real filesystem, with POSIX scrubbing enabled.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            scrub_posix: true,
            probe: Arc::new(FsProbe),
        }
    }

    pub fn with_probe(mut self, probe: impl PathProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    pub fn with_posix_paths(mut self, scrub: bool) -> Self {
        self.scrub_posix = scrub;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Replace every existing path in `text`.
    pub fn sanitize(&self, text: &str) -> String {
        let pattern = if self.scrub_posix { &*ALL_PATHS } else { &*WINDOWS_PATHS };

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in pattern.captures_iter(text) {
            let Some(path) = caps.get(2) else { continue };
            out.push_str(&text[last..path.start()]);
            out.push_str(&self.replacement(path.as_str()));
            last = path.end();
        }
        out.push_str(&text[last..]);
        out
    }

    fn replacement(&self, path: &str) -> String {
        match self.probe.probe(path) {
            Ok(PathKind::File) => {
                let separator = if path.contains('\\') { '\\' } else { '/' };
                let base = path.rsplit(['\\', '/']).next().unwrap_or(path);
                let mut scrubbed = String::with_capacity(self.marker.len() + 1 + base.len());
                // Writing to String cannot fail.
                let _ = write!(scrubbed, "{}{separator}{base}", self.marker);
                scrubbed
            }
            Ok(PathKind::Directory) => self.marker.clone(),
            Ok(PathKind::Missing) => path.to_string(),
            Err(e) => {
                tracing::debug!(path, error = %e, "path probe failed; leaving path unchanged");
                path.to_string()
            }
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_REDACTION_MARKER)
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer")
            .field("marker", &self.marker)
            .field("scrub_posix", &self.scrub_posix)
            .finish_non_exhaustive()
    }
}

/// Encode text as a self-contained `data:` URI.
pub fn encode_data_uri(text: &str) -> String {
    format!("{DATA_URI_PREFIX}{}", STANDARD.encode(text.as_bytes()))
}

/// Recover the text of a URI produced by [`encode_data_uri`].
pub fn decode_data_uri(uri: &str) -> Option<String> {
    let payload = uri.strip_prefix(DATA_URI_PREFIX)?;
    let bytes = STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeProbe(HashMap<&'static str, PathKind>);

    impl PathProbe for FakeProbe {
        fn probe(&self, path: &str) -> io::Result<PathKind> {
            Ok(self.0.get(path).copied().unwrap_or(PathKind::Missing))
        }
    }

    struct BrokenProbe;

    impl PathProbe for BrokenProbe {
        fn probe(&self, _: &str) -> io::Result<PathKind> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn sanitizer(entries: &[(&'static str, PathKind)]) -> Sanitizer {
        Sanitizer::default().with_probe(FakeProbe(entries.iter().copied().collect()))
    }

    // ========================================
    // Windows paths
    // ========================================

    #[test]
    fn test_existing_file_keeps_basename() {
        let s = sanitizer(&[(r"C:\Users\me\proj\Foo.cs", PathKind::File)]);
        assert_eq!(
            s.sanitize(r"at Foo.Bar() in C:\Users\me\proj\Foo.cs: line 5"),
            r"at Foo.Bar() in [removed]\Foo.cs: line 5"
        );
    }

    #[test]
    fn test_existing_directory_becomes_marker() {
        let s = sanitizer(&[(r"C:\Users\me\proj", PathKind::Directory)]);
        assert_eq!(s.sanitize(r"cwd=C:\Users\me\proj"), "cwd=[removed]");
    }

    #[test]
    fn test_missing_path_unchanged() {
        let s = sanitizer(&[]);
        let text = r"in C:\nowhere\Foo.cs: line 1";
        assert_eq!(s.sanitize(text), text);
    }

    #[test]
    fn test_unc_path() {
        let s = sanitizer(&[(r"\\server\share\Foo.cs", PathKind::File)]);
        assert_eq!(s.sanitize(r"loaded from \\server\share\Foo.cs"), r"loaded from [removed]\Foo.cs");
    }

    #[test]
    fn test_requires_boundary() {
        let s = sanitizer(&[(r"C:\Foo.cs", PathKind::File)]);
        // `xC:` is preceded by a word character, so `C:` does not start a path.
        assert_eq!(s.sanitize(r"xC:\Foo.cs"), r"xC:\Foo.cs");
    }

    #[test]
    fn test_multiple_lines() {
        let s = sanitizer(&[(r"C:\a\One.cs", PathKind::File), (r"D:\b\Two.cs", PathKind::File)]);
        assert_eq!(
            s.sanitize("C:\\a\\One.cs: line 1\n  D:\\b\\Two.cs: line 2"),
            "[removed]\\One.cs: line 1\n  [removed]\\Two.cs: line 2"
        );
    }

    // ========================================
    // POSIX paths
    // ========================================

    #[test]
    fn test_posix_file() {
        let s = sanitizer(&[("/home/me/proj/src/lib.rs", PathKind::File)]);
        assert_eq!(
            s.sanitize("panicked at /home/me/proj/src/lib.rs:12:5"),
            "panicked at [removed]/lib.rs:12:5"
        );
    }

    #[test]
    fn test_posix_disabled() {
        let s = sanitizer(&[("/home/me/proj/src/lib.rs", PathKind::File)]).with_posix_paths(false);
        let text = "panicked at /home/me/proj/src/lib.rs:12:5";
        assert_eq!(s.sanitize(text), text);
    }

    #[test]
    fn test_real_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Trace.txt");
        std::fs::write(&file, "x").unwrap();
        let s = Sanitizer::default();

        let out = s.sanitize(&format!("at {}: line 3", file.display()));
        assert!(out.starts_with("at [removed]"), "{out}");
        assert!(out.ends_with("Trace.txt: line 3"), "{out}");
        assert!(!out.contains(&dir.path().display().to_string()));

        assert_eq!(s.sanitize(&format!("in {}", dir.path().display())), "in [removed]");
    }

    // ========================================
    // Probe failures
    // ========================================

    #[test]
    fn test_probe_error_leaves_text() {
        let s = Sanitizer::default().with_probe(BrokenProbe);
        let text = r"at C:\secret\Foo.cs: line 1";
        assert_eq!(s.sanitize(text), text);
    }

    #[test]
    fn test_custom_marker() {
        let s = Sanitizer::new("<path>").with_probe(FakeProbe(HashMap::from([(r"C:\x\y.cs", PathKind::File)])));
        assert_eq!(s.sanitize(r"C:\x\y.cs"), r"<path>\y.cs");
    }

    // ========================================
    // Data URIs
    // ========================================

    #[test]
    fn test_data_uri() {
        let uri = encode_data_uri("hi");
        assert_eq!(uri, "data:text/plain;base64,aGk=");
        assert_eq!(decode_data_uri(&uri).as_deref(), Some("hi"));
        assert_eq!(decode_data_uri("data:text/html,hi"), None);
    }
}
