use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::lines::source_lines;
use crate::FuzzError;

const STRICT_PRAGMAS: &[&str] = &["\"use strict\";", "'use strict';"];

/// The two markers a harness carries. They are drawn independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessIds {
    pub loop_id: Uuid,
    pub fault_id: Uuid,
}

impl HarnessIds {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            loop_id: random_uuid(rng),
            fault_id: random_uuid(rng),
        }
    }
}

/// Version 4 UUID built from the caller's RNG so seeded runs replay exactly.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes: [u8; 16] = rng.gen();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HarnessPositions {
    /// 1-based line of the `while (true)` opening.
    pub loop_line: usize,
    /// 1-based line of the `catch` clause.
    pub fault_line: usize,
    /// Lines inserted above the original first line.
    pub line_offset: usize,
}

#[derive(Debug, Clone)]
pub struct RenderedHarness {
    pub text: String,
    pub positions: HarnessPositions,
}

/// Everything downstream tooling needs to map engine output back onto the
/// original program. The comments in the emitted text are informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessRecord {
    pub path: PathBuf,
    pub loop_line: usize,
    pub loop_id: Uuid,
    pub fault_line: usize,
    pub fault_id: Uuid,
    pub line_offset: usize,
}

/// Appends whole lines and remembers how many have been written.
struct LineWriter {
    text: String,
    lines: usize,
}

impl LineWriter {
    fn new() -> Self {
        Self {
            text: String::new(),
            lines: 0,
        }
    }

    /// Writes one line and returns its 1-based number.
    fn line(&mut self, content: &str) -> usize {
        self.text.push_str(content);
        self.text.push('\n');
        self.lines += 1;
        self.lines
    }
}

/// Slots of the retry-loop template.
#[derive(Debug, Clone, Copy)]
pub struct HarnessLayout<'a> {
    pub pragma: Option<&'a str>,
    pub ids: HarnessIds,
    pub source: &'a str,
}

impl<'a> HarnessLayout<'a> {
    pub fn new(source: &'a str, ids: HarnessIds) -> Self {
        let pragma = STRICT_PRAGMAS
            .iter()
            .copied()
            .find(|pragma| source.starts_with(pragma));
        Self {
            pragma,
            ids,
            source,
        }
    }

    pub fn render(&self) -> RenderedHarness {
        let mut out = LineWriter::new();
        if let Some(pragma) = self.pragma {
            out.line(pragma);
        }
        let loop_line = out.line(&format!("while (true) {{ //{}", self.ids.loop_id));
        out.line("try {");
        out.line("");
        let line_offset = out.lines;

        for line in source_lines(self.source) {
            out.line(line);
        }

        let catch_var = format!("ex_{}", self.ids.fault_id.simple());
        let fault_line = out.line(&format!(
            "}} catch ({catch_var}) {{ //{}",
            self.ids.fault_id
        ));
        out.line(&format!("print({catch_var});"));
        out.line("}");
        out.line("}");

        RenderedHarness {
            text: out.text,
            positions: HarnessPositions {
                loop_line,
                fault_line,
                line_offset,
            },
        }
    }
}

/// `<dir>/<stem>_<uuid>[.<ext>]` next to the original.
pub fn harness_path(original: &Path, suffix: Uuid) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}_{suffix}");
    if let Some(ext) = original.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    match original.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Rewrites `path` into a fresh harness file beside it. The original file is
/// never touched; removing the new file is up to the caller.
pub fn instrument_file<R: Rng + ?Sized>(
    path: &Path,
    rng: &mut R,
) -> Result<HarnessRecord, FuzzError> {
    let source = fs::read_to_string(path).map_err(|source| FuzzError::Source {
        path: path.to_path_buf(),
        source,
    })?;
    let ids = HarnessIds::generate(rng);
    let rendered = HarnessLayout::new(&source, ids).render();

    // The file name is not drawn from `rng`: replaying a seed must not collide
    // with the harness a previous run left behind.
    let target = harness_path(path, Uuid::new_v4());
    write_new_file(&target, &rendered.text)?;

    let record = HarnessRecord {
        path: target,
        loop_line: rendered.positions.loop_line,
        loop_id: ids.loop_id,
        fault_line: rendered.positions.fault_line,
        fault_id: ids.fault_id,
        line_offset: rendered.positions.line_offset,
    };
    tracing::debug!(
        path = %record.path.display(),
        loop_line = record.loop_line,
        fault_line = record.fault_line,
        line_offset = record.line_offset,
        loop_id = %record.loop_id,
        fault_id = %record.fault_id,
        "wrote harness"
    );
    Ok(record)
}

fn write_new_file(path: &Path, text: &str) -> Result<(), FuzzError> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let file = fill_or_remove(path, file, text)?;
    if let Err(err) = file.sync_all() {
        drop(file);
        remove_partial(path);
        return Err(err.into());
    }
    Ok(())
}

/// Writes `text` to the freshly created `path`; on failure the file is removed.
fn fill_or_remove<W: Write>(path: &Path, mut out: W, text: &str) -> Result<W, FuzzError> {
    if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        drop(out);
        remove_partial(path);
        return Err(err.into());
    }
    Ok(out)
}

fn remove_partial(path: &Path) {
    if let Err(cleanup) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), "failed to remove partial harness: {cleanup}");
    }
}

/// Owns a generated harness and deletes it when dropped.
#[derive(Debug)]
pub struct HarnessFile {
    record: HarnessRecord,
    armed: bool,
}

impl HarnessFile {
    pub fn create<R: Rng + ?Sized>(original: &Path, rng: &mut R) -> Result<Self, FuzzError> {
        let record = instrument_file(original, rng)?;
        Ok(Self {
            record,
            armed: true,
        })
    }

    pub fn record(&self) -> &HarnessRecord {
        &self.record
    }

    /// Stops tracking the file; it stays on disk.
    pub fn keep(mut self) -> HarnessRecord {
        self.armed = false;
        self.record.clone()
    }
}

impl Drop for HarnessFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let path = &self.record.path;
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed harness"),
            Err(err) => tracing::warn!(path = %path.display(), "failed to remove harness: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids() -> HarnessIds {
        HarnessIds::generate(&mut StdRng::seed_from_u64(9))
    }

    #[test]
    fn plain_source_starts_with_the_loop() {
        let source = "var a = 1;\nvar b = a / 0;\nprint(b);";
        let rendered = HarnessLayout::new(source, ids()).render();
        let lines: Vec<&str> = rendered.text.lines().collect();
        assert_eq!(rendered.positions.loop_line, 1);
        assert_eq!(rendered.positions.line_offset, 3);
        assert_eq!(rendered.positions.fault_line, 3 + 4);
        assert!(lines[0].starts_with("while (true) { //"));
        assert_eq!(lines[1], "try {");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "var a = 1;");
        assert!(lines[6].starts_with("} catch (ex_"), "{}", lines[6]);
        assert_eq!(lines.len(), 3 + 3 + 4);
    }

    #[test]
    fn pragma_shifts_everything_by_one_line() {
        let source = "\"use strict\";\nvar a = 1;";
        let rendered = HarnessLayout::new(source, ids()).render();
        let lines: Vec<&str> = rendered.text.lines().collect();
        assert_eq!(lines[0], "\"use strict\";");
        assert_eq!(rendered.positions.loop_line, 2);
        assert_eq!(rendered.positions.line_offset, 4);
        assert_eq!(rendered.positions.fault_line, 2 + 4 + 1);
        assert!(lines[1].starts_with("while (true)"));
        assert_eq!(lines[4], "\"use strict\";");
    }

    #[test]
    fn every_javascript_line_terminator_counts() {
        let rendered = HarnessLayout::new("a();\rb();\rc();", ids()).render();
        let lines: Vec<&str> = rendered.text.lines().collect();
        assert_eq!(rendered.positions.fault_line, 3 + 4);
        assert_eq!(&lines[3..6], ["a();", "b();", "c();"]);
        assert!(lines[6].starts_with("} catch (ex_"), "{}", lines[6]);
        assert!(!rendered.text.contains('\r'));

        let separated = HarnessLayout::new("a();\u{2028}b();\u{2029}c();", ids()).render();
        assert_eq!(separated.positions, rendered.positions);
        assert_eq!(separated.text, rendered.text);
    }

    #[test]
    fn single_quoted_pragma_is_recognised() {
        let layout = HarnessLayout::new("'use strict';\nx();", ids());
        assert_eq!(layout.pragma, Some("'use strict';"));
        assert_eq!(HarnessLayout::new("x();", ids()).pragma, None);
    }

    #[test]
    fn trailing_newline_does_not_add_a_line() {
        let with = HarnessLayout::new("a();\nb();\n", ids()).render();
        let without = HarnessLayout::new("a();\nb();", ids()).render();
        assert_eq!(with.positions, without.positions);
        assert_eq!(with.text, without.text);
    }

    #[test]
    fn markers_appear_as_comments_only() {
        let ids = ids();
        let rendered = HarnessLayout::new("a();", ids).render();
        let lines: Vec<&str> = rendered.text.lines().collect();
        let opening = lines[rendered.positions.loop_line - 1];
        assert!(opening.ends_with(&format!("//{}", ids.loop_id)));
        let catch = lines[rendered.positions.fault_line - 1];
        assert!(catch.ends_with(&format!("//{}", ids.fault_id)));
        assert!(catch.contains(&format!("ex_{}", ids.fault_id.simple())));
    }

    #[test]
    fn generated_ids_are_version_4() {
        let ids = ids();
        assert_eq!(ids.loop_id.get_version_num(), 4);
        assert_eq!(ids.fault_id.get_version_num(), 4);
        assert_ne!(ids.loop_id, ids.fault_id);
    }

    #[derive(Debug)]
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_removes_the_partial_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("partial.js");
        fs::write(&path, "while (true) {").expect("seed partial file");

        let err = fill_or_remove(&path, ClosedPipe, "print(1);").expect_err("write fails");
        assert!(matches!(err, FuzzError::Io(_)), "{err:?}");
        assert!(!path.exists());
    }

    #[test]
    fn successful_write_keeps_the_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("fresh.js");
        write_new_file(&path, "print(1);\n").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "print(1);\n");
        assert!(write_new_file(&path, "again").is_err(), "existing file must not be replaced");
        assert_eq!(fs::read_to_string(&path).expect("read"), "print(1);\n");
    }

    #[test]
    fn harness_path_keeps_directory_and_extension() {
        let suffix = Uuid::nil();
        let path = harness_path(Path::new("progs/binomial.js"), suffix);
        assert_eq!(
            path,
            Path::new("progs").join(format!("binomial_{suffix}.js"))
        );
        let bare = harness_path(Path::new("script"), suffix);
        assert_eq!(bare, PathBuf::from(format!("script_{suffix}")));
    }
}
