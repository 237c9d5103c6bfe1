//! JSON Lines output.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Writes one compact JSON object per line.
pub struct JsonlWriter<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Serialize `record` on a single line followed by `\n`.
    ///
    /// Compact serialization escapes newlines inside strings, so a record
    /// never spans more than one physical line.
    pub fn write_record<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record).map_err(|e| {
            if e.is_io() {
                Error::Io(io::Error::from(e))
            } else {
                Error::from(e)
            }
        })?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Render records to a JSONL string.
pub fn to_jsonl<'r, T, I>(records: I) -> Result<String>
where
    T: Serialize + 'r,
    I: IntoIterator<Item = &'r T>,
{
    let mut writer = JsonlWriter::new(Vec::new());
    for record in records {
        writer.write_record(record)?;
    }
    let bytes = writer.finish()?;
    String::from_utf8(bytes).map_err(|e| Error::Serialize(e.to_string()))
}

/// Write records to `path`, replacing it atomically.
///
/// Records go to a temporary file next to `path`, which is synced and then
/// renamed over the destination. If anything fails the destination keeps its
/// previous content (or stays absent) and the temporary file is removed.
/// Every failure touching the output is reported as [`Error::FileWrite`].
///
/// Returns the number of records written.
pub fn write_jsonl_file<'r, P, T, I>(path: P, records: I) -> Result<usize>
where
    P: AsRef<Path>,
    T: Serialize + 'r,
    I: IntoIterator<Item = &'r T>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let fail = |e: io::Error| Error::file_write(path, e);

    // The replacement keeps the mode of the file it replaces; a new file
    // gets the usual 0o666 minus umask instead of the temp file's 0o600.
    let existing = std::fs::metadata(path).ok().map(|m| m.permissions());
    let mut builder = tempfile::Builder::new();
    builder.prefix(".pdf2jsonl-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(fail)?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions).map_err(fail)?;
    }

    let mut writer = JsonlWriter::new(BufWriter::new(tmp.as_file_mut()));
    for record in records {
        writer.write_record(record).map_err(|e| match e {
            Error::Io(e) => fail(e),
            other => other,
        })?;
    }
    let count = writer.lines();
    writer
        .finish()
        .map_err(|e| match e {
            Error::Io(e) => fail(e),
            other => other,
        })?;

    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;

    log::debug!("Wrote {} records to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_one_object_per_line() {
        let records = vec![json!({"a": 1}), json!({"text": "two\nlines"})];
        let out = to_jsonl(&records).unwrap();

        assert_eq!(out, "{\"a\":1}\n{\"text\":\"two\\nlines\"}\n");
        assert_eq!(out.lines().count(), 2);
        for line in out.lines() {
            let _: Value = serde_json::from_str(line).unwrap();
        }
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        let records: Vec<Value> = vec![];
        assert_eq!(to_jsonl(&records).unwrap(), "");
    }

    #[test]
    fn test_writer_counts_lines() {
        let mut writer = JsonlWriter::new(Vec::new());
        writer.write_record(&json!([1, 2])).unwrap();
        writer.write_record(&json!(null)).unwrap();
        assert_eq!(writer.lines(), 2);
        assert_eq!(writer.finish().unwrap(), b"[1,2]\nnull\n");
    }

    #[test]
    fn test_write_file_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        std::fs::write(&path, "stale\nstale\nstale\n").unwrap();

        let count = write_jsonl_file(&path, &vec![json!({"n": 1})]).unwrap();
        assert_eq!(count, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"n\":1}\n");
    }

    #[test]
    fn test_write_file_zero_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");

        let records: Vec<Value> = vec![];
        assert_eq!(write_jsonl_file(&path, &records).unwrap(), 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_write_file_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.jsonl");

        let err = write_jsonl_file(&path, &vec![json!(1)]).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        for mode in [0o644, 0o640] {
            let path = dir.path().join(format!("out-{mode:o}.jsonl"));
            std::fs::write(&path, "old\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();

            write_jsonl_file(&path, &vec![json!({"n": 1})]).unwrap();

            let after = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(after, mode);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("reference");
        std::fs::write(&reference, "").unwrap();
        let umask_mode = std::fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        let path = dir.path().join("fresh.jsonl");
        write_jsonl_file(&path, &vec![json!(1)]).unwrap();

        // Same mode as any other file created with default permissions.
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, umask_mode);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        write_jsonl_file(&path, &vec![json!(1), json!(2)]).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.jsonl"]);
    }
}
