//! Plain-text report export backed by a self-deleting transient file.

use std::{
    fmt::Write as _,
    io::{self, Write},
    path::Path,
};

use axum::body::Bytes;
use chrono::NaiveDate;
use futures::Stream;
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::narrative::{prompt::format_decimal, NarrativeRecord};

/// Width of the line closing each record.
pub const SEPARATOR_WIDTH: usize = 50;
const CHUNK_SIZE: usize = 8 * 1024;

/// Concatenate records in the order given.
pub fn render_document(records: &[NarrativeRecord]) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut doc = String::new();
    for record in records {
        // Writing to a String cannot fail.
        let _ = write!(
            doc,
            "==== {subject} ====\nDismissals: {dismissals}\nAverage: {average}\n\n{text}\n\n{separator}\n\n",
            subject = record.subject,
            dismissals = record.dismissal_count,
            average = format_decimal(record.average),
            text = record.text,
        );
    }
    doc
}

/// Download name for a report produced on `date`.
pub fn report_filename(date: NaiveDate) -> String {
    format!("lyon_analysis_{}.txt", date.format("%Y%m%d"))
}

/// Write the rendered document to a caller-chosen path (CLI use).
pub fn write_report(path: &Path, records: &[NarrativeRecord]) -> io::Result<()> {
    std::fs::write(path, render_document(records))
}

/// A report written to a temporary file that is removed when this value is
/// dropped, including when a response stream holding it is abandoned.
pub struct TransientReport {
    file: Option<NamedTempFile>,
}

impl TransientReport {
    pub fn create(document: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("lyon_analysis_")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(document.as_bytes())?;
        file.flush()?;
        debug!(path = %file.path().display(), bytes = document.len(), "transient report written");
        Ok(Self { file: Some(file) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(NamedTempFile::path)
    }

    /// Stream the file's bytes. The file is deleted once the stream ends,
    /// errors, or is dropped early.
    pub fn into_stream(self) -> io::Result<impl Stream<Item = io::Result<Bytes>> + Send + 'static> {
        let handle = match &self.file {
            Some(file) => file.reopen()?,
            None => return Err(io::Error::new(io::ErrorKind::NotFound, "report already removed")),
        };
        let reader = tokio::fs::File::from_std(handle);

        Ok(futures::stream::unfold(Some((reader, self)), |state| async move {
            let (mut reader, guard) = state?;
            let mut buf = vec![0u8; CHUNK_SIZE];
            match reader.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(Bytes::from(buf)), Some((reader, guard))))
                }
                Err(err) => Some((Err(err), None)),
            }
        }))
    }
}

impl Drop for TransientReport {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            match file.close() {
                Ok(()) => debug!(path = %path.display(), "transient report removed"),
                Err(err) => warn!(path = %path.display(), %err, "failed to remove transient report"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    fn record(name: &str) -> NarrativeRecord {
        NarrativeRecord {
            subject: name.into(),
            dismissal_count: 5,
            average: 20.0,
            text: "Text".into(),
        }
    }

    #[test]
    fn single_record_layout() {
        let doc = render_document(&[record("X")]);
        let expected = format!(
            "==== X ====\nDismissals: 5\nAverage: 20.0\n\nText\n\n{}\n\n",
            "=".repeat(50)
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn filename_uses_compact_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(report_filename(date), "lyon_analysis_20240309.txt");
    }

    #[test]
    fn dropping_the_report_deletes_the_file() {
        let report = TransientReport::create("hello").unwrap();
        let path = report.path().unwrap().to_path_buf();
        assert!(path.exists());
        drop(report);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn streaming_yields_contents_then_deletes() {
        let doc = "a".repeat(CHUNK_SIZE * 2 + 17);
        let report = TransientReport::create(&doc).unwrap();
        let path = report.path().unwrap().to_path_buf();

        let chunks: Vec<_> = report.into_stream().unwrap().collect().await;
        let body: Vec<u8> = chunks
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect();
        assert_eq!(body, doc.as_bytes());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn abandoned_stream_still_deletes() {
        let report = TransientReport::create(&"b".repeat(CHUNK_SIZE * 3)).unwrap();
        let path = report.path().unwrap().to_path_buf();

        let mut stream = Box::pin(report.into_stream().unwrap());
        let first = stream.next().await.unwrap().unwrap();
        assert!(!first.is_empty());
        assert!(path.exists());
        drop(stream);
        assert!(!path.exists());
    }
}
