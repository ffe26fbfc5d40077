//! File sink implementation

use crate::core::{LogEvent, PipelineError, RenderFormat, Renderer, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct FileSink {
    writer: Option<BufWriter<File>>,
    renderer: Renderer,
}

impl FileSink {
    /// Open `path` in append mode.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            renderer: Renderer::default(),
        })
    }

    /// Set the render format for this sink
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use log_pipeline::sinks::FileSink;
    /// use log_pipeline::RenderFormat;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_format(RenderFormat::Json);
    /// ```
    #[must_use]
    pub fn with_format(mut self, format: RenderFormat) -> Self {
        self.renderer = Renderer::new(format);
        self
    }
}

impl Sink for FileSink {
    fn write(&mut self, event: &LogEvent) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| PipelineError::sink("file", "writer not initialized"))?;

        let mut rendered = self.renderer.render(event);
        rendered.push('\n');
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Buffered data must reach the file even without an explicit flush
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_appends_lines() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("sink_test.log");

        let mut sink = FileSink::new(&path).unwrap();
        sink.write(&LogEvent::new(LogLevel::Info, "first")).unwrap();
        sink.write(&LogEvent::new(LogLevel::Warn, "second")).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn test_file_sink_json_format() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("sink_json.log");

        let mut sink = FileSink::new(&path).unwrap().with_format(RenderFormat::Json);
        sink.write(&LogEvent::new(LogLevel::Error, "structured")).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["level"], "Error");
        assert_eq!(value["message"], "structured");
    }
}
