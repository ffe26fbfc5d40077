//! Console sink implementation

use crate::core::{LogEvent, RenderFormat, Renderer, Result, Sink};
use colored::Colorize;
use std::io::Write;

pub struct ConsoleSink {
    use_colors: bool,
    renderer: Renderer,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            renderer: Renderer::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            renderer: Renderer::default(),
        }
    }

    /// Set the render format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use log_pipeline::sinks::ConsoleSink;
    /// use log_pipeline::RenderFormat;
    ///
    /// let sink = ConsoleSink::new().with_format(RenderFormat::Detailed);
    /// ```
    #[must_use]
    pub fn with_format(mut self, format: RenderFormat) -> Self {
        self.renderer = Renderer::new(format);
        self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, event: &LogEvent) -> Result<()> {
        let rendered = self.renderer.render(event);
        if self.use_colors {
            println!("{}", rendered.color(event.level.color_code()));
        } else {
            println!("{}", rendered);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
