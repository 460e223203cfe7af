//! Console rendering of run events.
//!
//! The presenter only observes the event bus. A failed write is logged and
//! otherwise ignored, so display problems never reach the agent loop.

use std::io::{self, Stderr, Stdout, Write};
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::warn;
use wayfarer_core::event::{DomainEvent, RunStatus};
use wayfarer_core::message::Message;

/// Renders the transcript to `out` and progress lines to `err`.
pub struct ConsolePresenter<O, E> {
    out: O,
    err: E,
}

impl ConsolePresenter<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsolePresenter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn render(&mut self, event: &DomainEvent) -> io::Result<()> {
        match event {
            DomainEvent::RunStarted { .. } => {
                writeln!(self.err, "Planning your trip...")?;
            }
            DomainEvent::MessageAppended { message, .. } => self.render_message(message)?,
            DomainEvent::ToolStarted { tool_name, .. } => {
                writeln!(self.err, "executing: {tool_name}")?;
            }
            DomainEvent::ToolFinished {
                tool_name, success, ..
            } => {
                if *success {
                    writeln!(self.err, "executed: {tool_name}")?;
                } else {
                    writeln!(self.err, "executed: {tool_name} (failed)")?;
                }
            }
            DomainEvent::RunFinished { status, .. } => {
                if *status == RunStatus::Exhausted {
                    writeln!(self.err, "Max turns reached without a final response")?;
                }
            }
        }
        self.out.flush()?;
        self.err.flush()
    }

    fn render_message(&mut self, message: &Message) -> io::Result<()> {
        match message {
            Message::User { content } => {
                writeln!(self.out, "\n[USER]\n{content}\n")?;
            }
            Message::Assistant(reply) => {
                if reply.requested_calls().is_empty() {
                    if let Some(text) = reply.content().filter(|t| !t.is_empty()) {
                        writeln!(self.out, "\n[ASSISTANT]\n{text}\n")?;
                    }
                } else {
                    for call in reply.requested_calls() {
                        writeln!(self.out, "\n[ASSISTANT]\n{}\n", call.name)?;
                    }
                }
            }
            Message::Tool { content, .. } => {
                if is_hosted_image(content) {
                    writeln!(self.out, "\n[IMAGE GENERATED]")?;
                    writeln!(
                        self.out,
                        "Open this URL in your browser (expires in about 1 hour):"
                    )?;
                    writeln!(self.out, "{content}\n")?;
                }
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O, E> ConsolePresenter<O, E>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    /// Render every event from `rx` until the bus closes.
    pub fn spawn(mut self, mut rx: broadcast::Receiver<Arc<DomainEvent>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Err(e) = self.render(&event) {
                            warn!(error = %e, "Failed to render event");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Presenter fell behind; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Wait for a spawned presenter. A panic is logged, not propagated; returns
/// whether the presenter finished cleanly.
pub async fn join(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Console presenter stopped abnormally");
            false
        }
    }
}

/// Tool results that are hosted image URLs get highlighted.
fn is_hosted_image(content: &str) -> bool {
    content.starts_with("https://") && content.contains("blob.core.windows.net")
}
