//! Line-based confirmation over async IO.

use super::Confirmer;
use crate::planner::Plan;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::warn;

/// Returns true for `y` or `yes`, ignoring case and surrounding whitespace.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

struct Io<R, W> {
    reader: R,
    writer: W,
}

/// Prints the plan to a writer and reads one answer line from a reader.
///
/// End of input or an IO error counts as a decline.
pub struct PromptConfirmer<R, W> {
    io: Mutex<Io<R, W>>,
    list_plan: bool,
}

impl<R, W> PromptConfirmer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a confirmer over the given streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new(Io { reader, writer }),
            list_plan: true,
        }
    }

    /// Controls whether the numbered plan precedes the question. Turn it off
    /// when an event sink already renders `workflow.planned`.
    #[must_use]
    pub fn with_plan_listing(mut self, enabled: bool) -> Self {
        self.list_plan = enabled;
        self
    }

    async fn ask(&self, plan: &Plan) -> std::io::Result<bool> {
        let mut io = self.io.lock().await;
        let mut prompt = String::new();
        if self.list_plan {
            prompt = format!("Planned {} step(s):\n{plan}\n", plan.len());
        }
        prompt.push_str("Proceed with the workflow? (y/n): ");
        io.writer.write_all(prompt.as_bytes()).await?;
        io.writer.flush().await?;

        let mut answer = String::new();
        if io.reader.read_line(&mut answer).await? == 0 {
            return Ok(false);
        }
        Ok(is_affirmative(&answer))
    }
}

impl PromptConfirmer<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Creates a confirmer on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> Confirmer for PromptConfirmer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn confirm(&self, plan: &Plan) -> bool {
        self.ask(plan).await.unwrap_or_else(|err| {
            warn!(error = %err, "Confirmation prompt failed, treating as declined");
            false
        })
    }
}

impl<R, W> std::fmt::Debug for PromptConfirmer<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptConfirmer").finish_non_exhaustive()
    }
}
