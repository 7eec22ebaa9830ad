//! CLI channel — stdin/stdout renderer for the conversation.
//!
//! Prints every new log entry after each turn, shows a typing indicator
//! while a round trip is outstanding, and turns each input line into one
//! submission.

use std::io::Write;
use std::pin::Pin;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::conversation::{ConversationController, Message, Role, Stage, TurnOutcome};
use crate::error::ControllerError;
use crate::submission::{HELP_TEXT, Submission, SubmissionParser};

/// Stream of raw input lines.
pub type LineStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Format one message for the terminal.
pub fn render_message(message: &Message) -> String {
    match message.role {
        Role::User => format!("you> {}", message.text),
        Role::Assistant => format!("assistant> {}", message.text),
    }
}

/// A CLI channel that reads from stdin and writes to stdout.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }

    /// Spawn the stdin reader and expose its lines as a stream.
    pub fn start(&self) -> LineStream {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        Box::pin(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|line| (line, rx))
        }))
    }

    /// Run the REPL on stdin/stdout until `/quit` or EOF.
    pub async fn run(&self, controller: &ConversationController) -> std::io::Result<()> {
        let lines = self.start();
        let mut stdout = std::io::stdout();
        drive(controller, lines, &mut stdout).await
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed `lines` to the controller and render the log to `out`.
///
/// User messages are echoed by the terminal already, so only assistant
/// entries are written after each turn.
pub async fn drive<W: Write>(
    controller: &ConversationController,
    mut lines: LineStream,
    out: &mut W,
) -> std::io::Result<()> {
    let mut seen = flush_new(controller, 0, out).await?;
    prompt(controller).await;

    while let Some(line) = lines.next().await {
        match SubmissionParser::parse(&line) {
            Submission::Quit => break,
            Submission::Help => writeln!(out, "{HELP_TEXT}")?,
            Submission::Health => match controller.health().await {
                Ok(h) => writeln!(
                    out,
                    "service: {} (llm: {}, symptoms: {})",
                    h.status,
                    if h.gemini { "up" } else { "down" },
                    h.symptoms_count
                )?,
                Err(e) => writeln!(out, "service unreachable: {e}")?,
            },
            Submission::RetryPrediction => {
                eprintln!("Typing...");
                if let Ok(TurnOutcome::Ignored) = controller.retry_prediction().await {
                    writeln!(out, "Nothing to retry.")?;
                }
            }
            Submission::UserInput { content } => {
                if content.is_empty() {
                    prompt(controller).await;
                    continue;
                }
                eprintln!("Typing...");
                match controller.submit_utterance(&content).await {
                    Ok(_) => {}
                    Err(ControllerError::InputClosed) => {
                        writeln!(out, "Waiting for the prediction. Type /retry to try again.")?;
                    }
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
        }

        seen = flush_new(controller, seen, out).await?;
        prompt(controller).await;
    }

    Ok(())
}

/// Write assistant messages appended since `seen`; returns the new mark.
async fn flush_new<W: Write>(
    controller: &ConversationController,
    seen: usize,
    out: &mut W,
) -> std::io::Result<usize> {
    let new = controller.messages_since(seen).await;
    for message in new.iter().filter(|m| m.role == Role::Assistant) {
        writeln!(out, "\n{}\n", render_message(message))?;
    }
    out.flush()?;
    Ok(seen + new.len())
}

async fn prompt(controller: &ConversationController) {
    if controller.stage().await == Stage::Done && controller.prediction_pending().await {
        eprint!("(prediction failed, /retry) > ");
    } else {
        eprint!("> ");
    }
}
