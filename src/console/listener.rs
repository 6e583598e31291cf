// console/listener.rs

use crate::console::Console;
use crate::console::command_handler::{Flow, handle_command};
use crate::loader::LoadOutcome;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

/// Reads commands from `input` while applying catalog outcomes as they arrive.
/// Returns when the user quits or input ends, after any deferred search has run.
/// The console is closed on the way out.
pub async fn run<R>(console: &mut Console, input: R, mut outcomes: UnboundedReceiver<LoadOutcome>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut quit = false;
    console.say("📱 ProGlide lookup. Type a device name, or /help.");
    console.say("⏳ Loading catalog...");
    console.refresh();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(text)) => {
                    if handle_command(&text, console).await == Flow::Quit {
                        quit = true;
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            },
            Some(outcome) = outcomes.recv() => console.on_outcome(outcome),
        }
    }

    // Piped input can end before the catalog arrives; let a waiting search finish.
    while !quit && console.pending_search.is_some() && console.loader.is_loading() {
        match outcomes.recv().await {
            Some(outcome) => console.on_outcome(outcome),
            None => break,
        }
    }

    console.close();
    info!("Explore session ended");
}
