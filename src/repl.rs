//! Interactive chat loop
//!
//! One line of input per prompt, one assistant reply per turn. The literal
//! input `exit` ends the session. Turns run strictly one at a time.

use crate::runtime::{ChatClient, TurnExecutor};
use crate::state_machine::ConversationState;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_COMMAND: &str = "exit";

/// Run the REPL until end-of-input or the exit command.
pub async fn run<C: ChatClient>(executor: &TurnExecutor<C>) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut state = ConversationState::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = line.trim();
        if input == EXIT_COMMAND {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match executor.run_turn(&mut state, input).await {
            Ok(reply) => println!("{reply}"),
            Err(e) => {
                // Fatal turn errors surface here; the state was not advanced,
                // so the user can simply try again.
                tracing::error!(error = %e, "Turn failed");
                println!("error: {e}");
            }
        }
    }

    Ok(())
}
