use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use colored::Colorize;
use log::debug;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// The interactive prompt loop.
///
/// One line in, one command out. Command errors are printed in red and
/// the machine is reset so the next line starts clean; only EOF, `exit`,
/// or `quit` end the loop.
pub async fn run(client: Arc<FtpClient>) -> std::io::Result<()> {
    println!("Welcome to rouilleftp");
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(">");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // `exit` says goodbye the same way `quit` does.
        let input = if trimmed.eq_ignore_ascii_case("exit") {
            "quit"
        } else {
            trimmed
        };

        match client.clone().execute_line(input).await {
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Continue) => {
                if let Some(err) = client.take_error().await {
                    eprintln!("{}", err.to_string().red());
                    client.reset().await;
                } else if !client.is_ready().await {
                    debug!("machine not ready after a command; resetting");
                    client.reset().await;
                }
            }
            Err(err) => {
                eprintln!("{}", err.to_string().red());
                client.reset().await;
            }
        }
    }

    println!("...bye :(");
    Ok(())
}
