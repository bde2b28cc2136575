use berner_core::CoreResult;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Whoever is running the bot. Gates the interactive first-run steps.
pub trait Operator {
    /// Shows `prompt` and blocks until the operator acknowledges it.
    fn confirm(&self, prompt: &str) -> CoreResult<()>;

    fn notify(&self, message: &str);
}

/// Reads acknowledgements from stdin.
pub struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn confirm(&self, prompt: &str) -> CoreResult<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", prompt)?;
        writeln!(stdout)?;
        write!(stdout, "Press Enter to continue....")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// Accepts every prompt without waiting, for unattended runs.
pub struct AutoConfirm;

impl Operator for AutoConfirm {
    fn confirm(&self, prompt: &str) -> CoreResult<()> {
        info!("Auto-confirming: {}", prompt);
        Ok(())
    }

    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}
