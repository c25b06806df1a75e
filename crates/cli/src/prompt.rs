//! Line-oriented terminal I/O.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Reads answers from `input` and writes prompts and messages to `output`.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` (no newline) and read one line.
    ///
    /// Returns `None` at end of input. The answer is trimmed.
    pub fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            writeln!(self.output).context("failed to write output")?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, message: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", message.as_ref()).context("failed to write output")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn ask_trims_and_detects_end_of_input() {
        let mut prompt = Prompt::new(Cursor::new("  Alice \n"), Vec::new());

        assert_eq!(prompt.ask("Name: ").unwrap().as_deref(), Some("Alice"));
        assert_eq!(prompt.ask("Again: ").unwrap(), None);

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert_eq!(output, "Name: Again: \n");
    }
}
