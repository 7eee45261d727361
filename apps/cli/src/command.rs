//! Parsing of the line commands typed at the prompt.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capture(PathBuf),
    /// Zero-based; the prompt shows items numbered from one.
    Delete(usize),
    Reset,
    Confirm,
    Cancel,
    List,
    ToggleCamera,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  capture <path>   classify a photo and offer to add it
  delete <n>       offer to remove item n
  reset            offer to clear the list
  yes | confirm    accept the pending prompt
  no | cancel      dismiss the pending prompt
  list             show the list
  camera           switch between back and front camera
  quit";

pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "capture" | "photo" => {
            if rest.is_empty() {
                bail!("capture needs a path to a photo");
            }
            Command::Capture(PathBuf::from(rest))
        }
        "delete" | "rm" => {
            let number: usize = rest
                .parse()
                .map_err(|_| anyhow!("delete needs an item number, got '{rest}'"))?;
            if number == 0 {
                bail!("items are numbered from 1");
            }
            Command::Delete(number - 1)
        }
        "reset" => Command::Reset,
        "yes" | "y" | "confirm" => Command::Confirm,
        "no" | "n" | "cancel" => Command::Cancel,
        "list" | "ls" => Command::List,
        "camera" | "flip" => Command::ToggleCamera,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}
