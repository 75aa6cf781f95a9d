//! Line-oriented command shell over a [`Namespace`].
//!
//! The shell owns all I/O: it reads lines, parses them into
//! [`ShellCommand`]s, calls the namespace and prints the rendered results.
//! Namespace errors are printed and never end the loop.

mod command;
mod view;

use std::io::{BufRead, Write};

use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::filesystem::{ListOrder, Namespace, SEPARATOR};

pub use command::{ShellCommand, parse_command};

const CONTENT_TERMINATOR: &str = "END";

#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub prompt: String,
    /// Print prompts and input hints
    pub interactive: bool,
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    settings: ShellSettings,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, settings: ShellSettings) -> Self {
        Self {
            input,
            output,
            settings,
        }
    }

    /// Runs commands until `exit` or the end of the input
    pub fn run(&mut self, namespace: &mut Namespace) -> Result<(), ShellError> {
        if self.settings.interactive {
            self.print("Type 'help' for commands.\n")?;
        }

        loop {
            if self.settings.interactive {
                self.print(&format!(
                    "{}:{}> ",
                    self.settings.prompt,
                    namespace.current_path()
                ))?;
            }

            let Some(line) = self.read_line()? else {
                debug!("Input exhausted, leaving shell");
                break;
            };

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(error) if error.is_help() => {
                    self.print(&error.to_string())?;
                    continue;
                }
                Err(error) => {
                    debug!("Rejected input {:?}", line);
                    let message = error.to_string();
                    let message = message.trim_start_matches("error: ").trim_end();
                    self.print(&view::error(message))?;
                    continue;
                }
            };

            if command == ShellCommand::Exit {
                self.print("Goodbye!\n")?;
                break;
            }

            let rendered = self.execute(command, namespace)?;
            self.print(&rendered)?;
        }

        info!("Shell finished at {}", namespace.current_path());
        Ok(())
    }

    /// Runs one command and returns its rendered output
    pub fn execute(
        &mut self,
        command: ShellCommand,
        namespace: &mut Namespace,
    ) -> Result<String, ShellError> {
        debug!("Executing {:?}", command);

        let rendered = match command {
            ShellCommand::Ls { insertion } => {
                let entries = if insertion {
                    namespace.list_children_in(ListOrder::Insertion)
                } else {
                    namespace.list_children()
                };
                view::listing(&namespace.current_path(), &entries)
            }
            ShellCommand::Mkdir { name } => {
                let name = command::words(&name);
                match namespace.create_directory(&name) {
                    Ok(()) => view::success(format!("Directory '{}' created", name)),
                    Err(error) => view::error(error),
                }
            }
            ShellCommand::Cd { target } => {
                let target = command::words(&target);
                match namespace.change_directory(&target) {
                    Ok(()) => view::success(format!("Changed to {}", namespace.current_path())),
                    Err(error) => view::error(error),
                }
            }
            ShellCommand::Touch { name, text } => {
                let name = command::words(&name);
                match namespace.create_file(&name, text.unwrap_or_default()) {
                    Ok(()) => view::success(format!("File '{}' created", name)),
                    Err(error) => view::error(error),
                }
            }
            ShellCommand::Cat { name } => {
                let name = command::words(&name);
                match namespace.read_file(&name) {
                    Ok(content) => view::content(&name, content),
                    Err(error) => view::error(error),
                }
            }
            ShellCommand::Write { name, text } => {
                let name = command::words(&name);
                // Resolve first so nobody types content for a file that is not there
                if let Err(error) = namespace.read_file(&name) {
                    return Ok(view::error(error));
                }
                let content = match text {
                    Some(text) => text,
                    None => self.read_content()?,
                };
                let size = content.len();
                match namespace.write_file(&name, content) {
                    Ok(()) => view::success(format!("File '{}' written ({} bytes)", name, size)),
                    Err(error) => view::error(error),
                }
            }
            ShellCommand::Rm { name } => {
                let name = command::words(&name);
                match namespace.delete_entry(&name) {
                    Ok(()) => view::success(format!("'{}' deleted", name)),
                    Err(error) => view::error(error),
                }
            }
            ShellCommand::Find { term } => {
                let term = command::words(&term);
                view::search_results(&term, &namespace.search(&term))
            }
            ShellCommand::Stat { name } => {
                let name = command::words(&name);
                if name.starts_with(SEPARATOR) {
                    match namespace.lookup(&name) {
                        Some(descriptor) => view::descriptor(&descriptor),
                        None => view::error(format!("'{}' not found", name)),
                    }
                } else {
                    match namespace.info(&name) {
                        Ok(descriptor) => view::descriptor(&descriptor),
                        Err(error) => view::error(error),
                    }
                }
            }
            ShellCommand::Pwd => format!("{}\n", namespace.current_path()),
            ShellCommand::Tree => view::tree(&namespace.render()),
            ShellCommand::Info => view::stats(&namespace.stats(), namespace.indexed_paths()),
            ShellCommand::Exit => String::new(),
        };

        Ok(rendered)
    }

    /// Collects lines until the terminator line or the end of the input
    fn read_content(&mut self) -> Result<String, ShellError> {
        if self.settings.interactive {
            self.print(&format!(
                "Enter content (type '{}' on new line to finish):\n",
                CONTENT_TERMINATOR
            ))?;
        }

        let mut content = String::new();
        while let Some(line) = self.read_line()? {
            if line == CONTENT_TERMINATOR {
                break;
            }
            content.push_str(&line);
            content.push('\n');
        }
        Ok(content)
    }

    fn read_line(&mut self) -> Result<Option<String>, ShellError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context(ReadSnafu)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print(&mut self, text: &str) -> Result<(), ShellError> {
        self.output.write_all(text.as_bytes()).context(WriteSnafu)?;
        self.output.flush().context(WriteSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read shell input"))]
    ReadError { source: std::io::Error },
    #[snafu(display("Failed to write shell output"))]
    WriteError { source: std::io::Error },
}
