use clap::Parser;
use snafu::{OptionExt, ResultExt, Snafu};

/// A single shell command, parsed with clap from a tokenised input line.
///
/// Every command also accepts the descriptive name of the menu-driven modes
/// (`createfolder`, `openfolder`, ...) as an alias. Names made of several
/// words are joined with single spaces, so quoting is optional.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "treefs", no_binary_name = true, disable_version_flag = true)]
pub enum ShellCommand {
    /// List the current directory
    #[command(visible_alias = "list")]
    Ls {
        /// Keep creation order instead of directories first
        #[arg(long)]
        insertion: bool,
    },
    /// Create a directory
    #[command(visible_alias = "createfolder")]
    Mkdir {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Change directory (`..` for the parent, `/` for the root)
    #[command(visible_alias = "openfolder")]
    Cd {
        #[arg(required = true, num_args = 1..)]
        target: Vec<String>,
    },
    /// Create a file
    #[command(visible_alias = "createfile")]
    Touch {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Initial content
        #[arg(long, short)]
        text: Option<String>,
    },
    /// Print the content of a file
    #[command(visible_alias = "view")]
    Cat {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Replace the content of a file, reading lines until `END` unless --text is given
    #[command(visible_aliases = ["nano", "editfile"])]
    Write {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        #[arg(long, short)]
        text: Option<String>,
    },
    /// Delete a file or an empty directory
    #[command(visible_alias = "delete")]
    Rm {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Search the whole tree for files whose name contains a term
    #[command(visible_alias = "findfile")]
    Find {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// Show details of an entry, or of an absolute path
    #[command(visible_alias = "details")]
    Stat {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Print the current path
    #[command(visible_alias = "where")]
    Pwd,
    /// Draw the whole tree
    Tree,
    /// Show statistics
    #[command(visible_aliases = ["report", "stats"])]
    Info,
    /// Leave the shell
    #[command(visible_alias = "quit")]
    Exit,
}

/// Joins the words of a multi-word argument
pub fn words(parts: &[String]) -> String {
    parts.join(" ")
}

/// Splits a line like a POSIX shell and parses it. Blank lines yield `None`.
pub fn parse_command(input: &str) -> Result<Option<ShellCommand>, CommandParseError> {
    let args = shlex::split(input).context(InvalidQuotingSnafu)?;
    if args.is_empty() {
        return Ok(None);
    }

    ShellCommand::try_parse_from(args)
        .map(Some)
        .context(ArgumentsSnafu)
}

#[derive(Debug, Snafu)]
pub enum CommandParseError {
    #[snafu(display("Invalid quoting"))]
    InvalidQuoting,
    #[snafu(display("{}", source.render()))]
    Arguments { source: clap::Error },
}

impl CommandParseError {
    /// Whether the "error" is clap's help output rather than a mistake
    pub fn is_help(&self) -> bool {
        match self {
            CommandParseError::Arguments { source } => matches!(
                source.kind(),
                clap::error::ErrorKind::DisplayHelp
                    | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ),
            CommandParseError::InvalidQuoting => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ls")]
    #[case("list")]
    fn listing_aliases(#[case] input: &str) {
        assert_eq!(
            parse_command(input).unwrap(),
            Some(ShellCommand::Ls { insertion: false })
        );
    }

    #[rstest]
    #[case("mkdir docs", ShellCommand::Mkdir { name: vec!["docs".into()] })]
    #[case("createfolder docs", ShellCommand::Mkdir { name: vec!["docs".into()] })]
    #[case("openfolder ..", ShellCommand::Cd { target: vec!["..".into()] })]
    #[case("view a.txt", ShellCommand::Cat { name: vec!["a.txt".into()] })]
    #[case("delete a.txt", ShellCommand::Rm { name: vec!["a.txt".into()] })]
    #[case("findfile report", ShellCommand::Find { term: vec!["report".into()] })]
    #[case("details a.txt", ShellCommand::Stat { name: vec!["a.txt".into()] })]
    #[case("where", ShellCommand::Pwd)]
    #[case("report", ShellCommand::Info)]
    #[case("stats", ShellCommand::Info)]
    #[case("quit", ShellCommand::Exit)]
    fn mode_vocabularies_share_commands(#[case] input: &str, #[case] expected: ShellCommand) {
        assert_eq!(parse_command(input).unwrap(), Some(expected));
    }

    #[rstest]
    #[case("nano notes.txt")]
    #[case("editfile notes.txt")]
    #[case("write notes.txt")]
    fn write_aliases(#[case] input: &str) {
        assert_eq!(
            parse_command(input).unwrap(),
            Some(ShellCommand::Write {
                name: vec!["notes.txt".into()],
                text: None,
            })
        );
    }

    #[test]
    fn multi_word_and_quoted_names() {
        let Some(ShellCommand::Mkdir { name }) = parse_command("mkdir my folder").unwrap() else {
            panic!("Expected Mkdir");
        };
        assert_eq!(words(&name), "my folder");

        let Some(ShellCommand::Touch { name, text }) =
            parse_command("touch \"my file.txt\" --text 'hello there'").unwrap()
        else {
            panic!("Expected Touch");
        };
        assert_eq!(words(&name), "my file.txt");
        assert_eq!(text.as_deref(), Some("hello there"));
    }

    #[test]
    fn blank_line_is_no_command() {
        assert!(parse_command("").unwrap().is_none());
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        assert!(matches!(
            parse_command("mkdir \"oops"),
            Err(CommandParseError::InvalidQuoting)
        ));
    }

    #[test]
    fn missing_operand_is_an_error() {
        let err = parse_command("mkdir").unwrap_err();
        assert!(matches!(err, CommandParseError::Arguments { .. }));
        assert!(!err.is_help());
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(matches!(
            parse_command("frobnicate"),
            Err(CommandParseError::Arguments { .. })
        ));
    }

    #[test]
    fn help_is_recognised() {
        let err = parse_command("help").unwrap_err();
        assert!(err.is_help());
        assert!(err.to_string().contains("mkdir"));
    }
}
