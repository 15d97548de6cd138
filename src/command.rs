use crate::error::{Error, Result};
use std::fmt;
use std::io::{ErrorKind, Write};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;
use tracing::debug;

/// A program plus its arguments, split with shell word rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Split a user-supplied command string like `fzf --with-nth 2..`
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = shlex::split(line)
            .ok_or_else(|| Error::InvalidCommand {
                command: line.to_string(),
            })?
            .into_iter();

        let program = words.next().ok_or_else(|| Error::InvalidCommand {
            command: line.to_string(),
        })?;

        Ok(CommandLine {
            program,
            args: words.collect(),
        })
    }

    pub fn new<S: Into<String>>(program: S) -> Self {
        CommandLine {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append the words of `extra` (if any) to this command
    pub fn extended(self, extra: Option<&str>) -> Result<Self> {
        match extra {
            Some(extra) => {
                let words = shlex::split(extra).ok_or_else(|| Error::InvalidCommand {
                    command: extra.to_string(),
                })?;
                Ok(self.args(words))
            }
            None => Ok(self),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Run to completion, feeding `input` on stdin, and return stdout.
    ///
    /// A missing binary is reported as [`Error::ToolNotFound`] labelled with `role`.
    pub fn output(&self, role: &'static str, input: Option<&str>) -> Result<String> {
        debug!(command = %self, "running {}", role);

        let mut child = self
            .command()
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.spawn_error(role, e))?;

        // Stdin is written from its own thread while stdout is drained here,
        // otherwise a child that fills the stdout pipe before reading all of
        // its input blocks both sides.
        let stdin = child.stdin.take();
        let output = thread::scope(|scope| {
            let writer = scope.spawn(move || match (input, stdin) {
                (Some(input), Some(mut stdin)) => feed(&mut stdin, input),
                _ => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or(Ok(()));
            written.and(output)
        })?;
        debug!(status = %output.status, bytes = output.stdout.len(), "{} finished", role);

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run to completion with the terminal's stdout and stderr.
    pub fn status(&self, role: &'static str) -> Result<ExitStatus> {
        debug!(command = %self, "running {}", role);

        self.command()
            .stdin(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(role, e))
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    fn spawn_error(&self, role: &'static str, e: std::io::Error) -> Error {
        if e.kind() == ErrorKind::NotFound {
            Error::ToolNotFound {
                role,
                command: self.to_string(),
            }
        } else {
            Error::Io(e)
        }
    }
}

/// Write all of `input`, tolerating selectors such as `head` that quit early.
fn feed(stdin: &mut ChildStdin, input: &str) -> std::io::Result<()> {
    match stdin.write_all(input.as_bytes()) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words =
            std::iter::once(self.program()).chain(self.arguments().iter().map(String::as_str));
        match shlex::try_join(words) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => write!(f, "{} {}", self.program, self.args.join(" ")),
        }
    }
}

/// Best-effort desktop notification; failures are ignored.
pub fn notify(message: &str) {
    let sent = Command::new("notify-send")
        .arg(message)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    if let Err(e) = sent {
        debug!("notify-send unavailable: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_shell_words() {
        let cmd = CommandLine::parse("rofi -dmenu -p 'Pick a PDF'").unwrap();
        assert_eq!(cmd.program(), "rofi");
        assert_eq!(cmd.arguments(), ["-dmenu", "-p", "Pick a PDF"]);
    }

    #[test]
    fn test_parse_rejects_empty_and_unbalanced() {
        assert!(matches!(
            CommandLine::parse("   "),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(matches!(
            CommandLine::parse("fzf --prompt 'oops"),
            Err(Error::InvalidCommand { .. })
        ));
    }

    #[test]
    fn test_extended_appends_words() {
        let cmd = CommandLine::parse("fzf")
            .unwrap()
            .extended(Some("--prompt 'TOC> '"))
            .unwrap();
        assert_eq!(cmd.arguments(), ["--prompt", "TOC> "]);

        let unchanged = CommandLine::new("fzf").extended(None).unwrap();
        assert_eq!(unchanged, CommandLine::new("fzf"));
    }

    #[test]
    fn test_display_quotes_arguments() {
        let cmd = CommandLine::new("fzf").arg("--with-nth").arg("2..").arg("a b");
        let shown = cmd.to_string();
        assert!(shown.starts_with("fzf --with-nth 2.. "));
        assert_eq!(CommandLine::parse(&shown).unwrap(), cmd);
    }

    #[test]
    fn test_output_feeds_stdin() {
        let out = CommandLine::new("cat").output("test", Some("a\nb\n")).unwrap();
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn test_missing_program_is_tool_not_found() {
        let err = CommandLine::new("pdf-picker-no-such-program")
            .output("Selector", None)
            .unwrap_err();
        match err {
            Error::ToolNotFound { role, command } => {
                assert_eq!(role, "Selector");
                assert_eq!(command, "pdf-picker-no-such-program");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_early_exit_does_not_fail() {
        let input = "line\n".repeat(100_000);
        let out = CommandLine::new("head")
            .args(["-n", "1"])
            .output("test", Some(&input))
            .unwrap();
        assert_eq!(out, "line\n");
    }

    #[test]
    fn test_large_input_through_echoing_filter() {
        // Well beyond the pipe buffers on both sides
        let input = "0\tsome/long/path/to/a/document.pdf\n".repeat(40_000);
        let out = CommandLine::new("cat").output("test", Some(&input)).unwrap();
        assert_eq!(out.len(), input.len());
    }
}
