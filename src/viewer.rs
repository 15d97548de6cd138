use crate::command::CommandLine;
use crate::error::{Error, Result};
use crate::pdf::Position;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

pub const DEFAULT_VIEWER: &str = "zathura";
pub const DEFAULT_POSITION_ARGS: &str = "-P $page";

const ROLE: &str = "PDF viewer";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(page|xloc|yloc)").unwrap());

#[derive(Debug, Clone)]
pub struct Viewer {
    command: CommandLine,
    /// Arguments appended after the path when opening at a position
    position_args: Option<String>,
}

impl Viewer {
    pub fn new(command: CommandLine, position_args: Option<String>) -> Self {
        Viewer {
            command,
            position_args,
        }
    }

    /// The configured viewer, or zathura with `-P $page` unless other
    /// position arguments are given.
    pub fn configure(command: Option<&str>, position_args: Option<&str>) -> Result<Self> {
        let position_args = position_args.map(str::to_string);
        match command {
            Some(cmd) => Ok(Viewer::new(CommandLine::parse(cmd)?, position_args)),
            None => Ok(Viewer::new(
                CommandLine::new(DEFAULT_VIEWER),
                position_args.or_else(|| Some(DEFAULT_POSITION_ARGS.to_string())),
            )),
        }
    }

    /// The full command line: viewer, file, then any position arguments
    pub fn invocation(&self, path: &Path, position: Option<&Position>) -> Result<CommandLine> {
        let command = self.command.clone().arg(path.display().to_string());

        match (position, self.position_args.as_deref()) {
            (Some(position), Some(template)) => {
                Ok(command.args(expand_position_args(template, position)?))
            }
            _ => Ok(command),
        }
    }

    /// Launch the viewer and wait for it to exit
    pub fn open(&self, path: &Path, position: Option<&Position>) -> Result<()> {
        let command = self.invocation(path, position)?;
        info!(command = %command, "opening PDF");

        let status = command.status(ROLE)?;
        if !status.success() {
            warn!(%status, "viewer exited unsuccessfully");
        }
        Ok(())
    }
}

/// Substitute `$page`, `$xloc` and `$yloc` in one pass, then split into words.
///
/// Substituted text is never scanned again.
pub fn expand_position_args(template: &str, position: &Position) -> Result<Vec<String>> {
    let expanded = PLACEHOLDER.replace_all(template, |caps: &Captures| match &caps[1] {
        "page" => position.page.to_string(),
        "xloc" => position.x.to_string(),
        _ => position.y.to_string(),
    });

    shlex::split(&expanded).ok_or_else(|| Error::InvalidCommand {
        command: template.to_string(),
    })
}
