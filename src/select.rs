use crate::command::CommandLine;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Used when no selector is configured; it always gets index-prefixed items.
pub const DEFAULT_SELECTOR: &str = "fzf --with-nth 2..";

const ROLE: &str = "Selector";

static LEADING_INDEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").unwrap());

/// Whether an empty selection aborts the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Nothing selected is [`Error::EmptySelection`]
    Mandatory,
    /// Nothing selected is `Ok(None)`
    Optional,
}

/// An external picker reading items on stdin and printing the chosen index
#[derive(Debug, Clone)]
pub struct Selector {
    command: CommandLine,
    indices: bool,
}

impl Selector {
    pub fn new(command: CommandLine, indices: bool) -> Self {
        Selector { command, indices }
    }

    /// Build the selector for one phase: the configured (or default) command
    /// followed by that phase's extra arguments.
    pub fn configure(
        command: Option<&str>,
        indices: bool,
        extra_args: Option<&str>,
    ) -> Result<Self> {
        let (command, indices) = match command {
            Some(cmd) => (CommandLine::parse(cmd)?, indices),
            None => (CommandLine::parse(DEFAULT_SELECTOR)?, true),
        };
        Ok(Selector::new(command.extended(extra_args)?, indices))
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    pub fn indices(&self) -> bool {
        self.indices
    }

    /// Let the user pick one of `items`, returning its position in the list
    pub fn select<S: AsRef<str>>(
        &self,
        items: &[S],
        requirement: Requirement,
    ) -> Result<Option<usize>> {
        let input = format_items(items, self.indices);
        let output = self.command.output(ROLE, Some(&input))?;
        debug!(output = output.trim_end(), "selector output");

        let selection = parse_selection(&output, self.indices, items.len())?;
        match (selection, requirement) {
            (Some(index), _) => {
                info!(index, item = items[index].as_ref(), "selected");
                Ok(Some(index))
            }
            (None, Requirement::Mandatory) => Err(Error::EmptySelection),
            (None, Requirement::Optional) => {
                info!("selection cancelled");
                Ok(None)
            }
        }
    }
}

/// One item per line, optionally prefixed by `<index>\t`.
///
/// Line breaks inside an item are flattened so indices stay aligned with lines.
pub fn format_items<S: AsRef<str>>(items: &[S], indices: bool) -> String {
    let mut input = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            input.push('\n');
        }
        if indices {
            input.push_str(&format!("{}\t", i));
        }
        input.push_str(&item.as_ref().replace(['\n', '\r'], " "));
    }
    input
}

/// Turn selector output into an index into a list of `count` items.
///
/// Only the first line counts. With `indices` the leading digit run is the
/// index and the rest of the line (usually the echoed item) is ignored;
/// without it the whole line must be an integer.
pub fn parse_selection(output: &str, indices: bool, count: usize) -> Result<Option<usize>> {
    let line = output.trim().lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let malformed = || Error::MalformedSelection {
        output: output.to_string(),
    };

    let digits = if indices {
        LEADING_INDEX.find(line).map(|m| m.as_str()).ok_or_else(malformed)?
    } else {
        line
    };

    let index: usize = digits.parse().map_err(|_| malformed())?;
    if index >= count {
        return Err(malformed());
    }

    Ok(Some(index))
}
