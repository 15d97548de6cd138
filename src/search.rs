use crate::command::CommandLine;
use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const ROLE: &str = "Search command";

/// Where the list of PDFs comes from
#[derive(Debug, Clone)]
pub enum SearchSource {
    /// A user-supplied command printing one path per line
    Custom(String),
    /// Built-in search below `base`
    Directory { base: PathBuf, hidden: bool },
}

/// One way of listing PDFs, tried in order until a program is found
#[derive(Debug, Clone)]
pub struct Candidate {
    command: CommandLine,
    /// Drop paths with a dot-prefixed component below this directory
    skip_hidden_below: Option<PathBuf>,
}

impl Candidate {
    pub fn new(command: CommandLine) -> Self {
        Candidate {
            command,
            skip_hidden_below: None,
        }
    }

    fn keep(&self, path: &Path) -> bool {
        match &self.skip_hidden_below {
            Some(base) => !has_hidden_component(path, base),
            None => true,
        }
    }
}

/// Search for PDFs, returning one path per result line
pub fn search_pdfs(source: &SearchSource) -> Result<Vec<PathBuf>> {
    match source {
        SearchSource::Custom(cmd) => {
            let candidate = Candidate::new(CommandLine::parse(cmd)?);
            run_candidates(&[candidate], cmd)
        }
        SearchSource::Directory { base, hidden } => {
            let base = std::path::absolute(base)?;
            let location = base.display().to_string();
            run_candidates(&directory_candidates(&base, *hidden), &location)
        }
    }
}

/// `fd` first, then the slower but ubiquitous `find` with the same filter
pub fn directory_candidates(base: &Path, hidden: bool) -> Vec<Candidate> {
    let base_str = base.display().to_string();

    let mut fd = CommandLine::new("fd")
        .args(["-I", "-t", "f", "-e", "pdf", "-a", "."])
        .arg(base_str.clone());
    if hidden {
        fd = fd.arg("-H");
    }

    let find = CommandLine::new("find")
        .arg(base_str)
        .args(["-type", "f", "-iname", "*.pdf"]);

    vec![
        Candidate::new(fd),
        Candidate {
            command: find,
            skip_hidden_below: (!hidden).then(|| base.to_path_buf()),
        },
    ]
}

/// Run the first candidate whose program exists.
///
/// A candidate that ran but printed nothing does not fall through to the next.
pub fn run_candidates(candidates: &[Candidate], location: &str) -> Result<Vec<PathBuf>> {
    for candidate in candidates {
        let stdout = match candidate.command.output(ROLE, None) {
            Ok(stdout) => stdout,
            Err(Error::ToolNotFound { command, .. }) => {
                warn!("{} not available, trying next search command", command);
                continue;
            }
            Err(e) => return Err(e),
        };

        let pdfs: Vec<PathBuf> = parse_paths(&stdout)
            .into_iter()
            .filter(|p| candidate.keep(p))
            .collect();
        debug!(count = pdfs.len(), command = %candidate.command, "search finished");

        if pdfs.is_empty() {
            return Err(Error::NoPdfsFound {
                location: location.to_string(),
            });
        }
        return Ok(pdfs);
    }

    let tried: Vec<String> = candidates
        .iter()
        .map(|c| c.command.program().to_string())
        .collect();
    Err(Error::ToolNotFound {
        role: ROLE,
        command: tried.join(", "),
    })
}

fn parse_paths(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

fn has_hidden_component(path: &Path, base: &Path) -> bool {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}
