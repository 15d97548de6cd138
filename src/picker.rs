use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::pdf::{extract_toc, toc_labels, CoordinateSpace, Position};
use crate::search::{search_pdfs, SearchSource};
use crate::select::{Requirement, Selector};
use crate::viewer::Viewer;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to open once all selections are made
#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    pub path: PathBuf,
    /// `None` opens the document wherever the viewer starts by default
    pub position: Option<Position>,
}

impl Launch {
    fn plain(path: PathBuf) -> Self {
        Launch {
            path,
            position: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Picker {
    source: SearchSource,
    full_path: bool,
    skip_toc: bool,
    space: CoordinateSpace,
    pdf_selector: Selector,
    toc_selector: Selector,
    viewer: Viewer,
}

impl Picker {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let source = match &cli.search_cmd {
            Some(cmd) => SearchSource::Custom(cmd.clone()),
            None => SearchSource::Directory {
                base: cli.base_directory.clone().unwrap_or_else(home_directory),
                hidden: cli.hidden,
            },
        };

        let selector = cli.selector.as_deref();
        let picker = Picker {
            source,
            full_path: cli.full_path,
            skip_toc: cli.no_toc,
            space: if cli.device_coordinates {
                CoordinateSpace::Device
            } else {
                CoordinateSpace::Pdf
            },
            pdf_selector: Selector::configure(
                selector,
                cli.selector_indices,
                cli.pdf_selector_args.as_deref(),
            )?,
            toc_selector: Selector::configure(
                selector,
                cli.selector_indices,
                cli.toc_selector_args.as_deref(),
            )?,
            viewer: Viewer::configure(cli.pdf_viewer.as_deref(), cli.pdf_viewer_args.as_deref())?,
        };
        debug!(
            selector = %picker.pdf_selector.command(),
            indices = picker.pdf_selector.indices(),
            "configured"
        );

        Ok(picker)
    }

    /// Search, select, and open the chosen PDF
    pub fn run(&self) -> Result<()> {
        let launch = self.choose()?;
        self.viewer.open(&launch.path, launch.position.as_ref())
    }

    /// Walk through the selections without launching the viewer
    pub fn choose(&self) -> Result<Launch> {
        let mut pdfs = search_pdfs(&self.source)?;
        let labels = pdf_labels(&pdfs, self.full_path);

        let index = self
            .pdf_selector
            .select(&labels, Requirement::Mandatory)?
            .ok_or(Error::EmptySelection)?;
        let path = pdfs.swap_remove(index);
        info!(path = %path.display(), "PDF selected");

        if self.skip_toc {
            return Ok(Launch::plain(path));
        }

        let toc = match extract_toc(&path, self.space) {
            Ok(toc) => toc,
            Err(e) => {
                warn!("Could not read table of contents: {:#}", e);
                return Ok(Launch::plain(path));
            }
        };
        if toc.is_empty() {
            info!("no table of contents");
            return Ok(Launch::plain(path));
        }

        // Cancelling here still opens the file, just without a position
        let position = self
            .toc_selector
            .select(&toc_labels(&toc), Requirement::Optional)?
            .and_then(|i| toc[i].position());

        Ok(Launch { path, position })
    }
}

fn home_directory() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// File names, or full paths when requested
fn pdf_labels(pdfs: &[PathBuf], full_path: bool) -> Vec<String> {
    pdfs.iter()
        .map(|p| {
            let shown: &Path = if full_path {
                p
            } else {
                p.file_name().map(Path::new).unwrap_or(p)
            };
            shown.display().to_string()
        })
        .collect()
}
