use clap::{ArgAction, Parser};
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  # Use rofi as the selector with custom prompts
  pdf-picker -s 'rofi -dmenu -i -format i' --pdf-selector-args='-p PDF' --toc-selector-args='-p TOC'

  # Use fuzzel as the selector and sioyek as the viewer, show full paths
  # and only search within the Documents directory
  pdf-picker -f -b ~/Documents \\
      -s 'fuzzel -d --counter --index -w 100' \\
      -p sioyek -m -a '--page $page --xloc $xloc --yloc $yloc'";

#[derive(Parser, Debug, Default)]
#[command(name = "pdf-picker")]
#[command(
    about = "Interactively open a PDF file, optionally at a specific table of contents entry"
)]
#[command(version, after_help = EXAMPLES)]
pub struct Cli {
    /// Show full paths of the PDF files during selection
    #[arg(short, long)]
    pub full_path: bool,

    /// Never ask for a table of contents entry
    #[arg(short, long)]
    pub no_toc: bool,

    /// Also search hidden files (ignored with --search-cmd)
    #[arg(short = 'H', long)]
    pub hidden: bool,

    /// Base directory for searching PDF files [default: home directory]
    #[arg(short, long, env = "PDF_PICKER_BASE_DIR")]
    pub base_directory: Option<PathBuf>,

    /// Command used to select items. It must print the index of the
    /// selection, not the selection itself, unless --selector-indices is set
    /// [default: fzf]
    #[arg(short, long, env = "PDF_PICKER_SELECTOR")]
    pub selector: Option<String>,

    /// Prefix every selection item with its index
    #[arg(short = 'i', long)]
    pub selector_indices: bool,

    /// Extra selector arguments for PDF selection
    /// (arguments starting with a dash need `=`, as in --pdf-selector-args='-p PDF')
    #[arg(long, allow_hyphen_values = true)]
    pub pdf_selector_args: Option<String>,

    /// Extra selector arguments for table of contents selection
    #[arg(long, allow_hyphen_values = true)]
    pub toc_selector_args: Option<String>,

    /// Command used to view PDF files [default: zathura]
    #[arg(short = 'p', long, env = "PDF_PICKER_VIEWER")]
    pub pdf_viewer: Option<String>,

    /// Viewer arguments for opening at a position; `$page`, `$xloc` and
    /// `$yloc` are replaced by the target of the chosen entry
    #[arg(
        short = 'a',
        long,
        env = "PDF_PICKER_VIEWER_ARGS",
        allow_hyphen_values = true
    )]
    pub pdf_viewer_args: Option<String>,

    /// Pass coordinates in device space (origin top-left, y down, as used by
    /// MuPDF based viewers) instead of PDF space
    #[arg(short = 'm', long, alias = "mupdf-coordinate-space")]
    pub device_coordinates: bool,

    /// Command printing PDF paths, one per line (overrides --base-directory and --hidden)
    #[arg(long, env = "PDF_PICKER_SEARCH_CMD")]
    pub search_cmd: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
