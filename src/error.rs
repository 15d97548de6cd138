//! Error types for pdf-picker

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An external program (search tool, selector or viewer) is not installed
    #[error("{role} ({command}) not found!")]
    ToolNotFound { role: &'static str, command: String },

    /// A mandatory selection came back empty
    #[error("Nothing selected!")]
    EmptySelection,

    /// The selector printed something that is not an index into the item list
    #[error("Selector returned an unusable selection: {output:?}")]
    MalformedSelection { output: String },

    #[error("No PDF files found in {location}")]
    NoPdfsFound { location: String },

    /// Command string that cannot be split into arguments
    #[error("Invalid command line: {command:?}")]
    InvalidCommand { command: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
