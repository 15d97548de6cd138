pub mod document;
pub mod geometry;
pub mod toc;

#[cfg(test)]
pub mod testing;

pub use geometry::Position;
pub use toc::{extract_toc, toc_labels, CoordinateSpace};
