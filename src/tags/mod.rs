mod collect;
mod error;
mod graph;

pub use collect::{FileSource, LoadReport, collect_tag_graph};
pub use error::LoadError;
pub use graph::{BuildOptions, TagGraph};

#[cfg(test)]
pub use error::FileReadError;
#[cfg(test)]
pub use graph::build_tag_graph;
