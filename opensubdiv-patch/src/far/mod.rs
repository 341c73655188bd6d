//! Feature-adaptive representation: source patches, limit masks and the
//! conversion of source patches to parametric patches.
pub mod sparse_matrix;
pub use sparse_matrix::{SparseMatrix, SparseRow, SparseRowMut};

pub mod source_patch;
pub use source_patch::*;

pub mod patch_descriptor;
pub use patch_descriptor::*;

pub mod limit_weights;
pub use limit_weights::*;

pub mod catmark_limits;
pub use catmark_limits::*;

pub mod loop_limits;
pub use loop_limits::*;

pub(crate) mod corner_topology;

pub mod catmark_patch_builder;
pub use catmark_patch_builder::*;

pub mod loop_patch_builder;
pub use loop_patch_builder::*;

pub mod patch_builder;
pub use patch_builder::*;
