pub mod build_id;

pub use build_id::{BuildIdResolver, ResolveBuildId};
