//! Version suggestion and package manifest versioning.
//!
//! The advisor is pure; the package collaborator reads `package.json` and sets
//! the version through npm.

mod advisor;
mod package;

pub use advisor::{coerce_version, suggest_next_version};
pub use package::{NpmPackage, PackageVersion};
