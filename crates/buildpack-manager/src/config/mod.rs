//! Configuration for a staging run
//!
//! Values come from `BUILDPACKS_*` environment variables and can be
//! overridden programmatically (the CLI applies its flags on top).
//!
//! | Variable              | Meaning                                   |
//! |-----------------------|-------------------------------------------|
//! | `BUILDPACKS_DIR`      | install root                              |
//! | `BUILDPACKS_JSON`     | inline buildpack list                     |
//! | `BUILDPACKS_FILE`     | file holding the buildpack list           |
//! | `BUILDPACKS_CA_FILE`  | PEM bundle trusted by the primary client  |
//! | `BUILDPACKS_PROXY`    | proxy used by the primary client          |
//! | `BUILDPACKS_TIMEOUT`  | request timeout in seconds                |

mod config;
mod source;

pub use config::{BuildpackSource, InstallerConfig};
pub use source::ConfigLoader;
