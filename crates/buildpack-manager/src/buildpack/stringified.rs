use serde::{Deserialize, Serialize};

use super::Buildpack;
use crate::{BuildpackError, Result};

/// Manifest form of a [`Buildpack`].
///
/// The build step reading `config.json` expects `skip_detect` as the string
/// `"true"` or `"false"`. An absent flag stays absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringifiedBuildpack {
    pub name: String,
    pub key: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_detect: Option<String>,
}

impl From<&Buildpack> for StringifiedBuildpack {
    fn from(buildpack: &Buildpack) -> Self {
        Self {
            name: buildpack.name.clone(),
            key: buildpack.key.clone(),
            url: buildpack.url.clone(),
            skip_detect: buildpack.skip_detect.map(|flag| flag.to_string()),
        }
    }
}

impl TryFrom<StringifiedBuildpack> for Buildpack {
    type Error = BuildpackError;

    fn try_from(stringified: StringifiedBuildpack) -> Result<Self> {
        let skip_detect = match stringified.skip_detect.as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(BuildpackError::InvalidManifest {
                    message: format!(
                        "skip_detect for {} must be \"true\" or \"false\", got {:?}",
                        stringified.name, other
                    ),
                })
            }
        };

        Ok(Buildpack {
            name: stringified.name,
            key: stringified.key,
            url: stringified.url,
            skip_detect,
        })
    }
}
