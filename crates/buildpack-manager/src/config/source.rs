use std::env;
use std::path::PathBuf;

/// Reads `BUILDPACKS_*` environment variables
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get a configuration value from environment variable
    /// Converts "ca-file" to "BUILDPACKS_CA_FILE"
    pub fn get_env_config(&self, key: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        let env_var = format!("BUILDPACKS_{}", key.replace('-', "_").to_uppercase());
        env::var(env_var).ok().filter(|s| !s.is_empty())
    }

    /// Get unsigned integer value from environment variable
    pub fn get_env_u64(&self, key: &str) -> Option<u64> {
        self.get_env_config(key).and_then(|val| val.parse().ok())
    }

    /// Get a path value from environment variable
    pub fn get_env_path(&self, key: &str) -> Option<PathBuf> {
        self.get_env_config(key).map(PathBuf::from)
    }
}
