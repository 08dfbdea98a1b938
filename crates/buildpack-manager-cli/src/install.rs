//! Install command - stage buildpacks into a directory.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use buildpack_manager::{
    BuildpackManager, BuildpackSource, ConfigLoader, HttpClient, HttpFetch, InstallerConfig,
    MANIFEST_FILE,
};

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Directory receiving the staged buildpacks [env: BUILDPACKS_DIR]
    #[arg(short = 'd', long)]
    pub buildpacks_dir: Option<PathBuf>,

    /// Buildpack list as JSON [env: BUILDPACKS_JSON]
    #[arg(long, conflicts_with = "buildpacks_file")]
    pub buildpacks: Option<String>,

    /// File containing the buildpack list [env: BUILDPACKS_FILE]
    #[arg(short = 'f', long)]
    pub buildpacks_file: Option<PathBuf>,

    /// PEM bundle trusted by the primary client [env: BUILDPACKS_CA_FILE]
    #[arg(long)]
    pub ca_file: Option<PathBuf>,

    /// Proxy for the primary client [env: BUILDPACKS_PROXY]
    #[arg(long)]
    pub proxy: Option<String>,

    /// Request timeout in seconds [env: BUILDPACKS_TIMEOUT]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Ignore BUILDPACKS_* environment variables
    #[arg(long)]
    pub no_env: bool,

    /// Do not output any message
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Merge flags over the environment (flags take precedence)
fn build_config(args: &InstallArgs) -> InstallerConfig {
    let mut config = InstallerConfig::from_env(&ConfigLoader::new(!args.no_env));

    if let Some(dir) = &args.buildpacks_dir {
        config.buildpacks_dir = Some(dir.clone());
    }
    if let Some(json) = &args.buildpacks {
        config.source = Some(BuildpackSource::Inline(json.clone()));
    } else if let Some(file) = &args.buildpacks_file {
        config.source = Some(BuildpackSource::File(file.clone()));
    }
    if let Some(ca_file) = &args.ca_file {
        config.ca_file = Some(ca_file.clone());
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(timeout) = args.timeout {
        config.timeout = Some(Duration::from_secs(timeout));
    }

    config
}

pub async fn execute(args: InstallArgs) -> Result<i32> {
    let config = build_config(&args);

    let buildpacks_dir = config.buildpacks_dir()?;
    let buildpacks_json = config.buildpacks_json()?;
    log::debug!("Staging configuration: {:?}", config);

    let primary: Arc<dyn HttpFetch> = Arc::new(
        HttpClient::with_config(config.primary_http_config())
            .context("Failed to create primary HTTP client")?,
    );
    let fallback: Arc<dyn HttpFetch> = Arc::new(
        HttpClient::with_config(config.fallback_http_config())
            .context("Failed to create default HTTP client")?,
    );

    let manager = BuildpackManager::new(primary, fallback, &buildpacks_dir, buildpacks_json);
    let staged = manager
        .install()
        .await
        .with_context(|| format!("Failed to install buildpacks into {}", buildpacks_dir.display()))?;

    if !args.quiet {
        for entry in &staged {
            println!(
                "  - Staged {} into {}",
                style(&entry.buildpack.name).green(),
                entry.path.display()
            );
        }
        println!(
            "{} {} buildpacks, manifest written to {}",
            style("Installed").green().bold(),
            staged.len(),
            buildpacks_dir.join(MANIFEST_FILE).display()
        );
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_build_config() {
        let args = InstallArgs {
            buildpacks_dir: Some(PathBuf::from("/staging/buildpacks")),
            buildpacks: Some("[]".to_string()),
            ca_file: Some(PathBuf::from("/certs/ca.crt")),
            timeout: Some(30),
            no_env: true,
            ..Default::default()
        };

        let config = build_config(&args);

        assert_eq!(config.buildpacks_dir, Some(PathBuf::from("/staging/buildpacks")));
        assert_eq!(config.source, Some(BuildpackSource::Inline("[]".to_string())));
        assert_eq!(config.ca_file, Some(PathBuf::from("/certs/ca.crt")));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_buildpacks_file_flag() {
        let args = InstallArgs {
            buildpacks_file: Some(PathBuf::from("buildpacks.json")),
            no_env: true,
            ..Default::default()
        };

        let config = build_config(&args);
        assert_eq!(config.source, Some(BuildpackSource::File(PathBuf::from("buildpacks.json"))));
    }

    #[tokio::test]
    async fn test_execute_empty_list() {
        let temp = TempDir::new().unwrap();
        let args = InstallArgs {
            buildpacks_dir: Some(temp.path().to_path_buf()),
            buildpacks: Some("[]".to_string()),
            no_env: true,
            quiet: true,
            ..Default::default()
        };

        assert_eq!(execute(args).await.unwrap(), 0);
        assert!(temp.path().join(MANIFEST_FILE).is_file());
    }

    #[tokio::test]
    async fn test_execute_without_dir_fails() {
        let args = InstallArgs {
            buildpacks: Some("[]".to_string()),
            no_env: true,
            ..Default::default()
        };

        let err = execute(args).await.unwrap_err();
        assert!(err.to_string().contains("BUILDPACKS_DIR"));
    }
}
