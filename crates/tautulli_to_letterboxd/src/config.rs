use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "HOST", alias = "Host")]
    host: Option<HostSection>,
    #[serde(alias = "AUTH", alias = "Auth")]
    auth: Option<AuthSection>,
}

#[derive(Debug, Deserialize)]
struct HostSection {
    #[serde(alias = "BASE_URL")]
    base_url: Option<String>,
}

#[derive(Deserialize)]
struct AuthSection {
    #[serde(alias = "TOKEN")]
    token: Option<String>,
}

impl std::fmt::Debug for AuthSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSection").field("token", &"[REDACTED]").finish()
    }
}

pub struct ServerConfig {
    pub base_url: String,
    pub token: SecretString,
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        let raw: RawConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        let base_url = raw
            .host
            .and_then(|host| host.base_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .with_context(|| format!("[HOST] base_url missing from {}", path.display()))?;
        let token = raw
            .auth
            .and_then(|auth| auth.token)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .with_context(|| format!("[AUTH] token missing from {}", path.display()))?;

        Ok(Self {
            base_url,
            token: SecretString::new(token),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_host_and_auth_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(
            &path,
            "[HOST]\nbase_url = http://tautulli.local:8181\n\n[AUTH]\ntoken = abc123\n",
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://tautulli.local:8181");
        assert_eq!(config.token.expose_secret(), "abc123");
    }

    #[test]
    fn missing_token_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[HOST]\nbase_url = http://tautulli.local:8181\n").unwrap();

        let err = ServerConfig::load(&path).err().unwrap();
        assert!(err.to_string().contains("[AUTH] token"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = ServerConfig::load(&dir.path().join("nope.ini")).err().unwrap();
        assert!(err.to_string().contains("config file not found"));
    }
}
