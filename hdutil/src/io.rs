use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn to_json<T: Serialize>(obj: &T) -> String {
    serde_json::to_string_pretty(obj).unwrap_or_else(|err| format!("{{\"error\": \"{}\"}}", err))
}

/// Writes pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &str, obj: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(obj)?;
    write_binary(path, contents.as_bytes())
}

pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let contents = slurp_file(path)?;
    serde_json::from_slice(&contents).with_context(|| format!("parsing {}", path))
}

pub fn write_binary(path: &str, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    fs_err::write(path, bytes)?;
    info!("Wrote {} ({} bytes)", path, bytes.len());
    Ok(())
}

pub fn slurp_file(path: &str) -> Result<Vec<u8>> {
    Ok(fs_err::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Config {
        name: String,
        speed: f64,
    }

    #[test]
    fn json_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");
        let path = path.to_str().unwrap();
        let cfg = Config {
            name: "shoreline".to_string(),
            speed: 13.89,
        };
        write_json(path, &cfg).unwrap();
        let back: Config = read_json(path).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = slurp_file("/definitely/not/here.bin").unwrap_err();
        assert!(format!("{:#}", err).contains("here.bin"));
    }
}
