use std::env;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

pub fn read_text_file(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Reads a file that may legitimately be absent.
pub fn read_text_file_if_exists(path: &Path) -> io::Result<Option<String>> {
    match read_text_file(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn home_dir() -> io::Result<PathBuf> {
    env::var_os("HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "HOME is not set"))
}

pub fn default_config_file_path() -> io::Result<PathBuf> {
    Ok(home_dir()?.join(".prompt-guide").join("config.toml"))
}

/// Expands a leading `~` or `~/`. Paths that need a missing `HOME` are left as-is.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };
    match (rest, home_dir()) {
        (Some(rest), Ok(home)) if rest.is_empty() => home,
        (Some(rest), Ok(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

pub fn merge_config_with_user_overrides(
    default_text: &str,
    override_text: Option<&str>,
) -> io::Result<toml::Value> {
    let mut merged = parse_toml_table(default_text)?;
    let override_value = parse_toml_table(override_text.unwrap_or_default())?;
    merge_toml_tables(&mut merged, override_value);
    Ok(merged)
}

fn parse_toml_table(text: &str) -> io::Result<toml::Value> {
    if text.trim().is_empty() {
        return Ok(toml::Value::Table(toml::map::Map::new()));
    }
    toml::from_str(text).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn merge_toml_tables(base: &mut toml::Value, override_value: toml::Value) {
    match (base, override_value) {
        (toml::Value::Table(base_map), toml::Value::Table(override_map)) => {
            for (key, override_item) in override_map {
                if let Some(base_item) = base_map.get_mut(&key) {
                    merge_toml_tables(base_item, override_item);
                } else {
                    base_map.insert(key, override_item);
                }
            }
        }
        (base_slot, override_item) => {
            *base_slot = override_item;
        }
    }
}
