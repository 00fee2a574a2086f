//! JSON, YAML and TOML file helpers

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

pub fn json_load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write `data` as pretty JSON (4-space indent).
pub fn json_dump<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    data.serialize(&mut ser)?;
    std::fs::write(path, out)?;
    Ok(())
}

/// Append a record to a JSON array file.
///
/// A missing or empty file becomes `[data]`. A file holding a single object
/// is turned into an array first. Anything else is rejected.
pub fn json_append<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    let is_empty = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    if is_empty {
        return json_dump(&[data], path);
    }

    let mut file = std::fs::OpenOptions::new().read(true).write(true).open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    let record = serde_json::to_value(data)?;
    let existing: serde_json::Value = serde_json::from_str(&content)
        .map_err(|_| Error::invalid(format!("cannot parse '{}' as JSON", path.display())))?;
    let records = match existing {
        serde_json::Value::Array(mut items) => {
            items.push(record);
            serde_json::Value::Array(items)
        }
        obj @ serde_json::Value::Object(_) => serde_json::Value::Array(vec![obj, record]),
        _ => {
            return Err(Error::invalid(format!(
                "cannot parse '{}' as JSON",
                path.display()
            )));
        }
    };

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut file, formatter);
    records.serialize(&mut ser)?;
    file.write_all(b"\n")?;
    Ok(())
}

pub fn yaml_load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn yaml_dump<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    std::fs::write(path, serde_yaml::to_string(data)?)?;
    Ok(())
}

pub fn toml_load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Write `data` as TOML and return the written text.
pub fn toml_dump<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<String> {
    let text = toml::to_string(data)?;
    std::fs::write(path, &text)?;
    Ok(text)
}
