/*!
Symbolic alias map.

Process-wide mapping from client-chosen names to hierarchical paths.
Loaded once at startup from a JSON object file (`{"alias": "path", ...}`);
non-string entries are ignored with a warning. Saved back only when a
client asks.
*/

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::Mutex;

use crate::types::{ProbeError, ProbeResult};

/// Mutable alias-to-path table.
#[derive(Debug, Default)]
pub(crate) struct NameMap {
  inner: Mutex<BTreeMap<String, String>>,
}

impl NameMap {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Bind `name` to `path`. With `overwrite` false an existing binding is an
  /// error; otherwise re-registration replaces it.
  pub(crate) fn register(&self, name: &str, path: &str, overwrite: bool) -> ProbeResult<()> {
    let mut map = self.inner.lock();
    if !overwrite && map.contains_key(name) {
      return Err(ProbeError::NameExists(name.to_owned()));
    }
    map.insert(name.to_owned(), path.to_owned());
    Ok(())
  }

  pub(crate) fn unregister(&self, name: &str) -> ProbeResult<()> {
    self
      .inner
      .lock()
      .remove(name)
      .map(|_| ())
      .ok_or_else(|| ProbeError::NameNotFound(name.to_owned()))
  }

  pub(crate) fn get(&self, name: &str) -> Option<String> {
    self.inner.lock().get(name).cloned()
  }

  pub(crate) fn list(&self) -> BTreeMap<String, String> {
    self.inner.lock().clone()
  }

  /// Load aliases from a JSON object file, replacing the current table.
  /// Returns the number of accepted entries.
  pub(crate) fn load_file(&self, path: &Path) -> ProbeResult<usize> {
    let text = std::fs::read_to_string(path)
      .map_err(|e| ProbeError::NameLoadError(format!("{}: {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_str(&text)
      .map_err(|e| ProbeError::NameLoadError(format!("{}: {e}", path.display())))?;
    let serde_json::Value::Object(obj) = value else {
      return Err(ProbeError::NameLoadError(format!(
        "{}: expected a JSON object",
        path.display()
      )));
    };

    let mut accepted = BTreeMap::new();
    for (name, v) in obj {
      match v {
        serde_json::Value::String(target) => {
          accepted.insert(name, target);
        }
        _ => {
          log::warn!("name map {}: ignoring non-string entry {name:?}", path.display());
        }
      }
    }
    let count = accepted.len();
    *self.inner.lock() = accepted;
    Ok(count)
  }

  /// Startup load: missing file is fine, anything else logs and is skipped.
  pub(crate) fn load_if_exists(&self, path: &Path) -> usize {
    if !path.exists() {
      return 0;
    }
    match self.load_file(path) {
      Ok(count) => {
        log::info!("loaded {count} aliases from {}", path.display());
        count
      }
      Err(e) => {
        log::warn!("failed to load name map: {e}");
        0
      }
    }
  }

  /// Persist the current table as pretty JSON. Returns the entry count.
  pub(crate) fn save_file(&self, path: &Path) -> ProbeResult<usize> {
    let map = self.list();
    let json = serde_json::to_string_pretty(&map)
      .map_err(|e| ProbeError::Internal(format!("serializing name map: {e}")))?;
    std::fs::write(path, json)
      .map_err(|e| ProbeError::NameLoadError(format!("{}: {e}", path.display())))?;
    Ok(map.len())
  }
}
