/*!
Startup configuration.

All knobs come from environment variables read once at probe install:

| Variable | Effect |
|---|---|
| `PROBE_PORT` | Transport port (1-65535), default 9222 |
| `PROBE_MODE` | `native`, `computer_use`, `chrome`, or `all` |
| `PROBE_NAME_MAP` | Alias-map JSON path, default `qtmcp-names.json` |
| `PROBE_ENABLED` | `0` skips initialization entirely |

Bad values fall back to defaults with a warning rather than failing the
host application's startup.
*/

use std::path::PathBuf;

/// Which API surfaces get registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
  Native,
  ComputerUse,
  Chrome,
  #[default]
  All,
}

impl Mode {
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "native" => Some(Self::Native),
      "computer_use" => Some(Self::ComputerUse),
      "chrome" => Some(Self::Chrome),
      "all" => Some(Self::All),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Native => "native",
      Self::ComputerUse => "computer_use",
      Self::Chrome => "chrome",
      Self::All => "all",
    }
  }

  pub fn native(&self) -> bool {
    matches!(self, Self::Native | Self::All)
  }

  pub fn computer_use(&self) -> bool {
    matches!(self, Self::ComputerUse | Self::All)
  }

  pub fn chrome(&self) -> bool {
    matches!(self, Self::Chrome | Self::All)
  }
}

pub const DEFAULT_PORT: u16 = 9222;
pub const DEFAULT_NAME_MAP: &str = "qtmcp-names.json";

/// Probe configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Transport port for the WebSocket collaborator.
  pub port: u16,
  /// Which API surfaces to register.
  pub mode: Mode,
  /// Alias-map file loaded at startup and written by `qt.names.save`.
  pub name_map_path: PathBuf,
  /// False skips hook/log installation; used by embedding unit tests.
  pub enabled: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      mode: Mode::All,
      name_map_path: PathBuf::from(DEFAULT_NAME_MAP),
      enabled: true,
    }
  }
}

impl Config {
  /// Read configuration from the process environment.
  pub fn from_env() -> Self {
    let mut config = Self::default();

    if let Ok(port) = std::env::var("PROBE_PORT") {
      match port.parse::<u16>() {
        Ok(p) if p > 0 => config.port = p,
        _ => log::warn!("PROBE_PORT {port:?} is not a valid port, using {DEFAULT_PORT}"),
      }
    }

    if let Ok(mode) = std::env::var("PROBE_MODE") {
      match Mode::parse(&mode) {
        Some(m) => config.mode = m,
        None => log::warn!("PROBE_MODE {mode:?} is not a known mode, using all"),
      }
    }

    if let Ok(path) = std::env::var("PROBE_NAME_MAP") {
      if !path.is_empty() {
        config.name_map_path = PathBuf::from(path);
      }
    }

    if let Ok(enabled) = std::env::var("PROBE_ENABLED") {
      config.enabled = enabled != "0";
    }

    config
  }
}
