/*!
Key name lookup and combo parsing.

Accepts both xdotool-style names (`Return`, `Prior`, `Control_L`) and
chrome-style names (`Enter`, `ArrowUp`), case-insensitively. A combo is
`+`-separated: every token but the last must be a modifier, the last is
the key. Key code values follow the host toolkit's key enumeration.
*/

use crate::host::KeyModifiers;
use crate::types::{ProbeError, ProbeResult};

/// Key codes for non-printing keys. Printable keys use their uppercase
/// Unicode code point.
pub(crate) mod keys {
  pub(crate) const ESCAPE: u32 = 0x0100_0000;
  pub(crate) const TAB: u32 = 0x0100_0001;
  pub(crate) const BACKSPACE: u32 = 0x0100_0003;
  pub(crate) const RETURN: u32 = 0x0100_0004;
  pub(crate) const INSERT: u32 = 0x0100_0006;
  pub(crate) const DELETE: u32 = 0x0100_0007;
  pub(crate) const HOME: u32 = 0x0100_0010;
  pub(crate) const END: u32 = 0x0100_0011;
  pub(crate) const LEFT: u32 = 0x0100_0012;
  pub(crate) const UP: u32 = 0x0100_0013;
  pub(crate) const RIGHT: u32 = 0x0100_0014;
  pub(crate) const DOWN: u32 = 0x0100_0015;
  pub(crate) const PAGE_UP: u32 = 0x0100_0016;
  pub(crate) const PAGE_DOWN: u32 = 0x0100_0017;
  pub(crate) const SHIFT: u32 = 0x0100_0020;
  pub(crate) const CONTROL: u32 = 0x0100_0021;
  pub(crate) const META: u32 = 0x0100_0022;
  pub(crate) const ALT: u32 = 0x0100_0023;
  pub(crate) const F1: u32 = 0x0100_0030;
  pub(crate) const SPACE: u32 = 0x20;
}

/// Named special keys. Both naming conventions map to the same codes.
const NAMED: &[(&str, u32)] = &[
  ("return", keys::RETURN),
  ("enter", keys::RETURN),
  ("escape", keys::ESCAPE),
  ("esc", keys::ESCAPE),
  ("tab", keys::TAB),
  ("backspace", keys::BACKSPACE),
  ("delete", keys::DELETE),
  ("del", keys::DELETE),
  ("insert", keys::INSERT),
  ("home", keys::HOME),
  ("end", keys::END),
  ("prior", keys::PAGE_UP),
  ("pageup", keys::PAGE_UP),
  ("page_up", keys::PAGE_UP),
  ("next", keys::PAGE_DOWN),
  ("pagedown", keys::PAGE_DOWN),
  ("page_down", keys::PAGE_DOWN),
  ("up", keys::UP),
  ("arrowup", keys::UP),
  ("down", keys::DOWN),
  ("arrowdown", keys::DOWN),
  ("left", keys::LEFT),
  ("arrowleft", keys::LEFT),
  ("right", keys::RIGHT),
  ("arrowright", keys::RIGHT),
  ("space", keys::SPACE),
  ("plus", '+' as u32),
  ("minus", '-' as u32),
  ("equal", '=' as u32),
  ("comma", ',' as u32),
  ("period", '.' as u32),
  ("slash", '/' as u32),
  ("backslash", '\\' as u32),
  ("semicolon", ';' as u32),
  ("apostrophe", '\'' as u32),
  ("grave", '`' as u32),
  ("shift", keys::SHIFT),
  ("shift_l", keys::SHIFT),
  ("shift_r", keys::SHIFT),
  ("control", keys::CONTROL),
  ("control_l", keys::CONTROL),
  ("control_r", keys::CONTROL),
  ("ctrl", keys::CONTROL),
  ("alt", keys::ALT),
  ("alt_l", keys::ALT),
  ("alt_r", keys::ALT),
  ("meta", keys::META),
  ("meta_l", keys::META),
  ("super", keys::META),
  ("super_l", keys::META),
  ("cmd", keys::META),
];

/// Look up a key name. Single characters map to their uppercase code
/// point; `F1`-`F12` map to function key codes.
pub(crate) fn key_code(name: &str) -> Option<u32> {
  let lower = name.to_lowercase();

  if let Some((_, code)) = NAMED.iter().find(|(n, _)| *n == lower) {
    return Some(*code);
  }

  if let Some(rest) = lower.strip_prefix('f') {
    if let Ok(n) = rest.parse::<u32>() {
      if (1..=12).contains(&n) {
        return Some(keys::F1 + n - 1);
      }
    }
  }

  let mut chars = name.chars();
  if let (Some(c), None) = (chars.next(), chars.next()) {
    return Some(c.to_ascii_uppercase() as u32);
  }
  None
}

/// Parse a `+`-separated key combo like `ctrl+shift+s`.
///
/// All tokens but the last must be modifiers; the last token is the key.
/// A trailing `+` means the plus key itself (`ctrl++`).
pub(crate) fn parse_combo(combo: &str) -> ProbeResult<(KeyModifiers, u32)> {
  if combo.is_empty() {
    return Err(ProbeError::KeyParse(combo.to_owned()));
  }

  let mut tokens: Vec<&str> = combo.split('+').collect();
  // `ctrl++` splits to ["ctrl", "", ""]: the empty tail is the plus key.
  if tokens.len() >= 2 && tokens[tokens.len() - 1].is_empty() && tokens[tokens.len() - 2].is_empty()
  {
    tokens.truncate(tokens.len() - 2);
    tokens.push("plus");
  }

  let (last, modifiers) = tokens
    .split_last()
    .ok_or_else(|| ProbeError::KeyParse(combo.to_owned()))?;

  let mut mods = KeyModifiers::NONE;
  for token in modifiers {
    match token.to_lowercase().as_str() {
      "ctrl" | "control" => mods.ctrl = true,
      "shift" => mods.shift = true,
      "alt" => mods.alt = true,
      "meta" | "super" | "cmd" => mods.meta = true,
      _ => return Err(ProbeError::KeyParse((*token).to_owned())),
    }
  }

  let code = key_code(last).ok_or_else(|| ProbeError::KeyParse((*last).to_owned()))?;
  Ok((mods, code))
}
