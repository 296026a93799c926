/*!
Semantic accessibility roles.

Roles describe what an element *is* in the UI hierarchy. Host adapters map
their toolkit's native role enumeration onto this set; everything the probe
does not recognize collapses to [`Role::Unknown`].
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Semantic role of an accessibility node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
  // === Structural / containers ===
  Window,
  Dialog,
  Group,
  Pane,
  ToolBar,
  MenuBar,
  Menu,

  // === Collections ===
  List,
  ListItem,
  Table,
  Cell,
  Tree,
  TreeItem,

  // === Interactive ===
  Button,
  Link,
  TextBox,
  CheckBox,
  RadioButton,
  ComboBox,
  Slider,
  SpinBox,
  Tab,
  MenuItem,

  // === Static content ===
  Text,
  StaticText,
  ProgressBar,
  Separator,
  Graphic,

  /// Role the host reported but the probe does not map.
  Unknown,
}

impl Role {
  /// Stable lowercase name used on the wire and for query matching.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Window => "window",
      Self::Dialog => "dialog",
      Self::Group => "group",
      Self::Pane => "pane",
      Self::ToolBar => "toolbar",
      Self::MenuBar => "menubar",
      Self::Menu => "menu",
      Self::List => "list",
      Self::ListItem => "listitem",
      Self::Table => "table",
      Self::Cell => "cell",
      Self::Tree => "tree",
      Self::TreeItem => "treeitem",
      Self::Button => "button",
      Self::Link => "link",
      Self::TextBox => "textbox",
      Self::CheckBox => "checkbox",
      Self::RadioButton => "radiobutton",
      Self::ComboBox => "combobox",
      Self::Slider => "slider",
      Self::SpinBox => "spinbox",
      Self::Tab => "tab",
      Self::MenuItem => "menuitem",
      Self::Text => "text",
      Self::StaticText => "statictext",
      Self::ProgressBar => "progressbar",
      Self::Separator => "separator",
      Self::Graphic => "graphic",
      Self::Unknown => "unknown",
    }
  }

  /// Is this an element users can click or type into?
  ///
  /// The interactive page filter omits refs for everything else.
  pub fn is_interactive(&self) -> bool {
    matches!(
      self,
      Self::Button
        | Self::Link
        | Self::TextBox
        | Self::CheckBox
        | Self::RadioButton
        | Self::ComboBox
        | Self::Slider
        | Self::SpinBox
        | Self::Tab
        | Self::MenuItem
        | Self::ListItem
        | Self::TreeItem
        | Self::Cell
    )
  }

  /// Does this role carry human-readable text worth extracting?
  pub fn is_text_bearing(&self) -> bool {
    matches!(
      self,
      Self::Text | Self::StaticText | Self::TextBox | Self::Button | Self::Link | Self::MenuItem
    )
  }

  /// Does this role typically contain other elements?
  pub fn is_container(&self) -> bool {
    matches!(
      self,
      Self::Window
        | Self::Dialog
        | Self::Group
        | Self::Pane
        | Self::ToolBar
        | Self::MenuBar
        | Self::Menu
        | Self::List
        | Self::Table
        | Self::Tree
    )
  }
}

/// Action verbs an accessibility node may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Action {
  /// Primary activation (click, press).
  Press,
  /// Flip a checkable state.
  Toggle,
  /// Show a context menu or dropdown.
  ShowMenu,
  /// Increase a value (slider, spin box).
  Increment,
  /// Decrease a value.
  Decrement,
  /// Expand a collapsed node.
  Expand,
  /// Collapse an expanded node.
  Collapse,
  /// Give keyboard focus.
  SetFocus,
}

/// Boolean state bits of an accessibility node.
///
/// Only truthy entries are serialized into the wire `states` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateFlags {
  pub focused: bool,
  pub disabled: bool,
  pub checked: bool,
  pub selected: bool,
  pub expanded: bool,
  pub readonly: bool,
}

impl StateFlags {
  /// Build the wire representation containing only truthy entries.
  /// Returns `None` when every flag is off.
  pub fn to_json(&self) -> Option<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (name, on) in [
      ("focused", self.focused),
      ("disabled", self.disabled),
      ("checked", self.checked),
      ("selected", self.selected),
      ("expanded", self.expanded),
      ("readonly", self.readonly),
    ] {
      if on {
        map.insert(name.to_owned(), serde_json::Value::Bool(true));
      }
    }
    if map.is_empty() {
      None
    } else {
      Some(serde_json::Value::Object(map))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn buttons_are_interactive_labels_are_not() {
    assert!(Role::Button.is_interactive());
    assert!(Role::ComboBox.is_interactive());
    assert!(!Role::StaticText.is_interactive());
    assert!(!Role::Group.is_interactive());
  }

  #[test]
  fn role_names_match_serde() {
    let v = serde_json::to_value(Role::RadioButton).unwrap();
    assert_eq!(v, "radiobutton");
    assert_eq!(Role::RadioButton.as_str(), "radiobutton");
  }

  #[test]
  fn states_serialize_truthy_only() {
    let states = StateFlags {
      focused: true,
      checked: true,
      ..Default::default()
    };
    let v = states.to_json().unwrap();
    assert_eq!(v, serde_json::json!({ "focused": true, "checked": true }));
    assert!(StateFlags::default().to_json().is_none());
  }
}
