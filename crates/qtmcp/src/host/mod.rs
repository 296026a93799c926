/*!
Host abstraction traits.

These traits define the contract between the probe core and the GUI toolkit
it is embedded into. A host adapter implements them once per toolkit; core
code only uses the traits, never toolkit types. The probe holds objects
exclusively through [`WeakObject`] handles and treats a failed upgrade as a
typed error, never as a crash.
*/

mod event;
mod image;
mod meta;

pub use event::{InputEvent, KeyModifiers, MouseButton};
pub use image::Image;
pub use meta::{
  InvokeFault, MethodAccess, MethodSpec, PropValue, PropertySpec, PropertyWriteError, SignalSpec,
};

use std::sync::{Arc, Weak};

use crate::access::{Action, Role, StateFlags};
use crate::logbuf::LogEntry;
use crate::types::{Point, Rect};

/// Strong handle to a host-owned UI object.
pub type SharedObject = Arc<dyn UiObject>;

/// Weak handle to a host-owned UI object. The probe's only long-lived grip.
pub type WeakObject = Weak<dyn UiObject>;

/// Callback invoked when a subscribed signal fires, with captured arguments.
pub type SignalSink = Arc<dyn Fn(&[PropValue]) + Send + Sync>;

/// Callback receiving redirected host log messages.
pub type LogSink = Arc<dyn Fn(LogEntry) + Send + Sync>;

/// Stable address of an object, used as a map key while it is alive.
pub fn object_addr(obj: &SharedObject) -> usize {
  Arc::as_ptr(obj).cast::<()>() as usize
}

/// RAII handle to a signal connection; dropping it disconnects.
pub struct SignalConnection {
  disconnect: Option<Box<dyn FnOnce() + Send>>,
}

impl SignalConnection {
  pub fn new(disconnect: impl FnOnce() + Send + 'static) -> Self {
    Self {
      disconnect: Some(Box::new(disconnect)),
    }
  }
}

impl Drop for SignalConnection {
  fn drop(&mut self) {
    if let Some(f) = self.disconnect.take() {
      f();
    }
  }
}

impl std::fmt::Debug for SignalConnection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SignalConnection").finish_non_exhaustive()
  }
}

/// Object lifecycle callbacks the probe hands to the host.
///
/// The host must chain behind any previously installed callbacks: the prior
/// callback runs first, then these. The added callback fires at the *start*
/// of construction, so only the pointer and the observed class name are safe
/// to read at that point.
#[derive(Clone)]
pub struct HookSink {
  pub object_added: Arc<dyn Fn(&SharedObject) + Send + Sync>,
  pub object_removed: Arc<dyn Fn(&SharedObject) + Send + Sync>,
}

impl std::fmt::Debug for HookSink {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HookSink").finish_non_exhaustive()
  }
}

/// What to capture relative to a target widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureRegion {
  /// The widget's own surface, physical pixels.
  Widget,
  /// The widget's top-level window, physical pixels.
  Window,
  /// The window scaled to logical pixels, 1:1 with mouse coordinates.
  WindowLogical,
  /// A sub-rectangle of the widget, widget-local logical coordinates.
  Region(Rect),
  /// The screen containing the widget.
  Screen,
}

/// Navigation shortcuts with a toolkit-standard key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardShortcut {
  Back,
  Forward,
}

/// Geometry and paint state of a declarative scene item.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ItemInfo {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
  pub z: f64,
  pub opacity: f64,
  pub visible: bool,
}

/// A host-owned UI object with reflective metadata.
///
/// Descriptor lists mirror the object's declared metadata; `methods` never
/// includes signals. All methods must be callable on a partially constructed
/// object without faulting, returning conservative answers.
pub trait UiObject: Send + Sync {
  /// Most-derived class name.
  fn class_name(&self) -> String;

  /// Developer-assigned display name, empty when unset.
  fn object_name(&self) -> String;

  /// Ancestor class names, most-derived parent first, ending at the root class.
  fn super_classes(&self) -> Vec<String>;

  fn parent(&self) -> Option<SharedObject>;

  /// Children in construction order.
  fn children(&self) -> Vec<SharedObject>;

  fn properties(&self) -> Vec<PropertySpec>;

  /// Read a property value; `None` when the property does not exist.
  fn read_property(&self, name: &str) -> Option<PropValue>;

  fn write_property(&self, name: &str, value: PropValue) -> Result<(), PropertyWriteError>;

  fn methods(&self) -> Vec<MethodSpec>;

  /// Invoke a method. `Ok(None)` is a void return.
  fn invoke(&self, name: &str, args: &[PropValue]) -> Result<Option<PropValue>, InvokeFault>;

  fn signals(&self) -> Vec<SignalSpec>;

  /// Connect a sink to a named signal. `None` when the signal does not exist.
  fn connect(&self, signal: &str, sink: SignalSink) -> Option<SignalConnection>;

  /// Widget view of this object, when it is widget-typed.
  fn as_widget(&self) -> Option<&dyn Widget> {
    None
  }

  /// Declarative scene-item view, when the object lives in a scene graph.
  fn as_item(&self) -> Option<&dyn Item> {
    None
  }

  /// Data-model view, when the object is a table-like model.
  fn as_model(&self) -> Option<&dyn TableModel> {
    None
  }
}

/// Widget-specific surface of a [`UiObject`].
pub trait Widget: Send + Sync {
  fn visible(&self) -> bool;

  fn enabled(&self) -> bool;

  /// Geometry in parent coordinates.
  fn geometry(&self) -> Rect;

  /// Map a widget-local point to global (screen) coordinates.
  fn map_to_global(&self, local: Point) -> Point;

  fn has_focus(&self) -> bool;

  fn is_window(&self) -> bool;

  /// Title of the widget when it is a window.
  fn window_title(&self) -> Option<String> {
    None
  }

  /// Geometry in global coordinates.
  fn global_geometry(&self) -> Rect {
    let origin = self.map_to_global(Point::new(0.0, 0.0));
    let size = self.geometry().size();
    Rect::new(origin.x, origin.y, size.width, size.height)
  }
}

/// Declarative scene-item surface of a [`UiObject`].
pub trait Item: Send + Sync {
  /// Current geometry and paint state of the item.
  fn item_info(&self) -> ItemInfo;
}

/// Accessibility facade over a UI element.
///
/// Interface methods that a node does not support return `false`/`None`
/// rather than erroring; the probe turns exhausted strategies into typed
/// errors itself.
pub trait Accessible: Send + Sync {
  /// False once the underlying element is gone; resolving such a ref fails.
  fn is_valid(&self) -> bool;

  fn object(&self) -> WeakObject;

  fn role(&self) -> Role;

  fn name(&self) -> Option<String>;

  fn description(&self) -> Option<String> {
    None
  }

  fn states(&self) -> StateFlags;

  fn visible(&self) -> bool;

  /// Bounds in global coordinates.
  fn bounds(&self) -> Option<Rect>;

  fn child_count(&self) -> usize;

  fn child(&self, index: usize) -> Option<Arc<dyn Accessible>>;

  fn actions(&self) -> Vec<Action>;

  /// Perform an action; false when unsupported or refused.
  fn perform(&self, action: Action) -> bool;

  /// Current text content for text-bearing nodes.
  fn text(&self) -> Option<String> {
    None
  }

  fn numeric_value(&self) -> Option<f64> {
    None
  }

  fn set_numeric_value(&self, _value: f64) -> bool {
    false
  }

  /// Replace the full text through the editable-text interface.
  fn replace_text(&self, _text: &str) -> bool {
    false
  }

  /// Set a string through the value interface (distinct from editable text).
  fn set_value_string(&self, _text: &str) -> bool {
    false
  }

  /// Option labels for choice widgets, in presentation order.
  fn option_texts(&self) -> Vec<String> {
    Vec::new()
  }

  /// Select the option at `index`; false when unsupported.
  fn select_option(&self, _index: usize) -> bool {
    false
  }

  /// Whether free-form text entry is allowed on a choice widget.
  fn editable(&self) -> bool {
    false
  }
}

/// Table-like data model surface of a [`UiObject`].
pub trait TableModel: Send + Sync {
  fn row_count(&self) -> usize;

  fn column_count(&self) -> usize;

  /// Known role names, `display` first.
  fn roles(&self) -> Vec<String>;

  fn cell(&self, row: usize, column: usize, role: &str) -> Option<PropValue>;
}

/// Process-global host operations.
pub trait Host: Send + Sync {
  /// Human-readable toolkit name and version.
  fn toolkit_version(&self) -> String;

  /// Top-level root objects, in creation order.
  fn roots(&self) -> Vec<SharedObject>;

  fn active_window(&self) -> Option<SharedObject>;

  fn focused_object(&self) -> Option<SharedObject>;

  /// Install lifecycle hooks, chaining behind any already installed.
  fn install_hooks(&self, sink: HookSink);

  /// Redirect host log output into the sink. False when unsupported.
  fn install_log_capture(&self, sink: LogSink) -> bool;

  /// Accessibility facade for an object, when one exists.
  fn accessible(&self, object: &SharedObject) -> Option<Arc<dyn Accessible>>;

  /// Post a synthetic input event to a widget. False when delivery failed.
  fn post_input(&self, target: &SharedObject, event: InputEvent) -> bool;

  /// Flush pending UI events; used between steps of synthesized sequences.
  fn process_events(&self);

  fn cursor_position(&self) -> Point;

  fn screen_geometry(&self) -> Rect;

  fn device_pixel_ratio(&self) -> f64;

  /// Capture pixels for a region of the target widget.
  fn capture(&self, target: &SharedObject, region: CaptureRegion) -> Option<Image>;

  /// Trigger a standard-shortcut action in the active window.
  fn trigger_shortcut(&self, shortcut: StandardShortcut) -> bool;

  /// Whether the toolkit exposes a declarative scene graph at all.
  fn supports_scene_items(&self) -> bool {
    false
  }
}
