/*!
Simulated host toolkit for tests.

A small in-memory widget tree implementing the full `host` trait set:
reflective properties and methods, signals, accessibility facades, input
delivery with observable side effects, and capture. Deterministic and
synchronous so tests can drive every probe subsystem without a real GUI.
*/

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::access::{Action, Role, StateFlags};
use crate::config::Config;
use crate::host::{
  object_addr, Accessible, CaptureRegion, Host, HookSink, Image, InputEvent, InvokeFault, ItemInfo,
  LogSink, MethodAccess, MethodSpec, PropValue, PropertySpec, PropertyWriteError, SharedObject,
  SignalConnection, SignalSink, SignalSpec, StandardShortcut, UiObject, WeakObject, Widget,
};
use crate::logbuf::{LogEntry, Severity};
use crate::probe::Probe;
use crate::types::{Point, Rect};

const DPR: f64 = 2.0;

// === Simulated object ===

#[derive(Default)]
struct SimModel {
  rows: usize,
  cols: usize,
  roles: Vec<String>,
}

struct SimState {
  class_name: String,
  object_name: String,
  supers: Vec<String>,
  parent: Option<Weak<SimObject>>,
  children: Vec<Arc<SimObject>>,
  props: BTreeMap<String, PropValue>,
  prop_specs: Vec<PropertySpec>,
  methods: Vec<MethodSpec>,
  signals: Vec<SignalSpec>,
  listeners: HashMap<String, Vec<(u64, SignalSink)>>,
  next_listener: u64,
  role: Role,
  visible: bool,
  enabled: bool,
  focused: bool,
  checked: bool,
  geometry: Rect,
  options: Vec<String>,
  selected_option: usize,
  numeric: Option<(f64, f64, f64)>,
  editable: bool,
  is_widget: bool,
  is_window: bool,
  window_title: String,
  model: Option<SimModel>,
  scene_item: bool,
}

impl SimState {
  fn blank(class_name: &str, role: Role) -> Self {
    Self {
      class_name: class_name.to_owned(),
      object_name: String::new(),
      supers: vec!["Widget".into(), "Object".into()],
      parent: None,
      children: Vec::new(),
      props: BTreeMap::new(),
      prop_specs: vec![
        PropertySpec::read_only("className", "string"),
        PropertySpec::plain("objectName", "string"),
        PropertySpec::plain("visible", "bool"),
        PropertySpec::plain("enabled", "bool"),
        PropertySpec::plain("geometry", "rect"),
      ],
      methods: Vec::new(),
      signals: Vec::new(),
      listeners: HashMap::new(),
      next_listener: 1,
      role,
      visible: true,
      enabled: true,
      focused: false,
      checked: false,
      geometry: Rect::new(0.0, 0.0, 100.0, 30.0),
      options: Vec::new(),
      selected_option: 0,
      numeric: None,
      editable: false,
      is_widget: true,
      is_window: false,
      window_title: String::new(),
      model: None,
      scene_item: false,
    }
  }
}

/// One simulated UI object.
pub(crate) struct SimObject {
  state: Mutex<SimState>,
  self_weak: Weak<SimObject>,
}

impl SimObject {
  fn new(state: SimState) -> Arc<Self> {
    Arc::new_cyclic(|w| Self {
      state: Mutex::new(state),
      self_weak: w.clone(),
    })
  }

  fn emit(&self, signal: &str, args: &[PropValue]) {
    let sinks: Vec<SignalSink> = {
      let state = self.state.lock();
      state
        .listeners
        .get(signal)
        .map(|v| v.iter().map(|(_, s)| s.clone()).collect())
        .unwrap_or_default()
    };
    for sink in sinks {
      sink(args);
    }
  }

  fn set_text(&self, text: &str) {
    {
      let mut state = self.state.lock();
      state.props.insert("text".into(), PropValue::Str(text.into()));
    }
    self.emit("textChanged", &[PropValue::Str(text.into())]);
  }

  fn text(&self) -> Option<String> {
    self
      .state
      .lock()
      .props
      .get("text")
      .and_then(|v| v.as_str().map(str::to_owned))
  }
}

impl crate::host::UiObject for SimObject {
  fn class_name(&self) -> String {
    self.state.lock().class_name.clone()
  }

  fn object_name(&self) -> String {
    self.state.lock().object_name.clone()
  }

  fn super_classes(&self) -> Vec<String> {
    self.state.lock().supers.clone()
  }

  fn parent(&self) -> Option<SharedObject> {
    let parent = self.state.lock().parent.clone();
    parent.and_then(|w| w.upgrade()).map(|a| a as SharedObject)
  }

  fn children(&self) -> Vec<SharedObject> {
    self
      .state
      .lock()
      .children
      .iter()
      .map(|c| Arc::clone(c) as SharedObject)
      .collect()
  }

  fn properties(&self) -> Vec<PropertySpec> {
    self.state.lock().prop_specs.clone()
  }

  fn read_property(&self, name: &str) -> Option<PropValue> {
    let state = self.state.lock();
    match name {
      "className" => Some(PropValue::Str(state.class_name.clone())),
      "objectName" => Some(PropValue::Str(state.object_name.clone())),
      "visible" => Some(PropValue::Bool(state.visible)),
      "enabled" => Some(PropValue::Bool(state.enabled)),
      "geometry" => Some(PropValue::Rect(state.geometry)),
      "windowTitle" if state.is_window => Some(PropValue::Str(state.window_title.clone())),
      other => state.props.get(other).cloned(),
    }
  }

  fn write_property(&self, name: &str, value: PropValue) -> Result<(), PropertyWriteError> {
    let spec = {
      let state = self.state.lock();
      state.prop_specs.iter().find(|p| p.name == name).cloned()
    };
    let spec = spec.ok_or(PropertyWriteError::NotFound)?;
    if !spec.writable {
      return Err(PropertyWriteError::ReadOnly);
    }

    match (name, &value) {
      ("objectName", PropValue::Str(s)) => {
        self.state.lock().object_name = s.clone();
        Ok(())
      }
      ("visible", PropValue::Bool(b)) => {
        self.state.lock().visible = *b;
        Ok(())
      }
      ("enabled", PropValue::Bool(b)) => {
        self.state.lock().enabled = *b;
        Ok(())
      }
      ("geometry", PropValue::Rect(r)) => {
        self.state.lock().geometry = *r;
        Ok(())
      }
      ("text", PropValue::Str(s)) => {
        self.set_text(s);
        Ok(())
      }
      ("value", v) => {
        let number = v.as_f64().ok_or(PropertyWriteError::TypeMismatch)?;
        let mut state = self.state.lock();
        if let Some((_, min, max)) = state.numeric {
          state.numeric = Some((number.clamp(min, max), min, max));
          drop(state);
          self.emit("valueChanged", &[PropValue::Float(number)]);
          Ok(())
        } else {
          Err(PropertyWriteError::TypeMismatch)
        }
      }
      _ => {
        let mut state = self.state.lock();
        if value.type_name() != spec.type_name {
          return Err(PropertyWriteError::TypeMismatch);
        }
        state.props.insert(name.to_owned(), value);
        Ok(())
      }
    }
  }

  fn methods(&self) -> Vec<MethodSpec> {
    self.state.lock().methods.clone()
  }

  fn invoke(&self, name: &str, args: &[PropValue]) -> Result<Option<PropValue>, InvokeFault> {
    let known = {
      let state = self.state.lock();
      state.methods.iter().any(|m| m.name == name)
    };
    if !known {
      return Err(InvokeFault::NotFound);
    }
    match (name, args) {
      ("setText", [PropValue::Str(s)]) => {
        self.set_text(s);
        Ok(None)
      }
      ("text", []) => Ok(Some(PropValue::Str(self.text().unwrap_or_default()))),
      ("click", []) => {
        self.emit("clicked", &[]);
        Ok(None)
      }
      ("setValue", [v]) => {
        let number = v
          .as_f64()
          .ok_or_else(|| InvokeFault::ArgumentMismatch("expected a number".into()))?;
        self
          .write_property("value", PropValue::Float(number))
          .map_err(|_| InvokeFault::Failed("no value on this object".into()))?;
        Ok(None)
      }
      _ => Err(InvokeFault::ArgumentMismatch(format!(
        "{name} does not take {} argument(s)",
        args.len()
      ))),
    }
  }

  fn signals(&self) -> Vec<SignalSpec> {
    self.state.lock().signals.clone()
  }

  fn connect(&self, signal: &str, sink: SignalSink) -> Option<SignalConnection> {
    let mut state = self.state.lock();
    if !state.signals.iter().any(|s| s.name == signal) {
      return None;
    }
    let id = state.next_listener;
    state.next_listener += 1;
    state
      .listeners
      .entry(signal.to_owned())
      .or_default()
      .push((id, sink));
    drop(state);

    let target = self.self_weak.clone();
    let signal = signal.to_owned();
    Some(SignalConnection::new(move || {
      if let Some(obj) = target.upgrade() {
        let mut state = obj.state.lock();
        if let Some(listeners) = state.listeners.get_mut(&signal) {
          listeners.retain(|(lid, _)| *lid != id);
        }
      }
    }))
  }

  fn as_widget(&self) -> Option<&dyn Widget> {
    if self.state.lock().is_widget {
      Some(self)
    } else {
      None
    }
  }

  fn as_item(&self) -> Option<&dyn crate::host::Item> {
    if self.state.lock().scene_item {
      Some(self)
    } else {
      None
    }
  }

  fn as_model(&self) -> Option<&dyn crate::host::TableModel> {
    if self.state.lock().model.is_some() {
      Some(self)
    } else {
      None
    }
  }
}

impl crate::host::Item for SimObject {
  fn item_info(&self) -> ItemInfo {
    let state = self.state.lock();
    ItemInfo {
      x: state.geometry.x,
      y: state.geometry.y,
      width: state.geometry.width,
      height: state.geometry.height,
      z: 0.0,
      opacity: 1.0,
      visible: state.visible,
    }
  }
}

impl Widget for SimObject {
  fn visible(&self) -> bool {
    self.state.lock().visible
  }

  fn enabled(&self) -> bool {
    self.state.lock().enabled
  }

  fn geometry(&self) -> Rect {
    self.state.lock().geometry
  }

  fn map_to_global(&self, local: Point) -> Point {
    let (origin, parent) = {
      let state = self.state.lock();
      (state.geometry, state.parent.clone().and_then(|w| w.upgrade()))
    };
    let here = Point::new(local.x + origin.x, local.y + origin.y);
    match parent {
      Some(p) => p.map_to_global(here),
      None => here,
    }
  }

  fn has_focus(&self) -> bool {
    self.state.lock().focused
  }

  fn is_window(&self) -> bool {
    self.state.lock().is_window
  }

  fn window_title(&self) -> Option<String> {
    let state = self.state.lock();
    if state.is_window {
      Some(state.window_title.clone())
    } else {
      None
    }
  }
}

impl crate::host::TableModel for SimObject {
  fn row_count(&self) -> usize {
    self.state.lock().model.as_ref().map_or(0, |m| m.rows)
  }

  fn column_count(&self) -> usize {
    self.state.lock().model.as_ref().map_or(0, |m| m.cols)
  }

  fn roles(&self) -> Vec<String> {
    self
      .state
      .lock()
      .model
      .as_ref()
      .map(|m| m.roles.clone())
      .unwrap_or_default()
  }

  fn cell(&self, row: usize, column: usize, role: &str) -> Option<PropValue> {
    match role {
      "display" => Some(PropValue::Str(format!("r{row}c{column}"))),
      "tooltip" => Some(PropValue::Str(format!("cell {row},{column}"))),
      _ => None,
    }
  }
}

// === Accessibility facade ===

struct SimAccessible {
  object: Weak<SimObject>,
}

impl SimAccessible {
  fn with<R>(&self, f: impl FnOnce(&Arc<SimObject>) -> R) -> Option<R> {
    self.object.upgrade().map(|o| f(&o))
  }
}

impl Accessible for SimAccessible {
  fn is_valid(&self) -> bool {
    self.object.strong_count() > 0
  }

  fn object(&self) -> WeakObject {
    let weak: WeakObject = self.object.clone();
    weak
  }

  fn role(&self) -> Role {
    self.with(|o| o.state.lock().role).unwrap_or(Role::Unknown)
  }

  fn name(&self) -> Option<String> {
    self.with(|o| {
      o.text().or_else(|| {
        let name = o.state.lock().object_name.clone();
        if name.is_empty() {
          None
        } else {
          Some(name)
        }
      })
    })?
  }

  fn states(&self) -> StateFlags {
    self
      .with(|o| {
        let state = o.state.lock();
        StateFlags {
          focused: state.focused,
          disabled: !state.enabled,
          checked: state.checked,
          selected: false,
          expanded: false,
          readonly: false,
        }
      })
      .unwrap_or_default()
  }

  fn visible(&self) -> bool {
    self.with(|o| o.state.lock().visible).unwrap_or(false)
  }

  fn bounds(&self) -> Option<Rect> {
    self.with(|o| {
      let size = o.state.lock().geometry.size();
      let origin = o.map_to_global(Point::new(0.0, 0.0));
      Rect::new(origin.x, origin.y, size.width, size.height)
    })
  }

  fn child_count(&self) -> usize {
    self.with(|o| o.state.lock().children.len()).unwrap_or(0)
  }

  fn child(&self, index: usize) -> Option<Arc<dyn Accessible>> {
    self.with(|o| {
      let state = o.state.lock();
      state.children.get(index).map(|c| {
        Arc::new(SimAccessible {
          object: Arc::downgrade(c),
        }) as Arc<dyn Accessible>
      })
    })?
  }

  fn actions(&self) -> Vec<Action> {
    match self.role() {
      Role::Button | Role::MenuItem | Role::Tab | Role::Link => vec![Action::Press],
      Role::CheckBox | Role::RadioButton => vec![Action::Press, Action::Toggle],
      Role::ComboBox => vec![Action::Press, Action::ShowMenu],
      Role::Slider | Role::SpinBox => vec![Action::Increment, Action::Decrement],
      Role::TextBox => vec![Action::SetFocus],
      _ => Vec::new(),
    }
  }

  fn perform(&self, action: Action) -> bool {
    let Some(obj) = self.object.upgrade() else {
      return false;
    };
    match action {
      Action::Press => {
        let role = obj.state.lock().role;
        match role {
          Role::Button | Role::MenuItem | Role::Tab | Role::Link => {
            obj.emit("clicked", &[]);
            true
          }
          Role::CheckBox | Role::RadioButton => {
            self.perform(Action::Toggle);
            true
          }
          _ => false,
        }
      }
      Action::Toggle => {
        let now = {
          let mut state = obj.state.lock();
          state.checked = !state.checked;
          state.checked
        };
        obj.emit("toggled", &[PropValue::Bool(now)]);
        true
      }
      Action::SetFocus => {
        obj.state.lock().focused = true;
        true
      }
      Action::Increment | Action::Decrement | Action::ShowMenu | Action::Expand
      | Action::Collapse => false,
    }
  }

  fn text(&self) -> Option<String> {
    self.with(|o| o.text())?
  }

  fn numeric_value(&self) -> Option<f64> {
    self.with(|o| o.state.lock().numeric.map(|(v, _, _)| v))?
  }

  fn set_numeric_value(&self, value: f64) -> bool {
    let Some(obj) = self.object.upgrade() else {
      return false;
    };
    obj.write_property("value", PropValue::Float(value)).is_ok()
  }

  fn replace_text(&self, text: &str) -> bool {
    let Some(obj) = self.object.upgrade() else {
      return false;
    };
    let accepts = {
      let state = obj.state.lock();
      state.role == Role::TextBox || (state.role == Role::ComboBox && state.editable)
    };
    if accepts {
      obj.set_text(text);
    }
    accepts
  }

  fn option_texts(&self) -> Vec<String> {
    self
      .with(|o| o.state.lock().options.clone())
      .unwrap_or_default()
  }

  fn select_option(&self, index: usize) -> bool {
    let Some(obj) = self.object.upgrade() else {
      return false;
    };
    let label = {
      let mut state = obj.state.lock();
      let Some(label) = state.options.get(index).cloned() else {
        return false;
      };
      state.selected_option = index;
      label
    };
    obj.set_text(&label);
    obj.emit("currentIndexChanged", &[PropValue::Int(index as i64)]);
    true
  }

  fn editable(&self) -> bool {
    self.with(|o| o.state.lock().editable).unwrap_or(false)
  }
}

// === Simulated host ===

pub(crate) struct SimHost {
  roots: Mutex<Vec<Arc<SimObject>>>,
  by_addr: Mutex<HashMap<usize, Arc<SimObject>>>,
  hooks: Mutex<Option<HookSink>>,
  log_sink: Mutex<Option<LogSink>>,
  events: Mutex<Vec<(String, InputEvent)>>,
  back_enabled: AtomicBool,
  forward_enabled: AtomicBool,
  cursor: Mutex<Point>,
}

impl SimHost {
  fn new() -> Arc<Self> {
    Arc::new(Self {
      roots: Mutex::new(Vec::new()),
      by_addr: Mutex::new(HashMap::new()),
      hooks: Mutex::new(None),
      log_sink: Mutex::new(None),
      events: Mutex::new(Vec::new()),
      back_enabled: AtomicBool::new(false),
      forward_enabled: AtomicBool::new(false),
      cursor: Mutex::new(Point::new(0.0, 0.0)),
    })
  }

  fn lookup(&self, obj: &SharedObject) -> Option<Arc<SimObject>> {
    self.by_addr.lock().get(&object_addr(obj)).cloned()
  }

  fn event_key(obj: &Arc<SimObject>) -> String {
    let state = obj.state.lock();
    if state.object_name.is_empty() {
      state.class_name.clone()
    } else {
      state.object_name.clone()
    }
  }

  fn focused_in(obj: &Arc<SimObject>) -> Option<Arc<SimObject>> {
    if obj.state.lock().focused {
      return Some(Arc::clone(obj));
    }
    let children = obj.state.lock().children.clone();
    children.iter().find_map(Self::focused_in)
  }
}

impl Host for SimHost {
  fn toolkit_version(&self) -> String {
    "SimKit 1.0".into()
  }

  fn roots(&self) -> Vec<SharedObject> {
    self
      .roots
      .lock()
      .iter()
      .map(|r| Arc::clone(r) as SharedObject)
      .collect()
  }

  fn active_window(&self) -> Option<SharedObject> {
    fn find_window(obj: &Arc<SimObject>) -> Option<Arc<SimObject>> {
      {
        let state = obj.state.lock();
        if state.is_window && state.visible {
          drop(state);
          return Some(Arc::clone(obj));
        }
      }
      let children = obj.state.lock().children.clone();
      children.iter().find_map(find_window)
    }
    let roots = self.roots.lock().clone();
    roots
      .iter()
      .find_map(find_window)
      .map(|w| w as SharedObject)
  }

  fn focused_object(&self) -> Option<SharedObject> {
    let roots = self.roots.lock().clone();
    roots
      .iter()
      .find_map(SimHost::focused_in)
      .map(|o| o as SharedObject)
  }

  fn install_hooks(&self, sink: HookSink) {
    let mut hooks = self.hooks.lock();
    let chained = match hooks.take() {
      // Preserve an earlier consumer: it runs first, then the new sink.
      Some(prior) => HookSink {
        object_added: {
          let prior = prior.object_added.clone();
          let new = sink.object_added.clone();
          Arc::new(move |obj| {
            prior(obj);
            new(obj);
          })
        },
        object_removed: {
          let prior = prior.object_removed.clone();
          let new = sink.object_removed.clone();
          Arc::new(move |obj| {
            prior(obj);
            new(obj);
          })
        },
      },
      None => sink,
    };
    *hooks = Some(chained);
  }

  fn install_log_capture(&self, sink: LogSink) -> bool {
    *self.log_sink.lock() = Some(sink);
    true
  }

  fn accessible(&self, object: &SharedObject) -> Option<Arc<dyn Accessible>> {
    let concrete = self.lookup(object)?;
    Some(Arc::new(SimAccessible {
      object: Arc::downgrade(&concrete),
    }))
  }

  fn post_input(&self, target: &SharedObject, event: InputEvent) -> bool {
    let Some(obj) = self.lookup(target) else {
      return false;
    };
    self
      .events
      .lock()
      .push((Self::event_key(&obj), event.clone()));

    match &event {
      InputEvent::MouseRelease { .. } => {
        let role = obj.state.lock().role;
        if role == Role::Button {
          obj.emit("clicked", &[]);
        }
      }
      InputEvent::KeyPress { text, .. } if !text.is_empty() => {
        let accepts = obj.state.lock().role == Role::TextBox;
        if accepts {
          let current = obj.text().unwrap_or_default();
          obj.set_text(&format!("{current}{text}"));
        }
      }
      _ => {}
    }
    true
  }

  fn process_events(&self) {}

  fn cursor_position(&self) -> Point {
    *self.cursor.lock()
  }

  fn screen_geometry(&self) -> Rect {
    Rect::new(0.0, 0.0, 1920.0, 1080.0)
  }

  fn device_pixel_ratio(&self) -> f64 {
    DPR
  }

  fn capture(&self, target: &SharedObject, region: CaptureRegion) -> Option<Image> {
    let obj = self.lookup(target)?;
    let logical = match region {
      CaptureRegion::Widget => obj.geometry().size(),
      CaptureRegion::Window | CaptureRegion::WindowLogical => {
        let mut cur = Arc::clone(&obj);
        loop {
          if cur.state.lock().is_window {
            break cur.geometry().size();
          }
          let parent = cur.state.lock().parent.clone().and_then(|w| w.upgrade());
          match parent {
            Some(p) => cur = p,
            None => break cur.geometry().size(),
          }
        }
      }
      CaptureRegion::Region(rect) => rect.size(),
      CaptureRegion::Screen => self.screen_geometry().size(),
    };
    if logical.width <= 0.0 || logical.height <= 0.0 {
      return None;
    }
    let (scale, dpr) = match region {
      CaptureRegion::WindowLogical => (1.0, 1.0),
      _ => (DPR, DPR),
    };
    let mut img = Image::filled(
      (logical.width * scale) as u32,
      (logical.height * scale) as u32,
      [40, 40, 40, 255],
    );
    img.device_pixel_ratio = dpr;
    Some(img)
  }

  fn trigger_shortcut(&self, shortcut: StandardShortcut) -> bool {
    match shortcut {
      StandardShortcut::Back => self.back_enabled.load(Ordering::Relaxed),
      StandardShortcut::Forward => self.forward_enabled.load(Ordering::Relaxed),
    }
  }

  fn supports_scene_items(&self) -> bool {
    true
  }
}

// === Tree builder and test API ===

/// A ready-made widget tree plus the host that owns it.
pub(crate) struct SimTree {
  host: Arc<SimHost>,
}

impl SimTree {
  /// The standard fixture tree:
  ///
  /// ```text
  /// App (Application, non-widget)
  /// ├─ win (Window "Main Window", 400x300 at 100,100)
  /// │  ├─ btn (Button "Save")          ├─ disabledBtn (Button, disabled)
  /// │  ├─ hiddenLabel (Label, hidden)  ├─ <unnamed Label with long text>
  /// │  ├─ edit (LineEdit, focused)     ├─ check (CheckBox "Enable")
  /// │  ├─ combo (ComboBox Red/Green/Blue)  ├─ slider (Slider 0..100)
  /// │  ├─ scene (SceneItem)            ├─ Panel, Panel (unnamed pair)
  /// └─ rows (TableModel 3x2, non-widget)
  /// ```
  pub(crate) fn sample() -> Self {
    let host = SimHost::new();
    let tree = Self { host };

    let app = tree.make("Application", Role::Unknown, |s| {
      s.object_name = "App".into();
      s.is_widget = false;
      s.supers = vec!["Object".into()];
      s.geometry = Rect::new(0.0, 0.0, 0.0, 0.0);
    });

    let win = tree.make("Window", Role::Window, |s| {
      s.object_name = "win".into();
      s.is_window = true;
      s.window_title = "Main Window".into();
      s.geometry = Rect::new(100.0, 100.0, 400.0, 300.0);
    });

    let btn = tree.make_button("btn", "Save");
    let disabled_btn = tree.make_button("disabledBtn", "Nope");
    {
      let mut state = disabled_btn.state.lock();
      state.enabled = false;
      state.geometry = Rect::new(100.0, 10.0, 80.0, 30.0);
    }

    let hidden = tree.make("Label", Role::StaticText, |s| {
      s.object_name = "hiddenLabel".into();
      s.visible = false;
      s.geometry = Rect::new(10.0, 50.0, 80.0, 20.0);
    });
    hidden.state.lock().props.insert(
      "text".into(),
      PropValue::Str("Secret".into()),
    );
    hidden
      .state
      .lock()
      .prop_specs
      .push(PropertySpec::plain("text", "string"));

    let long_label = tree.make("Label", Role::StaticText, |s| {
      s.geometry = Rect::new(10.0, 80.0, 200.0, 20.0);
      s.prop_specs.push(PropertySpec::plain("text", "string"));
      s.props.insert(
        "text".into(),
        PropValue::Str("Hello, world! This is a long label".into()),
      );
    });

    let edit = tree.make("LineEdit", Role::TextBox, |s| {
      s.object_name = "edit".into();
      s.focused = true;
      s.editable = true;
      s.geometry = Rect::new(10.0, 110.0, 150.0, 24.0);
      s.prop_specs.push(PropertySpec::plain("text", "string"));
      s.props.insert("text".into(), PropValue::Str(String::new()));
      s.signals.push(SignalSpec {
        name: "textChanged".into(),
        parameter_types: vec!["string".into()],
      });
      s.methods.push(MethodSpec {
        name: "setText".into(),
        return_type: "void".into(),
        parameter_types: vec!["string".into()],
        access: MethodAccess::Public,
      });
    });

    let check = tree.make("CheckBox", Role::CheckBox, |s| {
      s.object_name = "check".into();
      s.geometry = Rect::new(10.0, 140.0, 100.0, 20.0);
      s.prop_specs.push(PropertySpec::plain("text", "string"));
      s.props.insert("text".into(), PropValue::Str("Enable".into()));
      s.signals.push(SignalSpec {
        name: "toggled".into(),
        parameter_types: vec!["bool".into()],
      });
    });

    let combo = tree.make("ComboBox", Role::ComboBox, |s| {
      s.object_name = "combo".into();
      s.geometry = Rect::new(10.0, 170.0, 120.0, 24.0);
      s.options = vec!["Red".into(), "Green".into(), "Blue".into()];
      s.prop_specs.push(PropertySpec::plain("text", "string"));
      s.props.insert("text".into(), PropValue::Str("Red".into()));
      s.signals.push(SignalSpec {
        name: "currentIndexChanged".into(),
        parameter_types: vec!["int".into()],
      });
    });

    let slider = tree.make("Slider", Role::Slider, |s| {
      s.object_name = "slider".into();
      s.geometry = Rect::new(10.0, 200.0, 150.0, 20.0);
      s.numeric = Some((50.0, 0.0, 100.0));
      s.prop_specs.push(PropertySpec::plain("value", "double"));
      s.signals.push(SignalSpec {
        name: "valueChanged".into(),
        parameter_types: vec!["double".into()],
      });
      s.methods.push(MethodSpec {
        name: "setValue".into(),
        return_type: "void".into(),
        parameter_types: vec!["double".into()],
        access: MethodAccess::Public,
      });
    });

    let scene = tree.make("SceneItem", Role::Graphic, |s| {
      s.object_name = "scene".into();
      s.scene_item = true;
      s.geometry = Rect::new(200.0, 10.0, 64.0, 64.0);
    });

    let panel_a = tree.make("Panel", Role::Group, |s| {
      s.geometry = Rect::new(200.0, 100.0, 100.0, 80.0);
    });
    let panel_b = tree.make("Panel", Role::Group, |s| {
      s.geometry = Rect::new(200.0, 190.0, 100.0, 80.0);
    });

    let rows = tree.make("TableModel", Role::Unknown, |s| {
      s.object_name = "rows".into();
      s.is_widget = false;
      s.supers = vec!["AbstractModel".into(), "Object".into()];
      s.model = Some(SimModel {
        rows: 3,
        cols: 2,
        roles: vec!["display".into(), "tooltip".into()],
      });
    });

    tree.attach(&app, &win);
    for child in [
      &btn,
      &disabled_btn,
      &hidden,
      &long_label,
      &edit,
      &check,
      &combo,
      &slider,
      &scene,
      &panel_a,
      &panel_b,
    ] {
      tree.attach(&win, child);
    }
    tree.attach(&app, &rows);
    tree.host.roots.lock().push(app);
    tree
  }

  fn make(
    &self,
    class_name: &str,
    role: Role,
    customize: impl FnOnce(&mut SimState),
  ) -> Arc<SimObject> {
    let mut state = SimState::blank(class_name, role);
    customize(&mut state);
    let obj = SimObject::new(state);
    self
      .host
      .by_addr
      .lock()
      .insert(Arc::as_ptr(&obj) as usize, Arc::clone(&obj));
    obj
  }

  fn make_button(&self, name: &str, text: &str) -> Arc<SimObject> {
    self.make("Button", Role::Button, |s| {
      s.object_name = name.to_owned();
      s.geometry = Rect::new(10.0, 10.0, 80.0, 30.0);
      s.prop_specs.push(PropertySpec::plain("text", "string"));
      s.props.insert("text".into(), PropValue::Str(text.into()));
      s.signals.push(SignalSpec {
        name: "clicked".into(),
        parameter_types: vec![],
      });
      s.signals.push(SignalSpec {
        name: "pressed".into(),
        parameter_types: vec![],
      });
      s.methods.push(MethodSpec {
        name: "setText".into(),
        return_type: "void".into(),
        parameter_types: vec!["string".into()],
        access: MethodAccess::Public,
      });
      s.methods.push(MethodSpec {
        name: "text".into(),
        return_type: "string".into(),
        parameter_types: vec![],
        access: MethodAccess::Public,
      });
      s.methods.push(MethodSpec {
        name: "click".into(),
        return_type: "void".into(),
        parameter_types: vec![],
        access: MethodAccess::Public,
      });
    })
  }

  fn attach(&self, parent: &Arc<SimObject>, child: &Arc<SimObject>) {
    child.state.lock().parent = Some(Arc::downgrade(parent));
    parent.state.lock().children.push(Arc::clone(child));
  }

  // === Test-facing accessors ===

  pub(crate) fn host(&self) -> &dyn Host {
    self.host.as_ref()
  }

  pub(crate) fn host_arc(&self) -> Arc<dyn Host> {
    Arc::clone(&self.host) as Arc<dyn Host>
  }

  /// A probe installed on this tree, with the alias file pointed away from
  /// the working directory.
  pub(crate) fn probe(&self) -> Probe {
    let config = Config {
      name_map_path: std::env::temp_dir().join("qtmcp-test-no-names.json"),
      ..Config::default()
    };
    Probe::with_config(self.host_arc(), config)
  }

  pub(crate) fn roots(&self) -> Vec<SharedObject> {
    self.host.roots()
  }

  pub(crate) fn all(&self) -> Vec<SharedObject> {
    fn walk(obj: &SharedObject, out: &mut Vec<SharedObject>) {
      out.push(Arc::clone(obj));
      for child in obj.children() {
        walk(&child, out);
      }
    }
    let mut out = Vec::new();
    for root in self.roots() {
      walk(&root, &mut out);
    }
    out
  }

  pub(crate) fn object(&self, name: &str) -> SharedObject {
    self
      .all()
      .into_iter()
      .find(|o| o.object_name() == name)
      .unwrap_or_else(|| panic!("no object named {name}"))
  }

  pub(crate) fn objects_of_class(&self, class: &str) -> Vec<SharedObject> {
    self
      .all()
      .into_iter()
      .filter(|o| o.class_name() == class)
      .collect()
  }

  pub(crate) fn object_with_text(&self, text: &str) -> SharedObject {
    self
      .all()
      .into_iter()
      .find(|o| {
        o.read_property("text")
          .and_then(|v| v.as_str().map(str::to_owned))
          .as_deref()
          == Some(text)
      })
      .unwrap_or_else(|| panic!("no object with text {text:?}"))
  }

  /// Destroy an object: fire the remove hook, then drop every strong ref
  /// the tree holds.
  pub(crate) fn destroy(&self, name: &str) {
    let obj = self.object(name);
    let hook = self.host.hooks.lock().clone();
    if let Some(hook) = hook {
      (hook.object_removed)(&obj);
    }

    let concrete = self.host.lookup(&obj).expect("object not in host index");
    if let Some(parent) = concrete.state.lock().parent.clone().and_then(|w| w.upgrade()) {
      parent
        .state
        .lock()
        .children
        .retain(|c| !Arc::ptr_eq(c, &concrete));
    }
    self
      .host
      .roots
      .lock()
      .retain(|r| !Arc::ptr_eq(r, &concrete));
    self.host.by_addr.lock().remove(&object_addr(&obj));
  }

  /// Construct a new button under `parent`, firing the add hook the way a
  /// toolkit would at the start of construction.
  pub(crate) fn add_button(&self, parent: &str, name: &str, text: &str) -> SharedObject {
    let parent_obj = self.object(parent);
    let parent_concrete = self.host.lookup(&parent_obj).unwrap();
    let btn = self.make_button(name, text);
    self.attach(&parent_concrete, &btn);

    let shared = Arc::clone(&btn) as SharedObject;
    let hook = self.host.hooks.lock().clone();
    if let Some(hook) = hook {
      (hook.object_added)(&shared);
    }
    shared
  }

  pub(crate) fn emit(&self, obj: &SharedObject, signal: &str, args: &[PropValue]) {
    let concrete = self.host.lookup(obj).expect("object not in host index");
    concrete.emit(signal, args);
  }

  pub(crate) fn accessible(&self, name: &str) -> Arc<dyn Accessible> {
    let obj = self.object(name);
    self.host.accessible(&obj).expect("no accessible")
  }

  pub(crate) fn events_for(&self, name: &str) -> Vec<InputEvent> {
    self
      .host
      .events
      .lock()
      .iter()
      .filter(|(key, _)| key == name)
      .map(|(_, e)| e.clone())
      .collect()
  }

  pub(crate) fn hooks_installed(&self) -> bool {
    self.host.hooks.lock().is_some()
  }

  pub(crate) fn device_pixel_ratio(&self) -> f64 {
    DPR
  }

  pub(crate) fn set_shortcut(&self, shortcut: StandardShortcut, enabled: bool) {
    let flag = match shortcut {
      StandardShortcut::Back => &self.host.back_enabled,
      StandardShortcut::Forward => &self.host.forward_enabled,
    };
    flag.store(enabled, Ordering::Relaxed);
  }

  pub(crate) fn log(&self, severity: Severity, message: &str) {
    let sink = self.host.log_sink.lock().clone();
    if let Some(sink) = sink {
      sink(LogEntry::new(severity, message, 1));
    }
  }

  pub(crate) fn set_cursor(&self, p: Point) {
    *self.host.cursor.lock() = p;
  }
}
