/*!
Screenshot capture.

Asks the host for pixels and hands back base64-encoded PNG. Window
captures come in two flavors: physical pixels, and logical pixels that
line up 1:1 with mouse coordinates.
*/

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};

use crate::host::{CaptureRegion, Host, SharedObject};
use crate::registry;
use crate::types::{ProbeError, ProbeResult};

/// Capture a region of a widget and return `{image, width, height, ...}`.
pub(crate) fn capture(
  host: &dyn Host,
  obj: &SharedObject,
  region: CaptureRegion,
) -> ProbeResult<Value> {
  if obj.as_widget().is_none() {
    return Err(ProbeError::NotAWidget(registry::object_path(obj)));
  }

  let image = host
    .capture(obj, region)
    .ok_or_else(|| ProbeError::CaptureFailed("host returned no pixels".into()))?;
  if image.is_empty() {
    return Err(ProbeError::CaptureFailed("capture is empty".into()));
  }

  let png = image
    .encode_png()
    .map_err(|e| ProbeError::CaptureFailed(format!("png encoding: {e}")))?;

  Ok(json!({
    "image": BASE64.encode(&png),
    "format": "png",
    "width": image.width,
    "height": image.height,
    "devicePixelRatio": image.device_pixel_ratio,
  }))
}
