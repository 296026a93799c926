/*! Pixel images handed back from host captures. */

/// A captured RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
  /// Width in physical pixels.
  pub width: u32,
  /// Height in physical pixels.
  pub height: u32,
  /// Physical pixels per logical pixel for the source surface.
  pub device_pixel_ratio: f64,
  /// Tightly packed RGBA rows, `width * height * 4` bytes.
  pub rgba: Vec<u8>,
}

impl Image {
  pub fn new(width: u32, height: u32, device_pixel_ratio: f64, rgba: Vec<u8>) -> Self {
    Self {
      width,
      height,
      device_pixel_ratio,
      rgba,
    }
  }

  /// A uniformly filled image, handy for hosts without a real compositor.
  pub fn filled(width: u32, height: u32, rgba_pixel: [u8; 4]) -> Self {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
      rgba.extend_from_slice(&rgba_pixel);
    }
    Self::new(width, height, 1.0, rgba)
  }

  pub fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0 || self.rgba.is_empty()
  }

  /// Encode as PNG bytes.
  pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
    let mut out = Vec::new();
    {
      let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
      encoder.set_color(png::ColorType::Rgba);
      encoder.set_depth(png::BitDepth::Eight);
      let mut writer = encoder.write_header()?;
      writer.write_image_data(&self.rgba)?;
    }
    Ok(out)
  }
}
