use image::RgbImage;

/// Side length the model expects. Resizing happens upstream; anything else
/// is rejected here.
pub const IMAGE_SIZE: u32 = 256;

/// Color channels per pixel (RGB).
pub const CHANNELS: usize = 3;

/// Normalized model input: a flat channel-last (H x W x 3) f32 buffer with
/// every channel scaled from [0, 255] to [0.0, 1.0].
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    /// Tensor shape including the batch dimension: (1, 256, 256, 3).
    pub const SHAPE: [usize; 4] = [1, IMAGE_SIZE as usize, IMAGE_SIZE as usize, CHANNELS];

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serialize to native-endian bytes, the layout model runtimes expect
    /// for a raw float32 input buffer.
    pub fn into_ne_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for value in self.data {
            bytes.extend_from_slice(&value.to_ne_bytes());
        }
        bytes
    }
}

/// Convert a 256x256 RGB image into a normalized input tensor.
///
/// Pixels are scanned row-major; each channel is normalized to [0.0, 1.0].
/// Pure transformation, the only failure mode is a dimension mismatch.
pub fn preprocess(img: &RgbImage) -> Result<InputTensor, PreprocessError> {
    let (width, height) = img.dimensions();
    if width != IMAGE_SIZE || height != IMAGE_SIZE {
        return Err(PreprocessError::DimensionMismatch { width, height });
    }

    let mut data = Vec::with_capacity((IMAGE_SIZE * IMAGE_SIZE) as usize * CHANNELS);
    for pixel in img.pixels() {
        for channel in pixel.0 {
            data.push(f32::from(channel) / 255.0);
        }
    }

    Ok(InputTensor { data })
}

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("input image must be {IMAGE_SIZE}x{IMAGE_SIZE}, got {width}x{height}")]
    DimensionMismatch { width: u32, height: u32 },
}
