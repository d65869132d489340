//! Readers for the IDX binary format used by MNIST and its derivatives
//! (Fashion-MNIST, EMNIST, …).
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::DatasetError;
use crate::train::Sample;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// Parses an image/label IDX pair into samples.
///
/// Each sample's input holds one image's pixels divided by 255.0 so values
/// lie in `[0.0, 1.0]`; its output is a one-hot vector of length `n_classes`.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<Vec<Sample>, DatasetError> {
    if n_classes < 2 {
        return Err(malformed(format!("n_classes must be at least 2, got {}.", n_classes)));
    }

    // ── Image file validation ───────────────────────────────────────────────

    check_magic("image", image_bytes, IMAGE_HEADER_LEN, 0x03)?;
    let n_items = read_u32(image_bytes, 4);
    let rows = read_u32(image_bytes, 8);
    let cols = read_u32(image_bytes, 12);

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        malformed(format!("image rows * cols overflows usize (rows={}, cols={}).", rows, cols))
    })?;
    if n_pixels == 0 {
        return Err(malformed(format!(
            "image file declares {}×{} pixel images; both dimensions must be non-zero.",
            rows, cols
        )));
    }
    let required_image_len = n_items
        .checked_mul(n_pixels)
        .and_then(|data| data.checked_add(IMAGE_HEADER_LEN))
        .ok_or_else(|| malformed("image data length overflows usize.".to_owned()))?;

    if image_bytes.len() < required_image_len {
        return Err(malformed(format!(
            "image file declares {} items of {}×{} pixels but is only {} bytes \
             (need at least {}).",
            n_items, rows, cols, image_bytes.len(), required_image_len
        )));
    }

    // ── Label file validation ───────────────────────────────────────────────

    check_magic("label", label_bytes, LABEL_HEADER_LEN, 0x01)?;
    let label_count = read_u32(label_bytes, 4);

    if label_count != n_items {
        return Err(malformed(format!(
            "image file declares {} items but label file declares {}.",
            n_items, label_count
        )));
    }
    if label_bytes.len() < LABEL_HEADER_LEN + n_items {
        return Err(malformed(format!(
            "label file declares {} labels but is only {} bytes.",
            n_items, label_bytes.len()
        )));
    }

    // ── Build samples ───────────────────────────────────────────────────────

    let image_data = &image_bytes[IMAGE_HEADER_LEN..required_image_len];
    let label_data = &label_bytes[LABEL_HEADER_LEN..LABEL_HEADER_LEN + n_items];

    let mut samples = Vec::with_capacity(n_items);
    for (i, (pixels, &class_idx)) in image_data.chunks_exact(n_pixels).zip(label_data).enumerate() {
        let class = class_idx as usize;
        if class >= n_classes {
            return Err(malformed(format!(
                "label at index {}: class {} is out of range for n_classes={}.",
                i, class, n_classes
            )));
        }
        let input = pixels.iter().map(|&px| px as f64 / 255.0).collect();
        let mut output = vec![0.0f64; n_classes];
        output[class] = 1.0;
        samples.push(Sample::new(input, output));
    }

    Ok(samples)
}

/// Reads an IDX pair from disk and keeps at most `limit` samples.
pub fn load_idx_pair(
    image_path: &Path,
    label_path: &Path,
    n_classes: usize,
    limit: Option<usize>,
) -> Result<Vec<Sample>, DatasetError> {
    let image_bytes = read_file(image_path)?;
    let label_bytes = read_file(label_path)?;

    let mut samples = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    if let Some(limit) = limit {
        samples.truncate(limit);
    }

    debug!(images = %image_path.display(), samples = samples.len(), "loaded IDX dataset");
    Ok(samples)
}

fn read_file(path: &Path) -> Result<Vec<u8>, DatasetError> {
    std::fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn check_magic(kind: &str, bytes: &[u8], header_len: usize, dims: u8) -> Result<(), DatasetError> {
    if bytes.len() < header_len {
        return Err(malformed(format!(
            "{} file too short: expected at least {} header bytes, got {}.",
            kind, header_len, bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(malformed(format!(
            "{} file: bytes 0-1 must be 0x00 0x00 (reserved), got 0x{:02X} 0x{:02X}.",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(malformed(format!(
            "{} file: byte 2 (dtype) must be 0x08 (uint8), got 0x{:02X}.",
            kind, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(malformed(format!(
            "{} file: byte 3 (dimensions) must be {}, got {}.",
            kind, dims, bytes[3]
        )));
    }
    Ok(())
}

fn read_u32(bytes: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]]) as usize
}

fn malformed(message: String) -> DatasetError {
    DatasetError::Malformed(message)
}
