use crate::data::dataset::DigitSample;
use crate::error::{NetworkError, Result};

const IMAGE_MAGIC: [u8; 4] = [0x00, 0x00, 0x08, 0x03];
const LABEL_MAGIC: [u8; 4] = [0x00, 0x00, 0x08, 0x01];

/// Parsed IDX3 image file: every image flattened row-major and scaled to
/// `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdxImages {
    pub rows: usize,
    pub cols: usize,
    pub images: Vec<Vec<f64>>,
}

fn be_u32(bytes: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]]) as usize
}

fn idx_err(message: String) -> NetworkError {
    NetworkError::Idx(message)
}

/// Parses an IDX3 image file.
///
/// ```text
/// bytes  0-3:   0x00 0x00 0x08 0x03   (reserved, uint8, 3 dimensions)
/// bytes  4-7:   N                     (big-endian u32)
/// bytes  8-11:  rows
/// bytes 12-15:  cols
/// bytes 16..:   N * rows * cols pixels, row-major
/// ```
pub fn parse_images(bytes: &[u8]) -> Result<IdxImages> {
    if bytes.len() < 16 {
        return Err(idx_err(format!(
            "image file too short: expected at least 16 header bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[..4] != IMAGE_MAGIC {
        return Err(idx_err(format!(
            "image file magic must be {:02X?}, got {:02X?}",
            IMAGE_MAGIC,
            &bytes[..4]
        )));
    }

    let count = be_u32(bytes, 4);
    let rows = be_u32(bytes, 8);
    let cols = be_u32(bytes, 12);
    let pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| idx_err(format!("rows * cols overflows (rows={}, cols={})", rows, cols)))?;
    if pixels == 0 {
        return Err(idx_err("images have zero pixels".to_owned()));
    }
    let required = count
        .checked_mul(pixels)
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| idx_err("image data length overflows".to_owned()))?;
    if bytes.len() < required {
        return Err(idx_err(format!(
            "image file declares {} images of {}x{} but is only {} bytes",
            count, rows, cols, bytes.len()
        )));
    }

    let images = bytes[16..required]
        .chunks_exact(pixels)
        .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
        .collect();

    Ok(IdxImages { rows, cols, images })
}

/// Parses an IDX1 label file. Every label must be a digit `0..=9`.
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 8 {
        return Err(idx_err(format!(
            "label file too short: expected at least 8 header bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[..4] != LABEL_MAGIC {
        return Err(idx_err(format!(
            "label file magic must be {:02X?}, got {:02X?}",
            LABEL_MAGIC,
            &bytes[..4]
        )));
    }

    let count = be_u32(bytes, 4);
    let required = count
        .checked_add(8)
        .ok_or_else(|| idx_err("label data length overflows".to_owned()))?;
    if bytes.len() < required {
        return Err(idx_err(format!(
            "label file declares {} labels but is only {} bytes",
            count,
            bytes.len()
        )));
    }

    let labels = &bytes[8..required];
    if let Some(i) = labels.iter().position(|&label| label > 9) {
        return Err(idx_err(format!("label at index {} is {}, not a digit", i, labels[i])));
    }
    Ok(labels.to_vec())
}

/// Parses a matching image/label pair into samples.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Vec<DigitSample>> {
    let images = parse_images(image_bytes)?;
    let labels = parse_labels(label_bytes)?;
    if images.images.len() != labels.len() {
        return Err(idx_err(format!(
            "image file has {} items but label file has {}",
            images.images.len(),
            labels.len()
        )));
    }
    Ok(images
        .images
        .into_iter()
        .zip(labels)
        .map(|(pixels, digit)| DigitSample::new(pixels, digit))
        .collect())
}

/// Reads and parses an image/label file pair from disk.
pub fn load_idx_pair(image_path: &str, label_path: &str) -> Result<Vec<DigitSample>> {
    let image_bytes = std::fs::read(image_path)?;
    let label_bytes = std::fs::read(label_path)?;
    parse_idx_pair(&image_bytes, &label_bytes)
}
