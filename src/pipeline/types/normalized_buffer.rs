use uuid::Uuid;

pub const BYTES_PER_PIXEL: usize = 4;

/// Raw 32-bit ARGB pixels, one byte per channel, row-major with the
/// first row at the top of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBuffer {
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: usize,
    pub data: Vec<u8>,
    pub source_id: Uuid,
    pub source_name: String,
}

impl NormalizedBuffer {
    /// Returns the `[a, r, g, b]` bytes at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.bytes_per_row + x as usize * BYTES_PER_PIXEL;
        let bytes = self.data.get(offset..offset + BYTES_PER_PIXEL)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.bytes_per_row)
    }
}
