/// Size of the byte window ("taster") examined by the heuristic sniffers.
///
/// A larger taster is slower but more reliable, especially for UTF-8 text whose
/// first non-ASCII characters appear late in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Taster {
    /// Examine the whole buffer.
    #[default]
    All,
    /// Examine at most this many leading bytes. `Bytes(0)` behaves like [`Taster::All`].
    Bytes(usize),
}

impl Taster {
    /// Returns the byte limit, or None when the whole buffer is examined.
    pub fn bytes(&self) -> Option<usize> {
        match self {
            Taster::Bytes(n) if *n > 0 => Some(*n),
            _ => None,
        }
    }

    /// Returns the sample window of `data`. Never longer than the buffer.
    pub fn window<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        match self.bytes() {
            Some(n) => &data[..n.min(data.len())],
            None => data,
        }
    }
}
