/// Cumulative row offsets, measured lazily from the first invalid row
///
/// `ends[i]` is the bottom edge of row `i`. Rows past `ends.len()` have not
/// been measured since the last invalidation.
#[derive(Debug, Clone, Default)]
pub struct OffsetTable {
    ends: Vec<u32>,
}

impl OffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows with a valid offset
    pub fn measured(&self) -> usize {
        self.ends.len()
    }

    /// Drop every cached offset from `row` onwards
    pub fn invalidate_from(&mut self, row: usize) {
        self.ends.truncate(row);
    }

    /// Measure rows until at least `count` rows have offsets.
    pub fn ensure<F>(&mut self, count: usize, mut size_of: F)
    where
        F: FnMut(usize) -> u16,
    {
        while self.ends.len() < count {
            let row = self.ends.len();
            let top = self.ends.last().copied().unwrap_or(0);
            self.ends.push(top.saturating_add(u32::from(size_of(row))));
        }
    }

    /// Top edge of a measured row
    pub fn top(&self, row: usize) -> u32 {
        if row == 0 {
            0
        } else {
            self.ends.get(row - 1).copied().unwrap_or_else(|| self.bottom_edge())
        }
    }

    /// Bottom edge of a measured row
    pub fn bottom(&self, row: usize) -> u32 {
        self.ends.get(row).copied().unwrap_or_else(|| self.bottom_edge())
    }

    pub fn height(&self, row: usize) -> u32 {
        self.bottom(row) - self.top(row)
    }

    /// Bottom of the last measured row
    pub fn bottom_edge(&self) -> u32 {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Row covering `offset`, measuring forward as needed.
    ///
    /// Returns `len` when `offset` lies past the last row.
    pub fn row_at<F>(&mut self, offset: u32, len: usize, mut size_of: F) -> usize
    where
        F: FnMut(usize) -> u16,
    {
        while self.ends.len() < len && self.bottom_edge() <= offset {
            let row = self.ends.len();
            self.ensure(row + 1, &mut size_of);
        }
        self.ends.partition_point(|&end| end <= offset)
    }
}
