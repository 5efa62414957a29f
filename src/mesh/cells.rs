/// Connectivity for one topology kind of a polygonal mesh.
///
/// Cells are stored as a legacy counted list: every cell is its point count followed by
/// that many point indices, `[n0, i.., n1, i.., ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellArray {
    legacy: Vec<u32>,
    num_cells: usize,
}

impl CellArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// validate and wrap a counted list. Returns `None` if a count runs past the end of
    /// the list.
    pub fn from_legacy(legacy: Vec<u32>) -> Option<Self> {
        let mut idx = 0;
        let mut num_cells = 0;

        while idx < legacy.len() {
            idx += 1 + legacy[idx] as usize;
            num_cells += 1;
        }

        if idx != legacy.len() {
            return None;
        }

        Some(Self { legacy, num_cells })
    }

    /// build the counted list from the `offsets` / `connectivity` pair used by XML files,
    /// where `offsets[i]` is the end of cell `i` inside `connectivity`.
    ///
    /// Returns `None` if the offsets decrease or do not end exactly at the end of the
    /// connectivity array.
    pub fn from_offsets_connectivity(offsets: &[u32], connectivity: &[u32]) -> Option<Self> {
        let mut legacy = Vec::with_capacity(offsets.len() + connectivity.len());
        let mut previous = 0;

        for &offset in offsets {
            let offset = offset as usize;
            let cell = connectivity.get(previous..offset)?;
            legacy.push(cell.len() as u32);
            legacy.extend_from_slice(cell);
            previous = offset;
        }

        if previous != connectivity.len() {
            return None;
        }

        Some(Self {
            legacy,
            num_cells: offsets.len(),
        })
    }

    /// build from an iterator of cells, each a list of point indices
    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u32]>,
    {
        let mut out = Self::new();

        for cell in cells {
            let cell = cell.as_ref();
            out.legacy.push(cell.len() as u32);
            out.legacy.extend_from_slice(cell);
            out.num_cells += 1;
        }

        out
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn is_empty(&self) -> bool {
        self.num_cells == 0
    }

    pub fn as_legacy(&self) -> &[u32] {
        &self.legacy
    }

    pub fn into_legacy(self) -> Vec<u32> {
        self.legacy
    }

    pub fn iter(&self) -> Cells<'_> {
        Cells {
            legacy: &self.legacy,
        }
    }

    /// split back into `(offsets, connectivity)` as written to XML files
    pub fn to_offsets_connectivity(&self) -> (Vec<i64>, Vec<i64>) {
        let mut offsets = Vec::with_capacity(self.num_cells);
        let mut connectivity = Vec::with_capacity(self.legacy.len() - self.num_cells);

        for cell in self.iter() {
            connectivity.extend(cell.iter().map(|&idx| i64::from(idx)));
            offsets.push(connectivity.len() as i64);
        }

        (offsets, connectivity)
    }
}

impl<'a> IntoIterator for &'a CellArray {
    type Item = &'a [u32];
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the point indices of each cell in a [`CellArray`]
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    legacy: &'a [u32],
}

impl<'a> Iterator for Cells<'a> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<Self::Item> {
        let (&count, rest) = self.legacy.split_first()?;
        let count = (count as usize).min(rest.len());
        let (cell, rest) = rest.split_at(count);
        self.legacy = rest;
        Some(cell)
    }
}
