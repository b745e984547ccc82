#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowIndex(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnIndex(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct PassagesCount(pub usize);

/// Side length of a square area on a drawing surface, in pixels.
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug)]
pub struct PixelLength(pub f64);
