/// A LIMIT clause with an optional OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub limit: u64,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            offset: None,
        }
    }
}
