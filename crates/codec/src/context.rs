//! Role and slice hints passed to `pack`
//!
//! Most types ignore these entirely. Composite names use them to choose the
//! end-of-component byte of a slice boundary, and TimeUUID uses them to turn
//! an instant into the lowest or highest UUID for that instant.

/// Which end of a column slice a packed name bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceEnd {
    /// Lower bound of the slice
    Start {
        /// Whether names equal to the bound are included
        inclusive: bool,
    },
    /// Upper bound of the slice
    Finish {
        /// Whether names equal to the bound are included
        inclusive: bool,
    },
}

impl SliceEnd {
    /// Inclusive lower bound
    pub const START: SliceEnd = SliceEnd::Start { inclusive: true };
    /// Inclusive upper bound
    pub const FINISH: SliceEnd = SliceEnd::Finish { inclusive: true };

    /// Whether the bound should sort above every name sharing its prefix
    ///
    /// True for an inclusive finish and an exclusive start.
    pub fn sorts_high(&self) -> bool {
        match self {
            SliceEnd::Start { inclusive } => !inclusive,
            SliceEnd::Finish { inclusive } => *inclusive,
        }
    }
}

/// Hints describing what a packed value is used for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PackContext {
    /// Packing a column name rather than a column value
    pub is_name: bool,
    /// Packing a range boundary for a slice query
    pub slice_end: Option<SliceEnd>,
    /// Packing data that will be stored, not a query boundary
    pub is_data: bool,
}

impl PackContext {
    /// Context for a stored column name
    pub const fn name() -> Self {
        PackContext {
            is_name: true,
            slice_end: None,
            is_data: true,
        }
    }

    /// Context for a stored column value or row key
    pub const fn value() -> Self {
        PackContext {
            is_name: false,
            slice_end: None,
            is_data: true,
        }
    }

    /// Context for a column name used as a slice boundary
    pub const fn slice(end: SliceEnd) -> Self {
        PackContext {
            is_name: true,
            slice_end: Some(end),
            is_data: false,
        }
    }

    /// The slice end, if this context packs a query boundary
    pub fn boundary(&self) -> Option<SliceEnd> {
        if self.is_data {
            None
        } else {
            self.slice_end
        }
    }
}
