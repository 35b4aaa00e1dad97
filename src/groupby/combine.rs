//! How per-group results are joined back together

/// The two ways of joining per-group results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineStrategy {
    /// Results still carry the grouped dimension: concatenate along it.
    ConcatExisting,
    /// The grouped dimension was collapsed: stack along a new dimension.
    StackNew,
}

impl CombineStrategy {
    /// Picks the strategy from whether the first applied result still carries
    /// the grouped dimension.
    #[must_use]
    pub const fn choose(keeps_group_dim: bool) -> Self {
        if keeps_group_dim {
            Self::ConcatExisting
        } else {
            Self::StackNew
        }
    }

    /// Get the string representation of the strategy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConcatExisting => "concat",
            Self::StackNew => "stack",
        }
    }
}
