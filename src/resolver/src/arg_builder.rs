//! Per-parameter consumption policy (`ArgBuilder`) and the return/out-param
//! summary (`ReturnBuilder`) from `spec.md` §3.

/// Lower priority = earlier conversion rule = preferred, per `spec.md` §3 and the
/// arg-builder-priority tie-break in §4.6. Bands are spaced out so an embedder's
/// special-parameter hook can interleave its own priorities without collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u32);

impl Priority {
    pub const INSTANCE: Priority = Priority(0);
    pub const SPECIAL: Priority = Priority(10);
    pub const POSITIONAL: Priority = Priority(20);
    pub const PARAMS_EXPANDED: Priority = Priority(40);
}

/// What a builder does to produce one argument value for its parameter slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgBuilderKind {
    /// The implicit instance (`this`) argument of a non-static method.
    Instance,
    /// A parameter pre-mapped by the embedder's special-parameter hook.
    Special,
    /// An ordinary parameter filled from a positional or bound-named actual
    /// argument; which one it was at a given call site doesn't affect the
    /// builder's priority band, only the source index in the binding.
    Positional,
    /// One element of a params-array, sourced from the expanded splat tail at
    /// the given offset within the array.
    ParamsExpanded { element_offset: usize },
}

/// A policy object describing how one formal parameter consumes a positional
/// slot of the normalized argument vector.
#[derive(Debug, Clone)]
pub struct ArgBuilder {
    pub kind: ArgBuilderKind,
    pub priority: Priority,
}

impl ArgBuilder {
    pub fn instance() -> Self {
        ArgBuilder { kind: ArgBuilderKind::Instance, priority: Priority::INSTANCE }
    }
    pub fn special() -> Self {
        ArgBuilder { kind: ArgBuilderKind::Special, priority: Priority::SPECIAL }
    }
    pub fn positional() -> Self {
        ArgBuilder { kind: ArgBuilderKind::Positional, priority: Priority::POSITIONAL }
    }
    pub fn params_expanded(element_offset: usize) -> Self {
        ArgBuilder {
            kind: ArgBuilderKind::ParamsExpanded { element_offset },
            priority: Priority::PARAMS_EXPANDED,
        }
    }
}

/// Summarizes how the method's return value and any by-ref `out`/`inout`
/// parameters are combined into the caller-visible result.
#[derive(Debug, Clone, Default)]
pub struct ReturnBuilder {
    /// Raw-parameter indices of out-only parameters hoisted out of the argument
    /// list by by-ref reduction (`spec.md` §4.1 step 4).
    pub hoisted_out_raw_indices: Vec<usize>,
}

impl ReturnBuilder {
    pub fn count_out_params(&self) -> usize {
        self.hoisted_out_raw_indices.len()
    }
}
