//! Structured result and error types (`spec.md` §3, §6, §7).

use serde::Serialize;
use thiserror::Error;

use crate::binder::NameBindingFailure;
use crate::candidate::MethodCandidate;
use crate::restrictions::Restriction;
use crate::signature::display_signature;
use crate::types::{HostType, NarrowingLevel};

/// One failed actual-to-formal conversion probe.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub argument_index: usize,
    pub from: HostType,
    pub to: HostType,
    pub failed: bool,
}

/// Why a single candidate was eliminated before binding could succeed. This is
/// the crate's genuine `std::error::Error` surface (`spec.md` §7): the
/// resolver never panics on a caller-supplied call shape, only on programmer
/// misuse (`resolve_overload` called twice, an empty candidate list, ...),
/// which `assert!` already covers.
#[derive(Debug, Clone, Error)]
pub enum FailureReason {
    #[error(transparent)]
    Name(#[from] NameBindingFailure),
    #[error("{} argument(s) failed conversion", .0.len())]
    Conversion(Vec<ConversionResult>),
}

/// The lower bound of an arity a `CandidateSet` bucket accepts, for the
/// `IncorrectArgumentCount` diagnostic's `expected_arities` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityBound {
    Exact(usize),
    /// A variadic candidate exists at this base arity "or more" (the `+∞`
    /// sentinel from `spec.md` §4.3).
    OrMore(usize),
}

/// The tagged-union result of a single resolution attempt (`spec.md` §3).
#[derive(Debug, Clone)]
pub enum BindingTarget {
    Success {
        candidate: MethodCandidate,
        narrowing_level: NarrowingLevel,
        restrictions: Vec<Restriction>,
    },
    CallFailure {
        failures: Vec<FailureReason>,
    },
    AmbiguousMatch {
        methods: Vec<MethodCandidate>,
    },
    IncorrectArgumentCount {
        expected_arities: Vec<ArityBound>,
        actual: usize,
    },
    InvalidArguments,
}

impl BindingTarget {
    pub fn is_success(&self) -> bool {
        matches!(self, BindingTarget::Success { .. })
    }
}

/// An embedder-renderable, structured failure description. Produced from a
/// non-success `BindingTarget` by [`make_invalid_parameters_error`]; never
/// itself localized (`spec.md` §1 Non-goals).
#[derive(Debug, Clone, Serialize)]
pub enum ErrorInfo {
    Conversion(Vec<ConversionResult>),
    DuplicateKeyword(String),
    UnassignableKeyword(String),
    IncorrectArity {
        min: usize,
        max: Option<usize>,
        actual: usize,
        default_count: usize,
        has_arg_list: bool,
        has_kwargs: bool,
    },
    Ambiguous(Vec<String>),
    InvalidArguments,
}

/// Converts a non-success `BindingTarget` into a structured, embedder-renderable
/// error (`spec.md` §6). Calling this on `BindingTarget::Success` is a
/// programmer error: a caller holding a success has no error to render.
pub fn make_invalid_parameters_error(target: &BindingTarget) -> ErrorInfo {
    match target {
        BindingTarget::Success { .. } => {
            panic!("make_invalid_parameters_error called on a successful BindingTarget")
        }
        BindingTarget::CallFailure { failures } => {
            // Conversion failures, when present, are always ordered first (see
            // `resolve::dedupe_name_failures`'s caller): the final narrowing
            // level's conversion failures are the primary reason, with any
            // previously-suppressed name failures folded in after as context
            // per spec.md §7. A call that never had a name-binding survivor at
            // all carries only name failures, so the first entry still
            // determines the reported shape either way.
            match failures.first() {
                Some(FailureReason::Name(NameBindingFailure::DuplicateKeyword(name))) => {
                    ErrorInfo::DuplicateKeyword(name.clone())
                }
                Some(FailureReason::Name(NameBindingFailure::UnassignableKeyword(name))) => {
                    ErrorInfo::UnassignableKeyword(name.clone())
                }
                Some(FailureReason::Conversion(_)) => {
                    let all = failures
                        .iter()
                        .flat_map(|f| match f {
                            FailureReason::Conversion(c) => c.clone(),
                            FailureReason::Name(_) => Vec::new(),
                        })
                        .collect();
                    ErrorInfo::Conversion(all)
                }
                None => ErrorInfo::Conversion(Vec::new()),
            }
        }
        BindingTarget::AmbiguousMatch { methods } => {
            ErrorInfo::Ambiguous(methods.iter().map(|c| display_signature(&c.signature)).collect())
        }
        BindingTarget::IncorrectArgumentCount { expected_arities, actual } => {
            let min = expected_arities
                .iter()
                .map(|a| match a {
                    ArityBound::Exact(n) => *n,
                    ArityBound::OrMore(n) => *n,
                })
                .min()
                .unwrap_or(0);
            let has_arg_list = expected_arities.iter().any(|a| matches!(a, ArityBound::OrMore(_)));
            let max = if has_arg_list {
                None
            } else {
                expected_arities
                    .iter()
                    .map(|a| match a {
                        ArityBound::Exact(n) => *n,
                        ArityBound::OrMore(n) => *n,
                    })
                    .max()
            };
            let default_count = max.map(|m| m.saturating_sub(min)).unwrap_or(0);
            ErrorInfo::IncorrectArity {
                min,
                max,
                actual: *actual,
                default_count,
                has_arg_list,
                has_kwargs: false,
            }
        }
        BindingTarget::InvalidArguments => ErrorInfo::InvalidArguments,
    }
}
