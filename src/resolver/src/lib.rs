//! A host-agnostic overload resolver: given a set of candidate method
//! signatures and a call site's actual arguments, selects the single best
//! matching signature (or reports why none qualifies).
//!
//! The resolver core never inspects a host type directly; it asks questions
//! of an embedder-supplied [`policy::BindingPolicy`]. [`reference`] bundles a
//! minimal worked policy used by this crate's own tests and CLI demo — it is
//! not a substitute for a real host-language binder.

pub mod actual_args;
pub mod applicability;
pub mod arg_builder;
pub mod binder;
pub mod candidate;
pub mod error;
pub mod policy;
pub mod preference;
pub mod reference;
pub mod resolve;
pub mod restrictions;
pub mod signature;
pub mod types;

pub use actual_args::{ActualArgument, ActualArguments};
pub use error::{make_invalid_parameters_error, ArityBound, BindingTarget, ConversionResult, ErrorInfo, FailureReason};
pub use policy::{BindingPolicy, Candidate};
pub use resolve::OverloadResolver;
pub use restrictions::Restriction;
pub use signature::{CallingConvention, RawParameter, RawSignature, RefKind};
pub use types::{HostType, NarrowingLevel, ParameterWrapper, TypeKind};
