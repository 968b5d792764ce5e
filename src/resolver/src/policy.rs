//! The embedder hook surface (`spec.md` §6): "dynamic dispatch via virtual hooks
//! becomes a capability set" (§9) — a trait the resolver is generic over, not an
//! inheritance hierarchy.

use crate::actual_args::ActualArguments;
use crate::signature::RawSignature;
use crate::types::{HostType, NarrowingLevel, ParameterWrapper};

/// The result of a pairwise preference question: which side (if either) wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    One,
    Two,
    Equivalent,
    Ambiguous,
}

impl Candidate {
    /// Swap-and-invert, used to make a one-sided preference hook symmetric
    /// (`spec.md` §4.6 "last resort" and §9 "numeric preference... symmetric
    /// fallback call pattern").
    pub fn inverted(self) -> Candidate {
        match self {
            Candidate::One => Candidate::Two,
            Candidate::Two => Candidate::One,
            Candidate::Equivalent => Candidate::Equivalent,
            Candidate::Ambiguous => Candidate::Ambiguous,
        }
    }
}

/// Everything the resolver needs from the host type system and the
/// surrounding language runtime. Implemented once per embedder; the bundled
/// [`crate::reference`] policy is a minimal worked example used by this
/// crate's own tests and CLI demo.
pub trait BindingPolicy {
    /// `(named_args, names)` for the current call site. Default: no named
    /// arguments.
    fn get_named_arguments(&self) -> (Vec<HostType>, Vec<String>) {
        (Vec::new(), Vec::new())
    }

    /// Builds the normalized `ActualArguments` record from whatever raw
    /// positional/splat context the embedder holds (the front-end's raw
    /// argument descriptors are out of this resolver's scope, per `spec.md`
    /// §1(d) — the embedder already has them). `named`/`names` are passed
    /// through from [`BindingPolicy::get_named_arguments`] for convenience.
    /// Returns `None` if the embedder rejects the call shape outright
    /// (folded into `BindingTarget::InvalidArguments` by the resolver).
    fn create_actual_arguments(
        &self,
        named: &[HostType],
        names: &[String],
        pre_splat_limit: Option<usize>,
        post_splat_limit: Option<usize>,
    ) -> Option<ActualArguments>;

    /// Whether keyword-argument setting is allowed for this method at all.
    /// Default: constructors only, matching most host runtimes' convention
    /// of only allowing named "property-setting" arguments on `new` calls.
    fn allow_keyword_argument_setting(&self, signature: &RawSignature) -> bool {
        signature.name == ".ctor"
    }

    /// Lets the embedder pre-map selected parameters (e.g. an implicit context
    /// slot) ahead of the default mapping. Returns a bitmask of raw-parameter
    /// indices it consumed, or `None` to fall back to the default mapping
    /// entirely (instance parameter only).
    fn map_special_parameters(&self, _signature: &RawSignature, _names: &[String]) -> Option<u64> {
        None
    }

    /// Can a value of type `from` convert to `to_param` at narrowing level `level`?
    fn can_convert_from(&self, from: &HostType, to_param: &ParameterWrapper, level: NarrowingLevel) -> bool;

    /// Per-argument preference between two parameters competing for the same
    /// actual argument, at a given narrowing level.
    fn select_best_conversion_for(
        &self,
        actual: &HostType,
        p1: &ParameterWrapper,
        p2: &ParameterWrapper,
        level: NarrowingLevel,
    ) -> Candidate;

    /// Host-binder numeric ordering between two types, with no narrowing-level
    /// context. Last-resort tie-break (`spec.md` §4.6).
    fn prefer_convert(&self, t1: &HostType, t2: &HostType) -> Candidate;

    /// Structural equivalence of two parameters beyond `ParameterWrapper`'s
    /// `(type, prohibits_null)` equality (an embedder may fold in e.g.
    /// attribute-level equivalence).
    fn parameters_equivalent(&self, p1: &ParameterWrapper, p2: &ParameterWrapper) -> bool {
        p1 == p2
    }

    /// Fetches one collapsed-tail (unexpanded splat) element's runtime type by
    /// index. The default reads from `ActualArguments::collapsed_items`, which
    /// is what the bundled reference normalizer populates; an embedder backed
    /// by a lazy splat source may override this to avoid materializing the
    /// whole tail eagerly.
    fn get_splatted_item(&self, actual: &ActualArguments, index: usize) -> HostType {
        actual.collapsed_items[index].clone()
    }

    /// The splat source's own type as a whole (`spec.md` §6), as opposed to
    /// one of its elements (`get_splatted_item`). Diagnostics that name "the
    /// splatted expression" itself — rather than a specific collapsed-tail
    /// position — use this; the default answers `None` when there is no splat
    /// in the call (`ActualArguments::splat_index < 0`) and otherwise falls
    /// back to the first collapsed item's type, which is all the bundled
    /// reference normalizer tracks about the source expression.
    fn get_splatted_expression(&self, actual: &ActualArguments) -> Option<HostType> {
        if actual.splat_index < 0 {
            return None;
        }
        actual.collapsed_items.first().cloned()
    }
}
