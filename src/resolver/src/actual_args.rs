//! Stage 2 data model: the flattened, normalized call-site record
//! (`spec.md` §3, §4.2).

use crate::candidate::CandidateRegistry;
use crate::types::HostType;

/// One actual argument's type information: `limit_type` is what applicability
/// probing converts from (the narrowest statically-known or runtime-observed
/// type); `static_type` is the caller-expression's compile-time type, used by
/// the restriction fallback in `spec.md` §4.7.
#[derive(Debug, Clone)]
pub struct ActualArgument {
    pub limit_type: HostType,
    pub static_type: HostType,
}

impl ActualArgument {
    pub fn new(ty: HostType) -> Self {
        ActualArgument { limit_type: ty.clone(), static_type: ty }
    }
}

/// The flattened actual-arguments record consumed by stages 3-5.
#[derive(Debug, Clone)]
pub struct ActualArguments {
    pub positional: Vec<ActualArgument>,
    pub named: Vec<ActualArgument>,
    pub names: Vec<String>,
    /// Position at which the splat sequence was spliced, or `-1` if none.
    pub splat_index: isize,
    /// Number of splat elements beyond the expansion limit, left unexpanded.
    pub collapsed_count: usize,
    /// Materialized collapsed-tail element types, indexed by
    /// [`crate::policy::BindingPolicy::get_splatted_item`]'s default impl.
    pub collapsed_items: Vec<HostType>,
    /// What the caller source actually wrote, for diagnostics.
    pub visible_count: usize,
}

impl ActualArguments {
    pub fn count(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Indexes the unified (positional-then-named) address space that
    /// `ArgumentBinding` permutations point into.
    pub fn get(&self, index: usize) -> &ActualArgument {
        if index < self.positional.len() {
            &self.positional[index]
        } else {
            &self.named[index - self.positional.len()]
        }
    }

    fn assert_invariants(&self) {
        debug_assert_eq!(self.count(), self.positional.len() + self.named.len());
        if self.splat_index >= 0 {
            debug_assert!(self.splat_index as usize <= self.count());
        }
        let mut seen = std::collections::HashSet::new();
        debug_assert!(self.names.iter().all(|n| seen.insert(n.clone())), "named arguments must be unique");
    }
}

/// Computes `(pre_splat_limit, post_splat_limit)` from the variadic pool, per
/// `spec.md` §4.2. Returns `(None, None)` when there are no variadic
/// candidates at all (expand the splat fully).
pub fn compute_splat_limits(registry: &CandidateRegistry) -> (Option<usize>, Option<usize>) {
    if registry.params_pool.is_empty() {
        return (None, None);
    }
    let max_index = registry
        .params_pool
        .iter()
        .filter_map(|c| c.params_array_index)
        .max()
        .unwrap_or(0);
    let mut pre = 1 + max_index;
    let post = registry
        .params_pool
        .iter()
        .filter_map(|c| c.params_array_index.map(|idx| c.parameter_count().saturating_sub(idx + 1)))
        .max()
        .unwrap_or(0);
    let max_arity = registry.max_bucket_arity().max(
        registry.params_pool.iter().map(|c| c.parameter_count()).max().unwrap_or(0),
    );
    if pre + post < max_arity {
        pre = max_arity - post;
    }
    (Some(pre), Some(post))
}

/// Builds an `ActualArguments` from an embedder's policy, given the computed
/// splat limits. Thin wrapper over [`crate::policy::BindingPolicy::create_actual_arguments`]
/// that also validates the invariants `spec.md` §3 requires.
pub fn normalize<P: crate::policy::BindingPolicy>(
    policy: &P,
    named: &[HostType],
    names: &[String],
    pre_splat_limit: Option<usize>,
    post_splat_limit: Option<usize>,
) -> Option<ActualArguments> {
    let mut seen = std::collections::HashSet::new();
    for n in names {
        if !seen.insert(n.as_str()) {
            return None;
        }
    }
    let actual = policy.create_actual_arguments(named, names, pre_splat_limit, post_splat_limit)?;
    actual.assert_invariants();
    Some(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::build_registry;
    use crate::reference::ReferencePolicy;
    use crate::signature::RawParameter;
    use crate::types::HostType;

    #[test]
    fn no_variadic_candidates_means_no_splat_limits() {
        let registry = CandidateRegistry { by_arity: Default::default(), params_pool: Vec::new() };
        assert_eq!(compute_splat_limits(&registry), (None, None));
    }

    #[test]
    fn single_params_array_candidate_gets_pre_limit_one() {
        let int_ty = HostType::primitive("int");
        let sig = crate::signature::RawSignature::new("f", int_ty.clone(), int_ty.clone())
            .static_method()
            .with_params(vec![RawParameter::new("items", HostType::array(int_ty, 1)).params_array()]);
        let policy = ReferencePolicy::new();
        let registry = build_registry(&policy, &[sig], &[]);
        assert_eq!(compute_splat_limits(&registry), (Some(1), Some(0)));
    }

    #[test]
    fn duplicate_named_arguments_are_rejected() {
        let policy = ReferencePolicy::new();
        let int_ty = HostType::primitive("int");
        let result = normalize(&policy, &[int_ty.clone(), int_ty], &["x".to_string(), "x".to_string()], None, None);
        assert!(result.is_none());
    }
}
