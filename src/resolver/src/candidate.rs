//! Stage 1: candidate-set construction (`spec.md` §4.1, §4.3).

use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

use crate::arg_builder::ArgBuilder;
use crate::policy::BindingPolicy;
use crate::signature::{RawSignature, RefKind};
use crate::types::ParameterWrapper;

/// A `(signature, parameter wrappers, arg builders, return builder)` tuple
/// specialized to one effective arity.
#[derive(Debug, Clone)]
pub struct MethodCandidate {
    pub signature: Rc<RawSignature>,
    pub parameters: Vec<ParameterWrapper>,
    pub arg_builders: Vec<ArgBuilder>,
    pub return_builder: crate::arg_builder::ReturnBuilder,
    pub params_array_index: Option<usize>,
    /// The params-array element type, retained across `make_params_extended`
    /// specialization (which clears `params_array_index`) so the collapsed-tail
    /// convertibility check in `spec.md` §4.5 step 2 has somewhere to read it
    /// from without re-deriving it from individual expanded wrappers.
    pub params_element_type: Option<crate::types::HostType>,
}

impl MethodCandidate {
    pub fn parameter_count(&self) -> usize {
        debug_assert_eq!(self.parameters.len(), self.arg_builders.len());
        self.parameters.len()
    }

    pub fn is_private(&self) -> bool {
        self.signature.is_private
    }

    /// Always `false` for candidates that survive construction: generic
    /// signatures are skipped before a `MethodCandidate` is ever built. Exposed
    /// so preference's "prefer non-generic" tie-break (`spec.md` §4.6.2) has a
    /// stable place to read from if an embedder extends candidate construction
    /// to support generics later.
    pub fn is_generic(&self) -> bool {
        self.signature.generic_arity > 0
    }

    pub fn has_params_dictionary(&self) -> bool {
        self.signature.has_params_dictionary()
    }
}

/// The set of `MethodCandidate`s sharing one effective arity.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub arity: usize,
    pub candidates: Vec<MethodCandidate>,
}

impl CandidateSet {
    /// Per `spec.md` §4.3: a set consisting solely of params-dictionary
    /// candidates is treated as empty — those are internal duals used only for
    /// keyword-mapping normalization, never a real applicable target.
    pub fn is_effectively_empty(&self) -> bool {
        self.candidates.is_empty()
            || self.candidates.iter().all(MethodCandidate::has_params_dictionary)
    }
}

/// Owns every non-variadic `CandidateSet` (bucketed by arity) plus the pool of
/// variadic candidates retained for on-demand expansion.
pub struct CandidateRegistry {
    pub by_arity: BTreeMap<usize, CandidateSet>,
    pub params_pool: Vec<MethodCandidate>,
}

impl CandidateRegistry {
    pub fn max_bucket_arity(&self) -> usize {
        self.by_arity.keys().copied().max().unwrap_or(0)
    }

    pub fn has_variadic_candidates(&self) -> bool {
        !self.params_pool.is_empty()
    }

    /// Sorted bucket arities, for the `IncorrectArgumentCount` diagnostic.
    pub fn bucket_arities(&self) -> Vec<usize> {
        self.by_arity.keys().copied().collect()
    }

    /// Build (or reuse) a `CandidateSet` for exactly `count` positional slots.
    /// Per `spec.md` §4.3: a pre-built bucket is used when present and the splat
    /// tail is fully expanded (`collapsed_count == 0`); otherwise every variadic
    /// candidate is specialized fresh to `count`.
    pub fn candidate_set_for(
        &self,
        count: usize,
        collapsed_count: usize,
        names: &[String],
    ) -> Option<CandidateSet> {
        if collapsed_count == 0 {
            if let Some(set) = self.by_arity.get(&count) {
                return Some(set.clone());
            }
        }
        if self.has_variadic_candidates() {
            let candidates = self
                .params_pool
                .iter()
                .filter(|c| count >= c.parameter_count().saturating_sub(1))
                .map(|c| make_params_extended(c, count, names))
                .collect::<Vec<_>>();
            if !candidates.is_empty() {
                return Some(CandidateSet { arity: count, candidates });
            }
        }
        None
    }
}

/// Specializes a variadic candidate to exactly `arity` positional slots,
/// expanding its trailing params-array parameter into `arity - (params_array_index)`
/// individual element wrappers, each consuming one actual argument.
pub fn make_params_extended(
    candidate: &MethodCandidate,
    arity: usize,
    _names: &[String],
) -> MethodCandidate {
    let idx = candidate
        .params_array_index
        .expect("make_params_extended requires a params-array candidate");
    let element_ty = candidate.parameters[idx]
        .ty
        .array_element()
        .cloned()
        .unwrap_or_else(|| candidate.parameters[idx].ty.clone());

    let mut parameters = candidate.parameters[..idx].to_vec();
    let mut arg_builders = candidate.arg_builders[..idx].to_vec();

    let extra = arity.saturating_sub(idx);
    for offset in 0..extra {
        parameters.push(ParameterWrapper::simple(element_ty.clone(), false));
        arg_builders.push(ArgBuilder::params_expanded(offset));
    }

    MethodCandidate {
        signature: candidate.signature.clone(),
        parameters,
        arg_builders,
        return_builder: candidate.return_builder.clone(),
        params_array_index: None,
        params_element_type: Some(element_ty),
    }
}

/// Maps one accepted `RawSignature` into its family of `MethodCandidate`s:
/// the base positional mapping, one variant per suffix of trailing optional
/// parameters, and an optional by-ref-reduced variant. Signatures that are
/// not bindable (varargs calling convention, unresolved generics) are skipped
/// silently, per `spec.md` §4.1.
pub fn build_registry<P: BindingPolicy>(
    policy: &P,
    signatures: &[RawSignature],
    arg_names: &[String],
) -> CandidateRegistry {
    let mut by_arity: BTreeMap<usize, CandidateSet> = BTreeMap::new();
    let mut params_pool = Vec::new();

    for sig in signatures {
        if !sig.is_bindable() {
            trace!("skipping non-bindable signature {}", sig.name);
            continue;
        }
        let sig_rc = Rc::new(sig.clone());
        for candidate in map_signature(policy, &sig_rc, arg_names) {
            if candidate.params_array_index.is_some() {
                params_pool.push(candidate);
            } else {
                let arity = candidate.parameter_count();
                by_arity.entry(arity).or_insert_with(|| CandidateSet { arity, candidates: Vec::new() }).candidates.push(candidate);
            }
        }
    }

    // Specialize every variadic candidate into every arity bucket already
    // present, per spec.md §4.1's "arity bucketing" rule.
    let existing_arities: Vec<usize> = by_arity.keys().copied().collect();
    for arity in existing_arities {
        for base in &params_pool {
            if arity + 1 >= base.parameter_count() {
                let specialized = make_params_extended(base, arity, arg_names);
                by_arity.get_mut(&arity).unwrap().candidates.push(specialized);
            }
        }
    }

    CandidateRegistry { by_arity, params_pool }
}

/// Per-signature mapping: instance parameter, special-parameter hook, ordinary
/// parameters, optional-suffix default candidates, and by-ref reduction.
fn map_signature<P: BindingPolicy>(
    policy: &P,
    sig: &Rc<RawSignature>,
    arg_names: &[String],
) -> Vec<MethodCandidate> {
    let mut base_parameters = Vec::new();
    let mut base_builders = Vec::new();

    if !sig.is_static {
        base_parameters.push(ParameterWrapper::simple(sig.declaring_type.clone(), true));
        base_builders.push(ArgBuilder::instance());
    }

    let consumed_mask = policy.map_special_parameters(sig, arg_names).unwrap_or(0);

    let mut params_array_index = None;
    let mut hoisted_out_raw_indices = Vec::new();
    let mut ordinary: Vec<(usize, ParameterWrapper)> = Vec::new();

    for (raw_index, p) in sig.parameters.iter().enumerate() {
        if consumed_mask & (1u64 << raw_index) != 0 {
            base_parameters.push(ParameterWrapper {
                ty: p.ty.clone(),
                prohibits_null: p.prohibits_null,
                is_by_ref: p.ref_kind.is_by_ref(),
                is_params_array: false,
                is_params_dict: false,
                raw_index: Some(raw_index),
            });
            base_builders.push(ArgBuilder::special());
            continue;
        }
        if p.ref_kind.is_out_only() {
            // By-ref reduction: drop this slot from the argument list entirely
            // and record it on the return builder instead.
            hoisted_out_raw_indices.push(raw_index);
            continue;
        }
        let wrapper = ParameterWrapper {
            ty: p.ty.clone(),
            prohibits_null: p.prohibits_null,
            is_by_ref: p.ref_kind.is_by_ref(),
            is_params_array: p.is_params_array,
            is_params_dict: p.is_params_dict,
            raw_index: Some(raw_index),
        };
        ordinary.push((raw_index, wrapper));
    }

    let has_params_array = sig.parameters.iter().any(|p| p.is_params_array);
    let first_optional = sig
        .parameters
        .iter()
        .enumerate()
        .filter(|(_, p)| p.has_default && !p.is_params_array && !p.is_params_dict)
        .map(|(i, _)| i)
        .next();

    let ordinary_required_count = match first_optional {
        Some(i) => ordinary.iter().filter(|(raw_index, _)| *raw_index < i).count(),
        None => ordinary.len(),
    };

    let mut candidates = Vec::new();

    if has_params_array {
        // Retained for on-demand expansion only; not a directly-bindable arity.
        let mut parameters = base_parameters.clone();
        let mut arg_builders = base_builders.clone();
        for (_, wrapper) in &ordinary {
            if wrapper.is_params_array {
                params_array_index = Some(parameters.len());
            }
            parameters.push(wrapper.clone());
            arg_builders.push(ArgBuilder::positional());
        }
        let params_element_type = params_array_index.and_then(|idx| parameters[idx].ty.array_element().cloned());
        candidates.push(MethodCandidate {
            signature: sig.clone(),
            parameters,
            arg_builders,
            return_builder: crate::arg_builder::ReturnBuilder {
                hoisted_out_raw_indices: hoisted_out_raw_indices.clone(),
            },
            params_array_index,
            params_element_type,
        });
        return candidates;
    }

    // One candidate per suffix of trailing optional parameters that is
    // supplied, from the fully-required prefix up to the full ordinary list.
    let max_supplied = ordinary.len();
    for supplied in ordinary_required_count..=max_supplied {
        let mut parameters = base_parameters.clone();
        let mut arg_builders = base_builders.clone();
        for (_, wrapper) in ordinary.iter().take(supplied) {
            parameters.push(wrapper.clone());
            arg_builders.push(ArgBuilder::positional());
        }
        candidates.push(MethodCandidate {
            signature: sig.clone(),
            parameters,
            arg_builders,
            return_builder: crate::arg_builder::ReturnBuilder {
                hoisted_out_raw_indices: hoisted_out_raw_indices.clone(),
            },
            params_array_index: None,
            params_element_type: None,
        });
    }

    // By-ref reduction (spec.md §4.1 step 4): out-only parameters were already
    // excluded from `ordinary` above and recorded in `hoisted_out_raw_indices`,
    // so every candidate produced by the loop above *is* the by-ref-reduced
    // form — there is no separate unreduced variant to additionally emit.
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferencePolicy;
    use crate::signature::{RawParameter, RawSignature};

    #[test]
    fn trailing_optional_parameters_produce_one_candidate_per_supplied_suffix() {
        let int_ty = crate::types::HostType::primitive("int");
        let sig = RawSignature::new("f", int_ty.clone(), int_ty.clone())
            .static_method()
            .with_params(vec![
                RawParameter::new("a", int_ty.clone()),
                RawParameter::new("b", int_ty.clone()).optional(),
                RawParameter::new("c", int_ty.clone()).optional(),
            ]);
        let policy = ReferencePolicy::new();
        let registry = build_registry(&policy, &[sig], &[]);
        assert_eq!(registry.bucket_arities(), vec![1, 2, 3]);
    }

    #[test]
    fn out_only_parameters_are_hoisted_out_of_the_argument_list() {
        let int_ty = crate::types::HostType::primitive("int");
        let sig = RawSignature::new("f", int_ty.clone(), int_ty.clone())
            .static_method()
            .with_params(vec![
                RawParameter::new("a", int_ty.clone()),
                RawParameter::new("result", int_ty).by_ref(crate::signature::RefKind::Out),
            ]);
        let policy = ReferencePolicy::new();
        let registry = build_registry(&policy, &[sig], &[]);
        let candidate = &registry.by_arity[&1].candidates[0];
        assert_eq!(candidate.parameter_count(), 1);
        assert_eq!(candidate.return_builder.count_out_params(), 1);
    }

    #[test]
    fn generic_signatures_are_skipped() {
        let int_ty = crate::types::HostType::primitive("int");
        let sig = RawSignature::new("f", int_ty.clone(), int_ty).static_method().generic(1);
        let policy = ReferencePolicy::new();
        let registry = build_registry(&policy, &[sig], &[]);
        assert!(registry.by_arity.is_empty());
        assert!(registry.params_pool.is_empty());
    }
}
