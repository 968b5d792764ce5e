//! Runtime type restriction computation (`spec.md` §4.7).

use crate::actual_args::ActualArguments;
use crate::applicability::ApplicableCandidate;
use crate::policy::BindingPolicy;
use crate::types::HostType;

/// A runtime type guard emitted alongside a successful binding, telling a
/// caching layer under what argument shapes the binding may be reused.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Restriction {
    /// Restrict argument `argument_index` to its observed runtime type.
    ToRuntimeType { argument_index: usize, runtime_type: HostType },
    /// Restrict argument `argument_index`, but without any value coercion —
    /// used when the parameter type is the universal top type, where
    /// boxing/unboxing the argument would be observably wrong.
    ToTopTypeOnly { argument_index: usize },
}

/// Computes the restriction list for `winner`, given every other candidate
/// that was applicable at the winning narrowing level (siblings considered
/// for the "overloaded on parameter i" rule).
pub fn compute<P: BindingPolicy>(
    policy: &P,
    actual: &ActualArguments,
    winner: &ApplicableCandidate,
    other_applicable: &[ApplicableCandidate],
) -> Vec<Restriction> {
    let mut restrictions = Vec::new();

    for (i, param) in winner.candidate.parameters.iter().enumerate() {
        let source = winner.binding.slot_sources[i];
        let arg = actual.get(source);

        let overloaded_on_i = other_applicable.iter().any(|sibling| {
            let sibling_ty = type_at_position(sibling, i);
            match sibling_ty {
                Some(t) => t != param.ty,
                None => false,
            }
        });

        let needs_restriction = overloaded_on_i || !is_assignable_without_restriction(policy, &arg.static_type, param);

        if !needs_restriction {
            continue;
        }

        if param.ty.is_top() {
            restrictions.push(Restriction::ToTopTypeOnly { argument_index: i });
        } else {
            restrictions.push(Restriction::ToRuntimeType {
                argument_index: i,
                runtime_type: arg.limit_type.clone(),
            });
        }
    }

    restrictions
}

/// The type a sibling candidate presents at logical argument position `i`,
/// treating a trailing params-array parameter as a distinct type at any
/// position beyond its own declared parameter count (`spec.md` §4.7's
/// "params-array elements compared against the array element type" rule).
fn type_at_position(candidate: &ApplicableCandidate, i: usize) -> Option<HostType> {
    if let Some(param) = candidate.candidate.parameters.get(i) {
        Some(param.ty.clone())
    } else {
        candidate.candidate.params_element_type.clone()
    }
}

fn is_assignable_without_restriction<P: BindingPolicy>(
    policy: &P,
    static_type: &HostType,
    param: &crate::types::ParameterWrapper,
) -> bool {
    policy.can_convert_from(static_type, param, crate::types::NarrowingLevel::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::ApplicableCandidate;
    use crate::arg_builder::ArgBuilder;
    use crate::binder::ArgumentBinding;
    use crate::candidate::MethodCandidate;
    use crate::reference::ReferencePolicy;
    use crate::signature::{RawParameter, RawSignature};
    use crate::types::ParameterWrapper;
    use std::rc::Rc;

    fn single_arg_actual(ty: HostType) -> ActualArguments {
        ActualArguments {
            positional: vec![crate::actual_args::ActualArgument::new(ty)],
            named: Vec::new(),
            names: Vec::new(),
            splat_index: -1,
            collapsed_count: 0,
            collapsed_items: Vec::new(),
            visible_count: 1,
        }
    }

    fn candidate_with_param(ty: HostType) -> ApplicableCandidate {
        let sig = Rc::new(
            RawSignature::new("f", ty.clone(), ty.clone())
                .static_method()
                .with_params(vec![RawParameter::new("x", ty.clone())]),
        );
        ApplicableCandidate {
            candidate: MethodCandidate {
                signature: sig,
                parameters: vec![ParameterWrapper::simple(ty, false)],
                arg_builders: vec![ArgBuilder::positional()],
                return_builder: Default::default(),
                params_array_index: None,
                params_element_type: None,
            },
            binding: ArgumentBinding { slot_sources: vec![0] },
        }
    }

    #[test]
    fn object_parameter_overloaded_on_a_sibling_gets_a_top_type_only_restriction() {
        let policy = ReferencePolicy::new();
        let actual = single_arg_actual(HostType::named("Widget"));
        let winner = candidate_with_param(HostType::top());
        let sibling = candidate_with_param(HostType::primitive("int"));
        let restrictions = compute(&policy, &actual, &winner, &[sibling]);
        assert_eq!(restrictions, vec![Restriction::ToTopTypeOnly { argument_index: 0 }]);
    }

    #[test]
    fn no_siblings_and_assignable_static_type_needs_no_restriction() {
        let policy = ReferencePolicy::new();
        let actual = single_arg_actual(HostType::named("Widget"));
        let winner = candidate_with_param(HostType::top());
        let restrictions = compute(&policy, &actual, &winner, &[]);
        assert!(restrictions.is_empty());
    }

    #[test]
    fn identical_static_and_parameter_type_needs_no_restriction() {
        let policy = ReferencePolicy::new();
        let int_ty = HostType::primitive("int");
        let actual = single_arg_actual(int_ty.clone());
        let winner = candidate_with_param(int_ty);
        let restrictions = compute(&policy, &actual, &winner, &[]);
        assert!(restrictions.is_empty());
    }
}
