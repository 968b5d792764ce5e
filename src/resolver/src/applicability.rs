//! Stage 4: applicability filtering per narrowing level (`spec.md` §4.5).

use crate::actual_args::ActualArguments;
use crate::binder::ArgumentBinding;
use crate::candidate::MethodCandidate;
use crate::error::ConversionResult;
use crate::policy::BindingPolicy;
use crate::types::NarrowingLevel;

/// A candidate paired with the binding that made it a name-binding survivor.
#[derive(Debug, Clone)]
pub struct ApplicableCandidate {
    pub candidate: MethodCandidate,
    pub binding: ArgumentBinding,
}

/// Tests one candidate's applicability at `level`: every actual-to-formal
/// conversion (including any collapsed splat tail) must succeed.
pub fn probe<P: BindingPolicy>(
    policy: &P,
    actual: &ActualArguments,
    candidate: &MethodCandidate,
    binding: &ArgumentBinding,
    level: NarrowingLevel,
) -> Result<(), Vec<ConversionResult>> {
    let mut failures = Vec::new();

    for (slot, param) in candidate.parameters.iter().enumerate() {
        let source = binding.slot_sources[slot];
        let arg = actual.get(source);
        if !policy.can_convert_from(&arg.limit_type, param, level) {
            failures.push(ConversionResult {
                argument_index: slot,
                from: arg.limit_type.clone(),
                to: param.ty.clone(),
                failed: true,
            });
        }
    }

    if failures.is_empty() && actual.collapsed_count > 0 {
        if let Some(element_ty) = &candidate.params_element_type {
            for i in 0..actual.collapsed_count {
                let item_ty = policy.get_splatted_item(actual, i);
                let synthetic = crate::types::ParameterWrapper::simple(element_ty.clone(), false);
                if !policy.can_convert_from(&item_ty, &synthetic, level) {
                    failures.push(ConversionResult {
                        argument_index: actual.positional.len() + i,
                        from: item_ty,
                        to: element_ty.clone(),
                        failed: true,
                    });
                    break;
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

/// Runs [`probe`] over every name-bound candidate at `level`, splitting
/// survivors from failures.
pub fn filter_at_level<P: BindingPolicy>(
    policy: &P,
    actual: &ActualArguments,
    bound: &[ApplicableCandidate],
    level: NarrowingLevel,
) -> (Vec<ApplicableCandidate>, Vec<Vec<ConversionResult>>) {
    let mut survivors = Vec::new();
    let mut failures = Vec::new();
    for ac in bound {
        match probe(policy, actual, &ac.candidate, &ac.binding, level) {
            Ok(()) => survivors.push(ac.clone()),
            Err(f) => failures.push(f),
        }
    }
    (survivors, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg_builder::ArgBuilder;
    use crate::candidate::MethodCandidate;
    use crate::reference::ReferencePolicy;
    use crate::signature::{RawParameter, RawSignature};
    use crate::types::ParameterWrapper;
    use std::rc::Rc;

    fn params_array_candidate(element_ty: crate::types::HostType, arity: usize) -> MethodCandidate {
        let sig = Rc::new(
            RawSignature::new("f", element_ty.clone(), element_ty.clone())
                .static_method()
                .with_params(vec![RawParameter::new("items", crate::types::HostType::array(element_ty.clone(), 1)).params_array()]),
        );
        MethodCandidate {
            signature: sig,
            parameters: (0..arity).map(|_| ParameterWrapper::simple(element_ty.clone(), false)).collect(),
            arg_builders: (0..arity).map(ArgBuilder::params_expanded).collect(),
            return_builder: Default::default(),
            params_array_index: None,
            params_element_type: Some(element_ty),
        }
    }

    #[test]
    fn collapsed_tail_elements_are_probed_against_the_array_element_type() {
        let int_ty = crate::types::HostType::primitive("int");
        let candidate = params_array_candidate(int_ty.clone(), 0);
        let binding = ArgumentBinding { slot_sources: Vec::new() };
        let actual = ActualArguments {
            positional: Vec::new(),
            named: Vec::new(),
            names: Vec::new(),
            splat_index: 0,
            collapsed_count: 1,
            collapsed_items: vec![crate::types::HostType::named("Widget")],
            visible_count: 1,
        };
        let policy = ReferencePolicy::new();
        let result = probe(&policy, &actual, &candidate, &binding, NarrowingLevel::None);
        assert!(result.is_err());

        let ok_actual = ActualArguments { collapsed_items: vec![int_ty], ..actual };
        assert!(probe(&policy, &ok_actual, &candidate, &binding, NarrowingLevel::None).is_ok());
    }
}
