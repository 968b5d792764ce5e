//! Stage 3: name binding (`spec.md` §4.4).

use thiserror::Error;

use crate::actual_args::ActualArguments;
use crate::candidate::MethodCandidate;
use crate::policy::BindingPolicy;

/// A permutation mapping each parameter index of a candidate to a source
/// index in the unified (positional-then-named) `ActualArguments` address
/// space.
#[derive(Debug, Clone)]
pub struct ArgumentBinding {
    pub slot_sources: Vec<usize>,
}

/// Why a candidate failed name binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameBindingFailure {
    #[error("keyword argument '{0}' is already bound")]
    DuplicateKeyword(String),
    #[error("keyword argument '{0}' does not match any parameter")]
    UnassignableKeyword(String),
}

/// Binds one candidate's parameters against the actual arguments. Positional
/// arguments fill slots 0..positional.len() by position; named arguments are
/// then matched against the remaining slots by declared parameter name.
///
/// Per `spec.md` §4.4, candidates whose `has_params_dictionary()` is true are
/// not attempted here at all (the caller filters those out beforehand).
pub fn bind<P: BindingPolicy>(
    policy: &P,
    candidate: &MethodCandidate,
    actual: &ActualArguments,
) -> Result<ArgumentBinding, NameBindingFailure> {
    debug_assert!(!candidate.has_params_dictionary());

    let positional_count = actual.positional.len();
    let mut slot_sources: Vec<usize> = (0..candidate.parameter_count().min(positional_count)).collect();
    // Candidates always have exactly `actual.count()` parameters once they are
    // members of the CandidateSet selected for this call (see candidate.rs /
    // resolve.rs), so the positional prefix always fits; pad defensively so a
    // malformed candidate doesn't panic downstream.
    slot_sources.resize(candidate.parameter_count(), usize::MAX);

    for (i, name) in actual.names.iter().enumerate() {
        let source_index = positional_count + i;
        let param_slot = candidate.parameters.iter().enumerate().find_map(|(slot, p)| {
            let raw_index = p.raw_index?;
            let raw_name = candidate.signature.parameters.get(raw_index)?.name.as_deref()?;
            (raw_name == name.as_str()).then_some(slot)
        });

        match param_slot {
            Some(slot) if slot < positional_count => {
                return Err(NameBindingFailure::DuplicateKeyword(name.clone()));
            }
            Some(slot) => {
                if slot_sources[slot] != usize::MAX {
                    return Err(NameBindingFailure::DuplicateKeyword(name.clone()));
                }
                slot_sources[slot] = source_index;
            }
            None => {
                // `spec.md` §6 gates an additional "named arg sets a settable
                // member instead of a parameter" mode behind
                // `allow_keyword_argument_setting`; this reference binder
                // doesn't model settable members, so even when the hook
                // returns true an unmatched name is still unassignable.
                let _ = policy.allow_keyword_argument_setting(&candidate.signature);
                return Err(NameBindingFailure::UnassignableKeyword(name.clone()));
            }
        }
    }

    if slot_sources.iter().any(|&s| s == usize::MAX) {
        // A declared parameter slot received neither a positional nor a named
        // argument. This candidate's arity shouldn't have been selected for
        // this actual-argument count in the first place (see
        // `CandidateRegistry::candidate_set_for`); treat defensively as an
        // unassignable candidate rather than binding garbage.
        return Err(NameBindingFailure::UnassignableKeyword(String::new()));
    }

    Ok(ArgumentBinding { slot_sources })
}
