//! Stage 5's pairwise comparison: per-argument preference plus structural
//! tie-breakers (`spec.md` §4.6).

use crate::actual_args::ActualArguments;
use crate::applicability::ApplicableCandidate;
use crate::policy::{BindingPolicy, Candidate};
use crate::types::{NarrowingLevel, ParameterWrapper};

/// Compares two applicable candidates. `Candidate::One` means `one` is
/// preferred, `Two` means `two` is preferred, `Equivalent` means neither
/// dominates (and a later tie-break, or a caller-level ambiguity, decides),
/// `Ambiguous` means the per-argument votes directly conflicted.
pub fn compare<P: BindingPolicy>(
    policy: &P,
    actual: &ActualArguments,
    one: &ApplicableCandidate,
    two: &ApplicableCandidate,
) -> Candidate {
    let arg_verdict = compare_per_argument(policy, actual, one, two);
    if arg_verdict != Candidate::Equivalent {
        return arg_verdict;
    }
    compare_structural(one, two)
}

fn compare_per_argument<P: BindingPolicy>(
    policy: &P,
    actual: &ActualArguments,
    one: &ApplicableCandidate,
    two: &ApplicableCandidate,
) -> Candidate {
    let mut verdict = Candidate::Equivalent;
    for source_index in 0..actual.count() {
        let slot_one = one.binding.slot_sources.iter().position(|&s| s == source_index);
        let slot_two = two.binding.slot_sources.iter().position(|&s| s == source_index);
        let (Some(s1), Some(s2)) = (slot_one, slot_two) else { continue };
        let p1 = &one.candidate.parameters[s1];
        let p2 = &two.candidate.parameters[s2];
        let actual_ty = &actual.get(source_index).limit_type;
        let vote = prefer_argument(policy, p1, p2, actual_ty);
        verdict = fold_vote(verdict, vote);
    }
    verdict
}

/// `spec.md` §4.6's aggregation rule: order-independent, `Equivalent` is
/// neutral, a `One`/`Two` conflict is absorbing toward `Ambiguous`, and a
/// subsequent decisive vote can still override an `Ambiguous` running state.
fn fold_vote(state: Candidate, vote: Candidate) -> Candidate {
    match vote {
        Candidate::Equivalent => state,
        Candidate::One | Candidate::Two => match state {
            Candidate::Equivalent | Candidate::Ambiguous => vote,
            _ if state == vote => state,
            _ => Candidate::Ambiguous,
        },
        Candidate::Ambiguous => match state {
            Candidate::Equivalent => Candidate::Ambiguous,
            _ => state,
        },
    }
}

fn prefer_argument<P: BindingPolicy>(
    policy: &P,
    p1: &ParameterWrapper,
    p2: &ParameterWrapper,
    actual_ty: &crate::types::HostType,
) -> Candidate {
    if policy.parameters_equivalent(p1, p2) {
        return Candidate::Equivalent;
    }

    for level in NarrowingLevel::range_inclusive(NarrowingLevel::MIN, NarrowingLevel::MAX) {
        let verdict = policy.select_best_conversion_for(actual_ty, p1, p2, level);
        if verdict != Candidate::Equivalent {
            return verdict;
        }
    }

    let one_to_two = policy.can_convert_from(&p1.ty, p2, NarrowingLevel::None);
    let two_to_one = policy.can_convert_from(&p2.ty, p1, NarrowingLevel::None);
    if one_to_two && !two_to_one {
        return Candidate::One;
    }
    if two_to_one && !one_to_two {
        return Candidate::Two;
    }

    let forward = policy.prefer_convert(&p1.ty, &p2.ty);
    if forward != Candidate::Ambiguous && forward != Candidate::Equivalent {
        return forward;
    }
    policy.prefer_convert(&p2.ty, &p1.ty).inverted()
}

fn compare_structural(one: &ApplicableCandidate, two: &ApplicableCandidate) -> Candidate {
    // 1. Accessibility: non-private beats private.
    match (one.candidate.is_private(), two.candidate.is_private()) {
        (false, true) => return Candidate::One,
        (true, false) => return Candidate::Two,
        _ => {}
    }

    // 2. Generic specificity: non-generic beats generic. Generic-vs-generic is
    // declared Equivalent per spec.md §9 ("least generic" is a known TODO —
    // a structural comparison over generic argument lists could replace this
    // without changing any other behavior).
    match (one.candidate.is_generic(), two.candidate.is_generic()) {
        (false, true) => return Candidate::One,
        (true, false) => return Candidate::Two,
        _ => {}
    }

    // 3. Fewer out parameters wins.
    let one_out = one.candidate.return_builder.count_out_params();
    let two_out = two.candidate.return_builder.count_out_params();
    if one_out != two_out {
        return if one_out < two_out { Candidate::One } else { Candidate::Two };
    }

    // 4. Arg-builder priority bands, high to low: "earlier conversion rules
    // dominate later ones".
    compare_builder_priority_bands(one, two)
}

fn compare_builder_priority_bands(one: &ApplicableCandidate, two: &ApplicableCandidate) -> Candidate {
    let mut bands: Vec<u32> = one
        .candidate
        .arg_builders
        .iter()
        .chain(two.candidate.arg_builders.iter())
        .map(|b| b.priority.0)
        .collect();
    bands.sort_unstable();
    bands.dedup();
    bands.reverse();

    for band in bands {
        let max_one = max_priority_at_most(one, band);
        let max_two = max_priority_at_most(two, band);
        if max_one != max_two {
            return match (max_one, max_two) {
                (Some(a), Some(b)) => if a < b { Candidate::One } else { Candidate::Two },
                (Some(_), None) => Candidate::One,
                (None, Some(_)) => Candidate::Two,
                (None, None) => unreachable!(),
            };
        }
    }
    Candidate::Equivalent
}

fn max_priority_at_most(candidate: &ApplicableCandidate, band: u32) -> Option<u32> {
    candidate.candidate.arg_builders.iter().map(|b| b.priority.0).filter(|&p| p <= band).max()
}

/// Finds the unique candidate that is preferred (`Candidate::One`) over every
/// other survivor. Returns `None` if no candidate dominates all the others.
pub fn find_best<P: BindingPolicy>(
    policy: &P,
    actual: &ActualArguments,
    survivors: &[ApplicableCandidate],
) -> Option<usize> {
    (0..survivors.len()).find(|&i| {
        (0..survivors.len()).all(|j| {
            i == j || compare(policy, actual, &survivors[i], &survivors[j]) == Candidate::One
        })
    })
}
