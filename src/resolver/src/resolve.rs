//! The top-level pipeline driver tying stages 1-5 together (`spec.md` §5).

use log::{debug, trace, warn};

use crate::actual_args::{compute_splat_limits, normalize, ActualArguments};
use crate::applicability::{filter_at_level, ApplicableCandidate};
use crate::binder::{bind, NameBindingFailure};
use crate::candidate::{build_registry, CandidateRegistry};
use crate::error::{ArityBound, BindingTarget, FailureReason};
use crate::policy::BindingPolicy;
use crate::preference::find_best;
use crate::restrictions;
use crate::signature::RawSignature;
use crate::types::NarrowingLevel;

/// Drives one resolution attempt for a single call site against one set of
/// candidate signatures. Built once per call, run once, then discarded.
pub struct OverloadResolver<P: BindingPolicy> {
    policy: P,
    method_name: String,
    signatures: Vec<RawSignature>,
    min_level: NarrowingLevel,
    max_level: NarrowingLevel,
    resolved: bool,
    registry: Option<CandidateRegistry>,
    actual: Option<ActualArguments>,
}

impl<P: BindingPolicy> OverloadResolver<P> {
    pub fn new(
        policy: P,
        method_name: impl Into<String>,
        signatures: Vec<RawSignature>,
        min_level: NarrowingLevel,
        max_level: NarrowingLevel,
    ) -> Self {
        assert!(min_level <= max_level, "min_level must be <= max_level");
        assert!(!signatures.is_empty(), "resolve_overload requires at least one candidate signature");
        OverloadResolver {
            policy,
            method_name: method_name.into(),
            signatures,
            min_level,
            max_level,
            resolved: false,
            registry: None,
            actual: None,
        }
    }

    /// The normalized call-site record stage 2 produced. Valid only after
    /// `resolve_overload` has run.
    pub fn get_actual_arguments(&self) -> Option<&ActualArguments> {
        self.actual.as_ref()
    }

    /// Runs the full five-stage pipeline and returns the resolution outcome.
    /// A resolver is single-use: calling this twice on the same instance is a
    /// programmer error (`spec.md` §5) and panics rather than re-resolving.
    pub fn resolve_overload(&mut self) -> BindingTarget {
        assert!(!self.resolved, "resolve_overload called twice on the same OverloadResolver");
        self.resolved = true;

        let (named, names) = self.policy.get_named_arguments();
        let registry = build_registry(&self.policy, &self.signatures, &names);
        let (pre_splat_limit, post_splat_limit) = compute_splat_limits(&registry);

        let actual = match normalize(&self.policy, &named, &names, pre_splat_limit, post_splat_limit) {
            Some(a) => a,
            None => {
                warn!("{}: embedder rejected the call shape during normalization", self.method_name);
                self.registry = Some(registry);
                return BindingTarget::InvalidArguments;
            }
        };

        trace!(
            "{}: normalized to {} actual argument(s), {} collapsed",
            self.method_name,
            actual.count(),
            actual.collapsed_count
        );

        let actual_count = actual.count();
        let set = match registry.candidate_set_for(actual_count, actual.collapsed_count, &names) {
            Some(set) if !set.is_effectively_empty() => set,
            _ => {
                let mut expected: Vec<ArityBound> =
                    registry.bucket_arities().into_iter().map(ArityBound::Exact).collect();
                if registry.has_variadic_candidates() {
                    expected.push(ArityBound::OrMore(registry.max_bucket_arity()));
                }
                debug!("{}: no candidate set accepts arity {}", self.method_name, actual_count);
                self.registry = Some(registry);
                self.actual = Some(actual);
                return BindingTarget::IncorrectArgumentCount { expected_arities: expected, actual: actual_count };
            }
        };

        let mut bound: Vec<ApplicableCandidate> = Vec::new();
        let mut name_failures: Vec<FailureReason> = Vec::new();
        for candidate in set.candidates.into_iter().filter(|c| !c.has_params_dictionary()) {
            match bind(&self.policy, &candidate, &actual) {
                Ok(binding) => bound.push(ApplicableCandidate { candidate, binding }),
                Err(reason) => {
                    trace!("{}: candidate dropped at name binding: {:?}", self.method_name, reason);
                    name_failures.push(FailureReason::Name(reason));
                }
            }
        }

        if bound.is_empty() {
            self.registry = Some(registry);
            self.actual = Some(actual);
            return BindingTarget::CallFailure { failures: dedupe_name_failures(name_failures) };
        }

        let mut last_level_failures: Vec<FailureReason> = Vec::new();
        let mut outcome: Option<BindingTarget> = None;

        for level in NarrowingLevel::range_inclusive(self.min_level, self.max_level) {
            let (survivors, failures) = filter_at_level(&self.policy, &actual, &bound, level);
            if survivors.is_empty() {
                last_level_failures = failures.into_iter().map(FailureReason::Conversion).collect();
                continue;
            }

            let (winner, siblings) = if survivors.len() == 1 {
                let mut survivors = survivors;
                (survivors.remove(0), Vec::new())
            } else {
                match find_best(&self.policy, &actual, &survivors) {
                    Some(idx) => {
                        let mut survivors = survivors;
                        let winner = survivors.remove(idx);
                        (winner, survivors)
                    }
                    None => {
                        debug!("{}: ambiguous match at narrowing level {}", self.method_name, level);
                        outcome = Some(BindingTarget::AmbiguousMatch {
                            methods: survivors.into_iter().map(|ac| ac.candidate).collect(),
                        });
                        break;
                    }
                }
            };

            debug!("{}: resolved at narrowing level {}", self.method_name, level);
            let restrictions = restrictions::compute(&self.policy, &actual, &winner, &siblings);
            outcome = Some(BindingTarget::Success {
                candidate: winner.candidate,
                narrowing_level: level,
                restrictions,
            });
            break;
        }

        self.registry = Some(registry);
        self.actual = Some(actual);

        outcome.unwrap_or_else(|| {
            let mut failures = last_level_failures;
            failures.extend(dedupe_name_failures(name_failures));
            BindingTarget::CallFailure { failures }
        })
    }
}

/// Per `spec.md` §7: name-binding failures are suppressed while any candidate
/// survives naming, but folded back in as "unreported" context if the call
/// ultimately fails outright. Collapses repeats so the same unassignable name
/// reported by several sibling candidates doesn't appear once per candidate.
fn dedupe_name_failures(failures: Vec<FailureReason>) -> Vec<FailureReason> {
    let mut seen: Vec<NameBindingFailure> = Vec::new();
    failures
        .into_iter()
        .filter(|f| match f {
            FailureReason::Name(reason) => {
                if seen.contains(reason) {
                    false
                } else {
                    seen.push(reason.clone());
                    true
                }
            }
            FailureReason::Conversion(_) => true,
        })
        .collect()
}
