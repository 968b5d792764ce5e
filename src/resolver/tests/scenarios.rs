//! End-to-end pipeline tests for the six literal call-site scenarios this
//! resolver is specified against, plus the arity/ambiguity edge cases they
//! imply.

use overload_resolver::reference::ReferencePolicy;
use overload_resolver::{
    make_invalid_parameters_error, BindingTarget, ErrorInfo, HostType, NarrowingLevel,
    OverloadResolver, RawParameter, RawSignature,
};

/// Builds a static (no implicit instance parameter) test signature, since the
/// literal scenarios this module covers are about overload mechanics, not
/// instance dispatch.
fn sig(name: &str, declaring: &str, params: Vec<RawParameter>) -> RawSignature {
    RawSignature::new(name, HostType::named(declaring), HostType::top())
        .with_params(params)
        .static_method()
}

fn resolver(
    method_name: &str,
    signatures: Vec<RawSignature>,
    policy: ReferencePolicy,
) -> OverloadResolver<ReferencePolicy> {
    OverloadResolver::new(policy, method_name, signatures, NarrowingLevel::MIN, NarrowingLevel::MAX)
}

#[test]
fn foo_picks_the_matching_arity_bucket() {
    let int_ty = HostType::primitive("int");
    let obj = HostType::top();
    let signatures = vec![
        sig(
            "foo",
            "Foo",
            vec![
                RawParameter::new("a", int_ty.clone()),
                RawParameter::new("b", int_ty.clone()),
            ],
        ),
        sig(
            "foo",
            "Foo",
            vec![
                RawParameter::new("a", obj.clone()),
                RawParameter::new("b", obj.clone()),
                RawParameter::new("c", obj),
            ],
        ),
    ];
    let policy = ReferencePolicy::new().with_positional([int_ty.clone(), int_ty]);
    let mut r = resolver("foo", signatures, policy);

    match r.resolve_overload() {
        BindingTarget::Success { candidate, narrowing_level, restrictions } => {
            assert_eq!(candidate.parameter_count(), 2);
            assert_eq!(narrowing_level, NarrowingLevel::None);
            assert!(restrictions.is_empty());
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn bar_specializes_a_params_array_candidate_to_the_call_arity() {
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig(
        "bar",
        "Bar",
        vec![RawParameter::new("items", HostType::array(int_ty.clone(), 1)).params_array()],
    )];
    let policy = ReferencePolicy::new().with_positional(vec![int_ty.clone(), int_ty.clone(), int_ty.clone(), int_ty]);
    let mut r = resolver("bar", signatures, policy);

    match r.resolve_overload() {
        BindingTarget::Success { candidate, narrowing_level, .. } => {
            assert_eq!(candidate.parameter_count(), 4);
            assert_eq!(narrowing_level, NarrowingLevel::None);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn baz_prefers_the_tighter_numeric_overload() {
    let int_ty = HostType::primitive("int");
    let long_ty = HostType::primitive("long");
    let signatures = vec![
        sig("baz", "Baz", vec![RawParameter::new("x", int_ty.clone())]),
        sig("baz", "Baz", vec![RawParameter::new("x", long_ty)]),
    ];
    let policy = ReferencePolicy::new().with_positional([int_ty.clone()]);
    let mut r = resolver("baz", signatures, policy);

    match r.resolve_overload() {
        BindingTarget::Success { candidate, .. } => {
            assert_eq!(candidate.parameters[0].ty, int_ty);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn qux_prefers_the_narrower_assignable_type() {
    let string_ty = HostType::named("string");
    let obj = HostType::top();
    let signatures = vec![
        sig("qux", "Qux", vec![RawParameter::new("x", obj)]),
        sig("qux", "Qux", vec![RawParameter::new("x", string_ty.clone())]),
    ];
    let policy = ReferencePolicy::new().with_positional([string_ty.clone()]);
    let mut r = resolver("qux", signatures, policy);

    match r.resolve_overload() {
        BindingTarget::Success { candidate, .. } => {
            assert_eq!(candidate.parameters[0].ty, string_ty);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn m_with_conflicting_argument_preferences_is_ambiguous() {
    let int_ty = HostType::primitive("int");
    let obj = HostType::top();
    let signatures = vec![
        sig("m", "M", vec![RawParameter::new("a", int_ty.clone()), RawParameter::new("b", obj.clone())]),
        sig("m", "M", vec![RawParameter::new("a", obj), RawParameter::new("b", int_ty.clone())]),
    ];
    let policy = ReferencePolicy::new().with_positional([int_ty.clone(), int_ty]);
    let mut r = resolver("m", signatures, policy);

    match r.resolve_overload() {
        BindingTarget::AmbiguousMatch { methods } => assert_eq!(methods.len(), 2),
        other => panic!("expected AmbiguousMatch, got {other:?}"),
    }
}

#[test]
fn m_named_only_call_with_wrong_parameter_name_fails_naming() {
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig("m", "M", vec![RawParameter::new("y", int_ty.clone())])];
    let policy = ReferencePolicy::new().with_named("x", int_ty);
    let mut r = resolver("m", signatures, policy);

    let target = r.resolve_overload();
    let error = make_invalid_parameters_error(&target);
    match error {
        ErrorInfo::UnassignableKeyword(name) => assert_eq!(name, "x"),
        other => panic!("expected UnassignableKeyword, got {other:?}"),
    }
}

#[test]
fn incorrect_argument_count_short_circuits_without_conversion_probing() {
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig("foo", "Foo", vec![RawParameter::new("a", int_ty.clone())])];
    let policy = ReferencePolicy::new().with_positional([int_ty.clone(), int_ty]);
    let mut r = resolver("foo", signatures, policy);

    match r.resolve_overload() {
        BindingTarget::IncorrectArgumentCount { actual, .. } => assert_eq!(actual, 2),
        other => panic!("expected IncorrectArgumentCount, got {other:?}"),
    }
}

#[test]
fn params_array_call_with_a_one_element_collapsed_splat_tail_still_resolves() {
    // Two splat elements against a single-parameter params-array candidate
    // leaves a budget of one expanded slot and a one-element collapsed tail
    // (`ActualArguments::collapsed_count == 1`) — the narrowest non-empty case
    // of the splat-probing path `applicability::probe` exercises separately in
    // isolation.
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig(
        "bar",
        "Bar",
        vec![RawParameter::new("items", HostType::array(int_ty.clone(), 1)).params_array()],
    )];
    let policy = ReferencePolicy::new().with_splat([int_ty.clone(), int_ty]);
    let mut r = resolver("bar", signatures, policy);

    match r.resolve_overload() {
        BindingTarget::Success { candidate, narrowing_level, restrictions } => {
            assert_eq!(candidate.parameter_count(), 1);
            assert_eq!(narrowing_level, NarrowingLevel::None);
            assert!(restrictions.is_empty());
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(r.get_actual_arguments().unwrap().collapsed_count, 1);
}

#[test]
fn resolving_twice_panics() {
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig("foo", "Foo", vec![RawParameter::new("a", int_ty.clone())])];
    let policy = ReferencePolicy::new().with_positional([int_ty]);
    let mut r = resolver("foo", signatures, policy);
    let _ = r.resolve_overload();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| r.resolve_overload()));
    assert!(result.is_err());
}

#[test]
fn get_actual_arguments_is_populated_after_resolving() {
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig("foo", "Foo", vec![RawParameter::new("a", int_ty.clone())])];
    let policy = ReferencePolicy::new().with_positional([int_ty]);
    let mut r = resolver("foo", signatures, policy);

    assert!(r.get_actual_arguments().is_none());
    let _ = r.resolve_overload();
    assert_eq!(r.get_actual_arguments().unwrap().count(), 1);
}
