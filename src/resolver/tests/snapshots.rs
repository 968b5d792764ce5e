//! Snapshot tests for the serializable shapes a caller actually sees:
//! `ErrorInfo` for failed resolutions, and `Restriction` for successful ones.

use overload_resolver::reference::ReferencePolicy;
use overload_resolver::{
    make_invalid_parameters_error, BindingTarget, HostType, NarrowingLevel, OverloadResolver,
    RawParameter, RawSignature,
};

fn sig(name: &str, params: Vec<RawParameter>) -> RawSignature {
    RawSignature::new(name, HostType::named("Demo"), HostType::top()).with_params(params).static_method()
}

#[test]
fn snapshot_incorrect_argument_count_error() {
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig("f", vec![RawParameter::new("a", int_ty.clone())])];
    let policy = ReferencePolicy::new().with_positional([int_ty.clone(), int_ty]);
    let mut resolver = OverloadResolver::new(policy, "f", signatures, NarrowingLevel::MIN, NarrowingLevel::MAX);
    let target = resolver.resolve_overload();
    let error = make_invalid_parameters_error(&target);
    insta::assert_json_snapshot!("incorrect_argument_count", error);
}

#[test]
fn snapshot_unassignable_keyword_error() {
    let int_ty = HostType::primitive("int");
    let signatures = vec![sig("f", vec![RawParameter::new("y", int_ty.clone())])];
    let policy = ReferencePolicy::new().with_named("x", int_ty);
    let mut resolver = OverloadResolver::new(policy, "f", signatures, NarrowingLevel::MIN, NarrowingLevel::MAX);
    let target = resolver.resolve_overload();
    let error = make_invalid_parameters_error(&target);
    insta::assert_json_snapshot!("unassignable_keyword", error);
}

#[test]
fn snapshot_ambiguous_match_error() {
    let int_ty = HostType::primitive("int");
    let obj = HostType::top();
    let signatures = vec![
        sig("m", vec![RawParameter::new("a", int_ty.clone()), RawParameter::new("b", obj.clone())]),
        sig("m", vec![RawParameter::new("a", obj), RawParameter::new("b", int_ty.clone())]),
    ];
    let policy = ReferencePolicy::new().with_positional([int_ty.clone(), int_ty]);
    let mut resolver = OverloadResolver::new(policy, "m", signatures, NarrowingLevel::MIN, NarrowingLevel::MAX);
    let target = resolver.resolve_overload();
    let error = make_invalid_parameters_error(&target);
    insta::assert_json_snapshot!("ambiguous_match", error);
}

#[test]
fn snapshot_success_restrictions() {
    let int_ty = HostType::primitive("int");
    let obj = HostType::top();
    let signatures = vec![sig("qux", vec![RawParameter::new("x", obj.clone())]), sig("qux", vec![RawParameter::new("x", int_ty.clone())])];
    let policy = ReferencePolicy::new().with_positional([int_ty]);
    let mut resolver = OverloadResolver::new(policy, "qux", signatures, NarrowingLevel::MIN, NarrowingLevel::MAX);
    match resolver.resolve_overload() {
        BindingTarget::Success { restrictions, .. } => {
            insta::assert_json_snapshot!("success_restrictions", restrictions);
        }
        other => panic!("expected success, got {other:?}"),
    }
}
