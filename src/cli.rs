use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Deserialize;

use overload_resolver::signature::display_signature;
use overload_resolver::{
    make_invalid_parameters_error, BindingTarget, HostType, NarrowingLevel, OverloadResolver,
    RawParameter, RawSignature, RefKind,
};
use overload_resolver::reference::ReferencePolicy;

#[derive(Parser)]
#[command(name = "overload_bridge")]
#[command(about = "Overload resolution demo harness", version, author)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve one call site against a JSON-described set of candidate
    /// signatures and print the outcome.
    Resolve {
        /// Path to a `ResolveRequest` JSON document.
        #[arg(required = true)]
        input: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { input } => resolve(input),
    }
}

/// The CLI's JSON input shape. Not part of the resolver's public surface —
/// this is ambient glue so the pipeline can be exercised without a real host
/// runtime, per `BindingPolicy`'s own doc comment.
#[derive(Debug, Deserialize)]
struct ResolveRequest {
    method_name: String,
    #[serde(default)]
    min_level: Option<String>,
    #[serde(default)]
    max_level: Option<String>,
    signatures: Vec<SignatureSpec>,
    call: CallSpec,
}

#[derive(Debug, Deserialize)]
struct SignatureSpec {
    name: String,
    #[serde(default)]
    declaring_type: Option<TypeSpec>,
    #[serde(default)]
    return_type: Option<TypeSpec>,
    #[serde(default)]
    is_static: bool,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    generic_arity: usize,
    #[serde(default)]
    parameters: Vec<ParameterSpec>,
}

#[derive(Debug, Deserialize)]
struct ParameterSpec {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    ty: TypeSpec,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    ref_kind: Option<String>,
    #[serde(default)]
    params_array: bool,
    #[serde(default)]
    params_dict: bool,
    #[serde(default)]
    not_null: bool,
}

#[derive(Debug, Default, Deserialize)]
struct CallSpec {
    #[serde(default)]
    positional: Vec<TypeSpec>,
    #[serde(default)]
    splat: Vec<TypeSpec>,
    #[serde(default)]
    named: BTreeMap<String, TypeSpec>,
}

/// A minimal, recursive type descriptor: a bare string names a primitive or
/// named type (`"object"`/`"dynamic"` map to the respective [`HostType`]
/// singletons), `{"array": ...}` and `{"nullable": ...}` wrap another spec.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeSpec {
    Name(String),
    Array { array: Box<TypeSpec> },
    Nullable { nullable: Box<TypeSpec> },
}

fn to_host_type(spec: &TypeSpec) -> HostType {
    match spec {
        TypeSpec::Name(name) => match name.as_str() {
            "object" => HostType::top(),
            "dynamic" => HostType::dynamic(),
            _ => HostType::primitive(name.clone()),
        },
        TypeSpec::Array { array } => HostType::array(to_host_type(array), 1),
        TypeSpec::Nullable { nullable } => HostType::nullable(to_host_type(nullable)),
    }
}

fn to_ref_kind(spec: &Option<String>) -> RefKind {
    match spec.as_deref() {
        Some("in") => RefKind::In,
        Some("out") => RefKind::Out,
        Some("inout") => RefKind::InOut,
        _ => RefKind::None,
    }
}

fn to_narrowing_level(spec: &Option<String>, default: NarrowingLevel) -> Result<NarrowingLevel> {
    let Some(spec) = spec else { return Ok(default) };
    Ok(match spec.to_ascii_lowercase().as_str() {
        "none" => NarrowingLevel::None,
        "one" => NarrowingLevel::One,
        "two" => NarrowingLevel::Two,
        "three" => NarrowingLevel::Three,
        "all" => NarrowingLevel::All,
        other => bail!("unrecognized narrowing level '{other}'"),
    })
}

fn resolve(input: PathBuf) -> Result<()> {
    let raw = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
    let request: ResolveRequest = serde_json::from_str(&raw).context("parsing ResolveRequest JSON")?;

    let min_level = to_narrowing_level(&request.min_level, NarrowingLevel::MIN)?;
    let max_level = to_narrowing_level(&request.max_level, NarrowingLevel::MAX)?;

    let declaring_default = HostType::named(request.method_name.clone());
    let signatures: Vec<RawSignature> = request
        .signatures
        .iter()
        .map(|spec| {
            let declaring_type = spec.declaring_type.as_ref().map(to_host_type).unwrap_or_else(|| declaring_default.clone());
            let return_type = spec.return_type.as_ref().map(to_host_type).unwrap_or_else(HostType::top);
            let parameters = spec
                .parameters
                .iter()
                .map(|p| {
                    let mut param = match &p.name {
                        Some(name) => RawParameter::new(name.clone(), to_host_type(&p.ty)),
                        None => RawParameter::new(String::new(), to_host_type(&p.ty)),
                    }
                    .by_ref(to_ref_kind(&p.ref_kind));
                    if p.optional {
                        param = param.optional();
                    }
                    if p.params_array {
                        param = param.params_array();
                    }
                    if p.params_dict {
                        param = param.params_dict();
                    }
                    if p.not_null {
                        param = param.not_null();
                    }
                    param
                })
                .collect();

            let mut sig = RawSignature::new(spec.name.clone(), declaring_type, return_type).with_params(parameters);
            if spec.is_static {
                sig = sig.static_method();
            }
            if spec.is_private {
                sig = sig.private();
            }
            if spec.generic_arity > 0 {
                sig = sig.generic(spec.generic_arity);
            }
            sig
        })
        .collect();

    let mut policy = ReferencePolicy::new()
        .with_positional(request.call.positional.iter().map(to_host_type))
        .with_splat(request.call.splat.iter().map(to_host_type));
    for (name, ty) in &request.call.named {
        policy = policy.with_named(name.clone(), to_host_type(ty));
    }

    info!("resolving {} against {} candidate signature(s)", request.method_name, signatures.len());
    let mut resolver = OverloadResolver::new(policy, request.method_name.clone(), signatures, min_level, max_level);
    let target = resolver.resolve_overload();

    match &target {
        BindingTarget::Success { candidate, narrowing_level, restrictions } => {
            println!("resolved: {}", display_signature(&candidate.signature));
            println!("narrowing level: {narrowing_level}");
            println!("restrictions: {}", serde_json::to_string_pretty(restrictions)?);
        }
        other => {
            let error = make_invalid_parameters_error(other);
            println!("{}", serde_json::to_string_pretty(&error)?);
        }
    }

    Ok(())
}
