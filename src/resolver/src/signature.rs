//! Raw, embedder-supplied method shapes — the input to stage 1 (`spec.md` §4.1).

use crate::types::HostType;

/// Calling convention of a raw signature. Only `Managed` signatures are bindable;
/// `Varargs` ("C-style" variadic, e.g. a `...`-style native signature) is rejected
/// silently at candidate construction per `spec.md` §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallingConvention {
    Managed,
    Varargs,
}

/// How a raw parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    None,
    In,
    Out,
    InOut,
}

impl RefKind {
    pub fn is_by_ref(self) -> bool {
        !matches!(self, RefKind::None)
    }

    /// Out-only parameters are the ones eligible for by-ref reduction (`spec.md`
    /// §4.1 step 4): their value is never read, so they need not occupy an
    /// argument-list slot at all.
    pub fn is_out_only(self) -> bool {
        matches!(self, RefKind::Out)
    }
}

/// One formal parameter as the embedder's method table describes it.
#[derive(Debug, Clone)]
pub struct RawParameter {
    pub name: Option<String>,
    pub ty: HostType,
    pub ref_kind: RefKind,
    pub is_params_array: bool,
    pub is_params_dict: bool,
    pub has_default: bool,
    pub prohibits_null: bool,
}

impl RawParameter {
    pub fn new(name: impl Into<String>, ty: HostType) -> Self {
        RawParameter {
            name: Some(name.into()),
            ty,
            ref_kind: RefKind::None,
            is_params_array: false,
            is_params_dict: false,
            has_default: false,
            prohibits_null: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn by_ref(mut self, kind: RefKind) -> Self {
        self.ref_kind = kind;
        self
    }

    pub fn params_array(mut self) -> Self {
        self.is_params_array = true;
        self
    }

    pub fn params_dict(mut self) -> Self {
        self.is_params_dict = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.prohibits_null = true;
        self
    }
}

/// A candidate callable signature as supplied by the host type system, before any
/// candidate-construction bookkeeping (defaults, by-ref reduction, params-array
/// expansion) is applied.
#[derive(Debug, Clone)]
pub struct RawSignature {
    pub name: String,
    pub declaring_type: HostType,
    pub return_type: HostType,
    pub is_static: bool,
    pub is_private: bool,
    /// Number of unresolved generic parameters. Per `spec.md` §1/§9, generic
    /// methods are refused as unsupported: any nonzero value causes this
    /// signature to be skipped silently at candidate construction.
    pub generic_arity: usize,
    pub calling_convention: CallingConvention,
    pub parameters: Vec<RawParameter>,
}

impl RawSignature {
    pub fn new(name: impl Into<String>, declaring_type: HostType, return_type: HostType) -> Self {
        RawSignature {
            name: name.into(),
            declaring_type,
            return_type,
            is_static: false,
            is_private: false,
            generic_arity: 0,
            calling_convention: CallingConvention::Managed,
            parameters: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<RawParameter>) -> Self {
        self.parameters = params;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }

    pub fn generic(mut self, arity: usize) -> Self {
        self.generic_arity = arity;
        self
    }

    pub fn is_bindable(&self) -> bool {
        self.calling_convention == CallingConvention::Managed && self.generic_arity == 0
    }

    /// Index of the trailing params-array parameter, if this signature declares one.
    /// At most one parameter may be a params-array (enforced by construction, not
    /// by this accessor).
    pub fn params_array_index(&self) -> Option<usize> {
        self.parameters.iter().position(|p| p.is_params_array)
    }

    pub fn has_params_dictionary(&self) -> bool {
        self.parameters.iter().any(|p| p.is_params_dict)
    }

    /// Index of the first parameter with a default value, if any; everything
    /// from there to the end is a "trailing optional suffix" per `spec.md` §4.1.
    pub fn first_optional_index(&self) -> Option<usize> {
        self.parameters.iter().position(|p| p.has_default)
    }
}

pub fn display_signature(sig: &RawSignature) -> String {
    let params = sig
        .parameters
        .iter()
        .map(|p| {
            let prefix = match p.ref_kind {
                RefKind::None => "",
                RefKind::In => "in ",
                RefKind::Out => "out ",
                RefKind::InOut => "ref ",
            };
            let tail = if p.is_params_array { "params " } else { "" };
            format!("{tail}{prefix}{}", p.ty)
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}.{}({})", sig.declaring_type, sig.name, params)
}
