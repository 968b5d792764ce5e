//! A minimal, worked [`BindingPolicy`]: structural equality plus a small
//! numeric-widening table. Used by this crate's own tests and the bundled CLI
//! demo; a real embedder binds against its own host type system's rules
//! instead of this one.

use crate::actual_args::{ActualArgument, ActualArguments};
use crate::policy::{BindingPolicy, Candidate};
use crate::signature::RawSignature;
use crate::types::{HostType, NarrowingLevel, ParameterWrapper, TypeKind};

/// One call site: positional arguments, an optional trailing splat sequence,
/// and named arguments. The resolver's `BindingPolicy` hook only ever sees
/// `named`/`names` directly (`spec.md` §6); the rest stays here, read back by
/// [`ReferencePolicy::create_actual_arguments`].
#[derive(Debug, Clone, Default)]
pub struct ReferencePolicy {
    positional: Vec<HostType>,
    splat: Vec<HostType>,
    named: Vec<HostType>,
    names: Vec<String>,
}

impl ReferencePolicy {
    pub fn new() -> Self {
        ReferencePolicy::default()
    }

    pub fn with_positional(mut self, args: impl IntoIterator<Item = HostType>) -> Self {
        self.positional.extend(args);
        self
    }

    pub fn with_splat(mut self, args: impl IntoIterator<Item = HostType>) -> Self {
        self.splat.extend(args);
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, ty: HostType) -> Self {
        self.names.push(name.into());
        self.named.push(ty);
        self
    }
}

/// Widening rank of a primitive numeric type, lowest first. `None` for any
/// type this reference policy doesn't treat as numeric.
fn numeric_width(name: &str) -> Option<u8> {
    match name {
        "bool" => Some(0),
        "byte" => Some(1),
        "short" => Some(2),
        "int" => Some(3),
        "long" => Some(4),
        "float" => Some(5),
        "double" => Some(6),
        _ => None,
    }
}

impl BindingPolicy for ReferencePolicy {
    fn get_named_arguments(&self) -> (Vec<HostType>, Vec<String>) {
        (self.named.clone(), self.names.clone())
    }

    fn create_actual_arguments(
        &self,
        named: &[HostType],
        names: &[String],
        pre_splat_limit: Option<usize>,
        post_splat_limit: Option<usize>,
    ) -> Option<ActualArguments> {
        let mut positional = self.positional.clone();

        let splat_index = if self.splat.is_empty() { -1 } else { positional.len() as isize };
        let budget = match (pre_splat_limit, post_splat_limit) {
            (Some(a), Some(b)) => a.saturating_add(b),
            _ => usize::MAX,
        };
        let expand = self.splat.len().min(budget);
        positional.extend(self.splat[..expand].iter().cloned());
        let collapsed_items: Vec<HostType> = self.splat[expand..].to_vec();

        let visible_count = self.positional.len() + self.splat.len() + named.len();

        Some(ActualArguments {
            positional: positional.into_iter().map(ActualArgument::new).collect(),
            named: named.iter().cloned().map(ActualArgument::new).collect(),
            names: names.to_vec(),
            splat_index,
            collapsed_count: collapsed_items.len(),
            collapsed_items,
            visible_count,
        })
    }

    fn allow_keyword_argument_setting(&self, signature: &RawSignature) -> bool {
        signature.name == ".ctor"
    }

    fn can_convert_from(&self, from: &HostType, to_param: &ParameterWrapper, level: NarrowingLevel) -> bool {
        if from == &to_param.ty {
            return true;
        }
        if to_param.ty.is_top() {
            return true;
        }
        if matches!(to_param.ty.kind, TypeKind::Dynamic) {
            return true;
        }
        if matches!(from.kind, TypeKind::Dynamic) {
            return level == NarrowingLevel::MAX;
        }

        if let TypeKind::Nullable(inner) = &to_param.ty.kind {
            if from == inner.as_ref() {
                return level >= NarrowingLevel::Two;
            }
        }
        if let TypeKind::Nullable(inner) = &from.kind {
            if &to_param.ty == inner.as_ref() {
                return level >= NarrowingLevel::Two;
            }
        }

        if from.kind == TypeKind::Primitive && to_param.ty.kind == TypeKind::Primitive {
            if let (Some(wf), Some(wt)) = (numeric_width(&from.name), numeric_width(&to_param.ty.name)) {
                // Implicit widening is always applicable, like a host runtime's
                // ordinary numeric-promotion rules; narrowing needs an explicit
                // (higher-narrowing-level) conversion.
                return if wf <= wt { true } else { level >= NarrowingLevel::Three };
            }
        }

        false
    }

    fn select_best_conversion_for(
        &self,
        actual: &HostType,
        p1: &ParameterWrapper,
        p2: &ParameterWrapper,
        _level: NarrowingLevel,
    ) -> Candidate {
        match (&p1.ty == actual, &p2.ty == actual) {
            (true, false) => return Candidate::One,
            (false, true) => return Candidate::Two,
            _ => {}
        }

        if let (Some(wa), Some(w1), Some(w2)) =
            (numeric_width(&actual.name), numeric_width(&p1.ty.name), numeric_width(&p2.ty.name))
        {
            let d1 = (wa as i16 - w1 as i16).abs();
            let d2 = (wa as i16 - w2 as i16).abs();
            if d1 != d2 {
                return if d1 < d2 { Candidate::One } else { Candidate::Two };
            }
        }

        Candidate::Equivalent
    }

    fn prefer_convert(&self, t1: &HostType, t2: &HostType) -> Candidate {
        if let (Some(w1), Some(w2)) = (numeric_width(&t1.name), numeric_width(&t2.name)) {
            if w1 != w2 {
                return if w1 < w2 { Candidate::One } else { Candidate::Two };
            }
        }
        Candidate::Equivalent
    }
}
