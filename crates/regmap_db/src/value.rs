//! A numeric quantity that is either a literal or a parameter reference.

use crate::registry::ParameterRegistry;
use crate::resolver::{ResolutionContext, ResolveError};
use regmap_common::Uuid;
use serde::{Deserialize, Serialize};

/// A value that is either a fixed integer or a reference to a parameter
/// plus a signed offset.
///
/// Used wherever a numeric quantity (register dimension, repeat count,
/// bit-field reset value, bit-field msb) may be either fixed at design time
/// or driven by a named, overridable [`Parameter`](crate::Parameter).
///
/// The rendering methods are consumed verbatim by downstream generators and
/// are therefore bit-exact contracts: a literal renders in the requested
/// radix, a reference renders the parameter's display name with a `+N`/`-N`
/// suffix for a nonzero offset, and a dangling reference renders as the
/// empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamValue {
    /// A fixed integer.
    Literal {
        /// The literal value.
        value: u64,
    },
    /// A reference to a parameter definition, offset by a signed constant.
    Reference {
        /// Identity of the referenced parameter.
        param: Uuid,
        /// Signed offset added after the reference resolves.
        #[serde(default)]
        offset: i64,
    },
}

impl ParamValue {
    /// Creates a literal value.
    pub fn literal(value: u64) -> Self {
        ParamValue::Literal { value }
    }

    /// Creates a parameter reference with no offset.
    pub fn reference(param: Uuid) -> Self {
        ParamValue::Reference { param, offset: 0 }
    }

    /// Creates a parameter reference with a signed offset.
    pub fn reference_with_offset(param: Uuid, offset: i64) -> Self {
        ParamValue::Reference { param, offset }
    }

    /// Switches to literal mode with the given value.
    pub fn set_int(&mut self, value: u64) {
        *self = ParamValue::Literal { value };
    }

    /// Switches to parameter-reference mode.
    pub fn set_param(&mut self, param: Uuid, offset: i64) {
        *self = ParamValue::Reference { param, offset };
    }

    /// Returns `true` if this value is a parameter reference.
    pub fn is_parameter(&self) -> bool {
        matches!(self, ParamValue::Reference { .. })
    }

    /// Resolves this value to a concrete integer.
    ///
    /// A literal resolves to itself independent of any registry or override
    /// state. A reference resolves the named parameter through `ctx`
    /// (honoring override precedence) and then applies the offset.
    pub fn resolve(&self, ctx: &ResolutionContext) -> Result<u64, ResolveError> {
        ctx.resolve_value(self)
    }

    /// Resolves with the interactive fallback: a dangling reference or any
    /// other resolution failure yields 0 instead of an error.
    ///
    /// Batch generation paths must use [`resolve`](Self::resolve) so real
    /// errors cannot be swallowed.
    pub fn resolve_or_default(&self, ctx: &ResolutionContext) -> u64 {
        ctx.resolve_value(self).unwrap_or(0)
    }

    /// Returns the referenced parameter's display name, if this is a
    /// reference to a registered parameter.
    pub fn param_name<'a>(&self, registry: &'a ParameterRegistry) -> Option<&'a str> {
        match self {
            ParamValue::Literal { .. } => None,
            ParamValue::Reference { param, .. } => {
                registry.find(param).map(|p| p.name.as_str())
            }
        }
    }

    /// Renders with decimal formatting for literals.
    pub fn int_str(&self, registry: &ParameterRegistry) -> String {
        match self {
            ParamValue::Literal { value } => format!("{value}"),
            ParamValue::Reference { .. } => self.render_reference(registry),
        }
    }

    /// Renders with C hex formatting (`0x…`) for literals.
    pub fn hex_str(&self, registry: &ParameterRegistry) -> String {
        match self {
            ParamValue::Literal { value } => format!("0x{value:x}"),
            ParamValue::Reference { .. } => self.render_reference(registry),
        }
    }

    /// Renders with Verilog hex formatting (`'h…`) for literals.
    pub fn verilog_str(&self, registry: &ParameterRegistry) -> String {
        match self {
            ParamValue::Literal { value } => format!("'h{value:x}"),
            ParamValue::Reference { .. } => self.render_reference(registry),
        }
    }

    /// Renders a reference as `NAME`, `NAME+N`, or `NAME-N`; the empty
    /// string if the reference is dangling.
    fn render_reference(&self, registry: &ParameterRegistry) -> String {
        let ParamValue::Reference { param, offset } = self else {
            return String::new();
        };
        let Some(def) = registry.find(param) else {
            return String::new();
        };
        if *offset > 0 {
            format!("{}+{}", def.name, offset)
        } else if *offset < 0 {
            format!("{}{}", def.name, offset)
        } else {
            def.name.clone()
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Literal { value: 0 }
    }
}
