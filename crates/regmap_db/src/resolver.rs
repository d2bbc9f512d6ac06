//! Effective-value computation for parameters, honoring override precedence.

use crate::overrides::OverrideTables;
use crate::param::Parameter;
use crate::registry::ParameterRegistry;
use crate::value::ParamValue;
use regmap_common::Uuid;

/// Errors produced when a parameterized value cannot be resolved.
///
/// These are hard failures in batch mode: an unresolved reference must not
/// silently flow into generated output as a plausible-looking zero.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A parameter reference names an identity with no registered definition.
    #[error("unresolved parameter reference '{param}'")]
    UnresolvedParameter {
        /// The dangling identity.
        param: Uuid,
    },

    /// A chain of override references revisits a parameter.
    #[error("circular parameter reference through '{param}'")]
    CircularReference {
        /// The parameter at which the cycle closed.
        param: Uuid,
    },

    /// Applying a signed offset over- or underflowed the value range.
    #[error("offset arithmetic overflowed while resolving '{param}'")]
    Overflow {
        /// The parameter whose offset could not be applied.
        param: Uuid,
    },
}

/// The resolver: owns the parameter registry, the override tables, and the
/// ambient instance scope, and computes effective integer values.
///
/// A context is built from a loaded [`Project`](crate::Project) via
/// [`build_context`](crate::Project::build_context) and passed by reference
/// through the composition and resolution call chain. Before a batch of
/// resolutions (e.g., flattening one block instance's address map) the
/// caller scopes the context with [`set_blkinst`](Self::set_blkinst) and
/// [`set_reginst`](Self::set_reginst); the scope stays in place for the
/// duration of that batch.
///
/// Precedence: register-set-instance override > block-instance override >
/// parameter default. The more specific (innermost) scope wins, mirroring
/// the instantiation hierarchy from leaf to root.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    registry: ParameterRegistry,
    overrides: OverrideTables,
    reginst: Option<Uuid>,
    blkinst: Option<Uuid>,
}

impl ResolutionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parameter registry.
    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    /// Returns the parameter registry for mutation (registration).
    pub fn registry_mut(&mut self) -> &mut ParameterRegistry {
        &mut self.registry
    }

    /// Returns the override tables.
    pub fn overrides(&self) -> &OverrideTables {
        &self.overrides
    }

    /// Returns the override tables for mutation (population).
    pub fn overrides_mut(&mut self) -> &mut OverrideTables {
        &mut self.overrides
    }

    /// Sets the ambient register-set instance scope.
    pub fn set_reginst(&mut self, inst: Uuid) {
        self.reginst = Some(inst);
    }

    /// Sets the ambient block instance scope.
    pub fn set_blkinst(&mut self, inst: Uuid) {
        self.blkinst = Some(inst);
    }

    /// Clears both ambient instance scopes.
    pub fn clear_scope(&mut self) {
        self.reginst = None;
        self.blkinst = None;
    }

    /// Empties the registry, the override tables, and the scope.
    ///
    /// This is the project-open boundary for callers that reuse one context
    /// across loads; after `clear()` every previously registered identity
    /// resolves as not-found rather than to a stale value.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.overrides.clear();
        self.clear_scope();
    }

    /// Computes the effective value of a parameter definition.
    ///
    /// 1. With no register-set-instance scope, the default is returned
    ///    immediately (no override lookup is possible without a scope).
    /// 2. A register-set-scoped override for the parameter wins outright;
    ///    if that override is itself a reference, it defers to the block
    ///    level.
    /// 3. Otherwise a block-scoped override applies.
    /// 4. Otherwise the default.
    pub fn resolve(&self, def: &Parameter) -> Result<u64, ResolveError> {
        let Some(reginst) = &self.reginst else {
            return Ok(def.default);
        };

        if let Some(ov) = self.overrides.regset_override(reginst, &def.uuid) {
            let mut visiting = vec![def.uuid.clone()];
            return self.unwrap_override(ov, &mut visiting);
        }

        if let Some(blkinst) = &self.blkinst {
            if let Some(ov) = self.overrides.block_override(blkinst, &def.uuid) {
                let mut visiting = vec![def.uuid.clone()];
                return self.unwrap_override(ov, &mut visiting);
            }
        }

        Ok(def.default)
    }

    /// Resolves a [`ParamValue`] to a concrete integer: literals pass
    /// through, references resolve the named definition and then apply the
    /// signed offset.
    pub fn resolve_value(&self, value: &ParamValue) -> Result<u64, ResolveError> {
        match value {
            ParamValue::Literal { value } => Ok(*value),
            ParamValue::Reference { param, offset } => {
                let def = self
                    .registry
                    .find(param)
                    .ok_or_else(|| ResolveError::UnresolvedParameter {
                        param: param.clone(),
                    })?;
                let base = self.resolve(def)?;
                base.checked_add_signed(*offset)
                    .ok_or_else(|| ResolveError::Overflow {
                        param: param.clone(),
                    })
            }
        }
    }

    /// Resolves with the interactive fallback: any failure yields 0.
    pub fn resolve_value_or_default(&self, value: &ParamValue) -> u64 {
        self.resolve_value(value).unwrap_or(0)
    }

    /// Unwraps an override value found in either table. A literal is final;
    /// a reference continues at the block level.
    fn unwrap_override(
        &self,
        ov: &ParamValue,
        visiting: &mut Vec<Uuid>,
    ) -> Result<u64, ResolveError> {
        match ov {
            ParamValue::Literal { value } => Ok(*value),
            ParamValue::Reference { param, offset } => {
                let base = self.resolve_block_level(param, visiting)?;
                base.checked_add_signed(*offset)
                    .ok_or_else(|| ResolveError::Overflow {
                        param: param.clone(),
                    })
            }
        }
    }

    /// Resolves a parameter identity at block scope: a block-scoped
    /// override if one applies (unwrapping chained references), the
    /// registered default otherwise.
    fn resolve_block_level(
        &self,
        param: &Uuid,
        visiting: &mut Vec<Uuid>,
    ) -> Result<u64, ResolveError> {
        if visiting.contains(param) {
            return Err(ResolveError::CircularReference {
                param: param.clone(),
            });
        }
        let def = self
            .registry
            .find(param)
            .ok_or_else(|| ResolveError::UnresolvedParameter {
                param: param.clone(),
            })?;

        let ov = self
            .blkinst
            .as_ref()
            .and_then(|b| self.overrides.block_override(b, param));

        match ov {
            None => Ok(def.default),
            Some(ov) => {
                visiting.push(param.clone());
                let result = self.unwrap_override(ov, visiting);
                visiting.pop();
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped_ctx() -> (ResolutionContext, Parameter) {
        let mut ctx = ResolutionContext::new();
        let def = Parameter::new("DEPTH", 10, 0, 1000);
        ctx.registry_mut().register(def.clone());
        ctx.set_reginst(Uuid::new("ri0"));
        ctx.set_blkinst(Uuid::new("bi0"));
        (ctx, def)
    }

    #[test]
    fn default_without_scope() {
        let mut ctx = ResolutionContext::new();
        let def = Parameter::new("DEPTH", 10, 0, 1000);
        ctx.registry_mut().register(def.clone());
        // No instance scope set: overrides cannot apply.
        assert_eq!(ctx.resolve(&def), Ok(10));
    }

    #[test]
    fn precedence_regset_beats_block_beats_default() {
        let (mut ctx, def) = scoped_ctx();
        assert_eq!(ctx.resolve(&def), Ok(10));

        ctx.overrides_mut().add_blockinst_override(
            Uuid::new("bi0"),
            def.uuid.clone(),
            ParamValue::literal(20),
        );
        assert_eq!(ctx.resolve(&def), Ok(20));

        ctx.overrides_mut().add_regset_override(
            Uuid::new("ri0"),
            def.uuid.clone(),
            ParamValue::literal(30),
        );
        assert_eq!(ctx.resolve(&def), Ok(30));
    }

    #[test]
    fn override_for_other_instance_does_not_apply() {
        let (mut ctx, def) = scoped_ctx();
        ctx.overrides_mut().add_regset_override(
            Uuid::new("ri_other"),
            def.uuid.clone(),
            ParamValue::literal(99),
        );
        assert_eq!(ctx.resolve(&def), Ok(10));
    }

    #[test]
    fn regset_override_defers_to_block_level() {
        let (mut ctx, def) = scoped_ctx();
        let outer = Parameter::new("TOP_DEPTH", 40, 0, 1000);
        ctx.registry_mut().register(outer.clone());

        // The register-set override is itself a reference to the outer
        // parameter, which the block instance overrides.
        ctx.overrides_mut().add_regset_override(
            Uuid::new("ri0"),
            def.uuid.clone(),
            ParamValue::reference(outer.uuid.clone()),
        );
        ctx.overrides_mut().add_blockinst_override(
            Uuid::new("bi0"),
            outer.uuid.clone(),
            ParamValue::literal(50),
        );
        assert_eq!(ctx.resolve(&def), Ok(50));
    }

    #[test]
    fn deferred_reference_falls_back_to_referenced_default() {
        let (mut ctx, def) = scoped_ctx();
        let outer = Parameter::new("TOP_DEPTH", 40, 0, 1000);
        ctx.registry_mut().register(outer.clone());

        ctx.overrides_mut().add_regset_override(
            Uuid::new("ri0"),
            def.uuid.clone(),
            ParamValue::reference(outer.uuid.clone()),
        );
        assert_eq!(ctx.resolve(&def), Ok(40));
    }

    #[test]
    fn chained_block_override_unwraps() {
        let (mut ctx, def) = scoped_ctx();
        let mid = Parameter::new("MID", 7, 0, 100);
        let leaf = Parameter::new("LEAF", 3, 0, 100);
        ctx.registry_mut().register(mid.clone());
        ctx.registry_mut().register(leaf.clone());

        ctx.overrides_mut().add_blockinst_override(
            Uuid::new("bi0"),
            def.uuid.clone(),
            ParamValue::reference(mid.uuid.clone()),
        );
        ctx.overrides_mut().add_blockinst_override(
            Uuid::new("bi0"),
            mid.uuid.clone(),
            ParamValue::reference(leaf.uuid.clone()),
        );
        assert_eq!(ctx.resolve(&def), Ok(3));
    }

    #[test]
    fn circular_override_chain_is_an_error() {
        let (mut ctx, def) = scoped_ctx();
        let other = Parameter::new("OTHER", 5, 0, 100);
        ctx.registry_mut().register(other.clone());

        ctx.overrides_mut().add_blockinst_override(
            Uuid::new("bi0"),
            def.uuid.clone(),
            ParamValue::reference(other.uuid.clone()),
        );
        ctx.overrides_mut().add_blockinst_override(
            Uuid::new("bi0"),
            other.uuid.clone(),
            ParamValue::reference(def.uuid.clone()),
        );
        assert_eq!(
            ctx.resolve(&def),
            Err(ResolveError::CircularReference {
                param: def.uuid.clone()
            })
        );
    }

    #[test]
    fn literal_value_resolves_independent_of_state() {
        let ctx = ResolutionContext::new();
        assert_eq!(ctx.resolve_value(&ParamValue::literal(0x42)), Ok(0x42));
    }

    #[test]
    fn plain_reference_resolves_to_registered_default() {
        let mut ctx = ResolutionContext::new();
        let def = Parameter::new("N", 16, 0, 256);
        ctx.registry_mut().register(def.clone());

        let mut v = ParamValue::literal(0);
        v.set_param(def.uuid.clone(), 0);
        assert_eq!(ctx.resolve_value(&v), Ok(16));
    }

    #[test]
    fn reference_value_resolves_default_plus_offset() {
        let mut ctx = ResolutionContext::new();
        let def = Parameter::new("N", 16, 0, 256);
        ctx.registry_mut().register(def.clone());

        let v = ParamValue::reference_with_offset(def.uuid.clone(), 4);
        assert_eq!(ctx.resolve_value(&v), Ok(20));

        let v = ParamValue::reference_with_offset(def.uuid.clone(), -4);
        assert_eq!(ctx.resolve_value(&v), Ok(12));
    }

    #[test]
    fn dangling_reference_is_typed_error() {
        let ctx = ResolutionContext::new();
        let v = ParamValue::reference(Uuid::new("ghost"));
        assert_eq!(
            ctx.resolve_value(&v),
            Err(ResolveError::UnresolvedParameter {
                param: Uuid::new("ghost")
            })
        );
        // The preview fallback degrades to 0 instead.
        assert_eq!(ctx.resolve_value_or_default(&v), 0);
    }

    #[test]
    fn offset_underflow_is_typed_error() {
        let mut ctx = ResolutionContext::new();
        let def = Parameter::new("N", 1, 0, 256);
        ctx.registry_mut().register(def.clone());

        let v = ParamValue::reference_with_offset(def.uuid.clone(), -2);
        assert_eq!(
            ctx.resolve_value(&v),
            Err(ResolveError::Overflow {
                param: def.uuid.clone()
            })
        );
    }

    #[test]
    fn clear_isolates_projects() {
        let (mut ctx, def) = scoped_ctx();
        ctx.overrides_mut().add_regset_override(
            Uuid::new("ri0"),
            def.uuid.clone(),
            ParamValue::literal(30),
        );
        assert_eq!(ctx.resolve(&def), Ok(30));

        ctx.clear();

        // The old identity must behave as not-found, not return stale data.
        let v = ParamValue::reference(def.uuid.clone());
        assert_eq!(
            ctx.resolve_value(&v),
            Err(ResolveError::UnresolvedParameter {
                param: def.uuid.clone()
            })
        );
        assert!(ctx.registry().is_empty());
        assert!(ctx.overrides().is_empty());
    }

    #[test]
    fn error_display() {
        let err = ResolveError::UnresolvedParameter {
            param: Uuid::new("abc123"),
        };
        assert_eq!(format!("{err}"), "unresolved parameter reference 'abc123'");
    }
}
