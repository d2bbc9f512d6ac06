//! The project: the root of the entity graph, loaded and saved as a unit.

use crate::block::Block;
use crate::error::DbError;
use crate::overrides::Override;
use crate::param::Parameter;
use crate::resolver::ResolutionContext;
use regmap_common::Uuid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn default_repeat() -> u32 {
    1
}

fn default_map_width() -> u32 {
    32
}

/// One instantiation of a block at the project level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInstance {
    /// The unique identity of this instance (the scope key for
    /// block-level overrides).
    pub uuid: Uuid,
    /// The instance name.
    pub name: String,
    /// Identity of the instantiated block.
    pub block: Uuid,
    /// Base address of the instance in the project address space.
    #[serde(default)]
    pub address_base: u64,
    /// Number of repetitions; replicas are spaced by the block's
    /// address size.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// HDL hierarchy path of the instance.
    #[serde(default)]
    pub hdl_path: String,
    /// Free-form documentation.
    #[serde(default)]
    pub description: String,
}

impl BlockInstance {
    /// Creates an instance of `block` with a fresh identity.
    pub fn new(name: impl Into<String>, block: Uuid, address_base: u64) -> Self {
        Self {
            uuid: Uuid::generate(),
            name: name.into(),
            block,
            address_base,
            repeat: 1,
            hdl_path: String::new(),
            description: String::new(),
        }
    }
}

/// A configured address map: a named view over a subset of block
/// instances with its own base address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMapDef {
    /// The unique identity of this address map.
    pub uuid: Uuid,
    /// The map name.
    pub name: String,
    /// The base address added to every entry in this map.
    #[serde(default)]
    pub base: u64,
    /// Access width in bits.
    #[serde(default = "default_map_width")]
    pub width: u32,
    /// `true` if the map is fixed at `base`, `false` if relocatable.
    #[serde(default)]
    pub fixed: bool,
    /// Identities of the block instances this map covers; empty means all.
    #[serde(default)]
    pub blocks: Vec<Uuid>,
}

/// The root of a register database: blocks, their instantiations, address
/// maps, and project-level parameters and overrides.
///
/// Loaded and saved as a unit. After loading,
/// [`build_context`](Self::build_context) materializes the resolution
/// state (registry and override tables) the parameter subsystem operates
/// over; reloading a project means building a fresh context, which is what
/// keeps stale registrations from one load out of the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// The project name.
    pub name: String,
    /// The blocks of this project, keyed by identity.
    #[serde(default)]
    pub blocks: HashMap<Uuid, Block>,
    /// The block instances, in declaration order.
    #[serde(default)]
    pub block_insts: Vec<BlockInstance>,
    /// The configured address maps.
    #[serde(default)]
    pub address_maps: Vec<AddressMapDef>,
    /// Project-level parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Overrides scoped to block instances.
    #[serde(default)]
    pub overrides: Vec<Override>,
}

impl Project {
    /// Creates an empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Loads a project from a JSON file and validates referential
    /// integrity.
    pub fn load(path: &Path) -> Result<Self, DbError> {
        let text = fs::read_to_string(path)?;
        let project: Project = serde_json::from_str(&text)?;
        project.validate()?;
        Ok(project)
    }

    /// Saves the project as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), DbError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Checks that every instance refers to an entity that exists.
    pub fn validate(&self) -> Result<(), DbError> {
        for blk_inst in &self.block_insts {
            let block = self
                .blocks
                .get(&blk_inst.block)
                .ok_or_else(|| DbError::UnknownBlock {
                    inst: blk_inst.name.clone(),
                    block: blk_inst.block.clone(),
                })?;
            for reg_inst in &block.regset_insts {
                if block.regset_for(reg_inst).is_none() {
                    return Err(DbError::UnknownRegisterSet {
                        inst: reg_inst.name.clone(),
                        regset: reg_inst.regset.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up the block a block instance refers to.
    pub fn block_for(&self, inst: &BlockInstance) -> Option<&Block> {
        self.blocks.get(&inst.block)
    }

    /// Builds a fresh resolution context for this project.
    ///
    /// Registers every parameter — project level, block level, and
    /// register-set level — and installs every override: each block's
    /// override list into the register-set-scoped table, the project's
    /// override list into the block-scoped table. Registration is this
    /// explicit step, not a construction side effect, so building a
    /// context twice (or for a newly loaded project) always starts from
    /// empty state.
    pub fn build_context(&self) -> ResolutionContext {
        let mut ctx = ResolutionContext::new();

        for param in &self.parameters {
            ctx.registry_mut().register(param.clone());
        }
        for block in self.blocks.values() {
            for param in &block.parameters {
                ctx.registry_mut().register(param.clone());
            }
            for regset in block.regsets.values() {
                for param in &regset.parameters {
                    ctx.registry_mut().register(param.clone());
                }
            }
            for ov in &block.overrides {
                ctx.overrides_mut().add_regset_override(
                    ov.path.clone(),
                    ov.parameter.clone(),
                    ov.value.clone(),
                );
            }
        }
        for ov in &self.overrides {
            ctx.overrides_mut().add_blockinst_override(
                ov.path.clone(),
                ov.parameter.clone(),
                ov.value.clone(),
            );
        }

        ctx
    }
}
