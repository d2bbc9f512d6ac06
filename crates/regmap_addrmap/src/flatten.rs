//! Flattening the instance hierarchy into absolute register addresses.

use regmap_common::Uuid;
use regmap_db::{AddressMapDef, Block, Project, ResolutionContext, ResolveError};
use serde::{Deserialize, Serialize};

/// One flattened register location.
///
/// The tuple every address-based generator consumes: block instance name,
/// register instance name (with a `_N` suffix for repeated instances),
/// lowercased register token, absolute byte address, register width in
/// bits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    /// The (possibly replica-suffixed) block instance name.
    pub block_inst: String,
    /// The (possibly repetition-suffixed) register-set instance name.
    pub reg_inst: String,
    /// The register token, lowercased.
    pub token: String,
    /// The absolute byte address.
    pub address: u64,
    /// The register width in bits.
    pub width: u32,
}

/// Errors produced while flattening a project.
#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    /// A parameterized repeat count or dimension failed to resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A block instance refers to a block that does not exist.
    #[error("block instance '{inst}' refers to an unknown block")]
    UnknownBlock {
        /// Name of the referring instance.
        inst: String,
    },

    /// A register-set instance refers to a register set that does not exist.
    #[error("register set instance '{inst}' refers to an unknown register set")]
    UnknownRegisterSet {
        /// Name of the referring instance.
        inst: String,
    },
}

/// Produces the flat address map for an entire project.
///
/// Entries are emitted in block-instance iteration order, then
/// register-set-instance order, then repetition order, then ascending
/// register address within each set. Callers that need a different order
/// must sort explicitly.
///
/// A repeat count that fails to resolve aborts composition with the typed
/// error; batch generation must not emit plausible-but-wrong addresses.
pub fn build_address_map(
    project: &Project,
    ctx: &mut ResolutionContext,
) -> Result<Vec<AddressEntry>, FlattenError> {
    build_address_map_with_base(project, ctx, 0)
}

/// [`build_address_map`] with an address-map base added to every block
/// instance's base address.
pub fn build_address_map_with_base(
    project: &Project,
    ctx: &mut ResolutionContext,
    base: u64,
) -> Result<Vec<AddressEntry>, FlattenError> {
    build_filtered(project, ctx, base, None)
}

/// Flattens one configured address map: entries start at the map's base
/// and cover only the block instances the map names (all of them if the
/// map's block list is empty).
pub fn build_address_map_for(
    project: &Project,
    ctx: &mut ResolutionContext,
    map: &AddressMapDef,
) -> Result<Vec<AddressEntry>, FlattenError> {
    let filter = if map.blocks.is_empty() {
        None
    } else {
        Some(map.blocks.as_slice())
    };
    build_filtered(project, ctx, map.base, filter)
}

fn build_filtered(
    project: &Project,
    ctx: &mut ResolutionContext,
    base: u64,
    filter: Option<&[Uuid]>,
) -> Result<Vec<AddressEntry>, FlattenError> {
    let mut entries = Vec::new();

    for blk_inst in &project.block_insts {
        if let Some(wanted) = filter {
            if !wanted.contains(&blk_inst.uuid) {
                continue;
            }
        }
        let block = project
            .block_for(blk_inst)
            .ok_or_else(|| FlattenError::UnknownBlock {
                inst: blk_inst.name.clone(),
            })?;

        ctx.set_blkinst(blk_inst.uuid.clone());

        if blk_inst.repeat > 1 {
            for replica in 0..blk_inst.repeat as u64 {
                let address = base + blk_inst.address_base + replica * block.address_size;
                let name = format!("{}_{}", blk_inst.name, replica);
                flatten_block_inst(&name, block, address, ctx, &mut entries)?;
            }
        } else {
            let address = base + blk_inst.address_base;
            flatten_block_inst(&blk_inst.name, block, address, ctx, &mut entries)?;
        }
    }

    ctx.clear_scope();
    Ok(entries)
}

/// Emits entries for every register-set instance of one block replica.
fn flatten_block_inst(
    blk_name: &str,
    block: &Block,
    block_address: u64,
    ctx: &mut ResolutionContext,
    entries: &mut Vec<AddressEntry>,
) -> Result<(), FlattenError> {
    for reg_inst in &block.regset_insts {
        let regset = block
            .regset_for(reg_inst)
            .ok_or_else(|| FlattenError::UnknownRegisterSet {
                inst: reg_inst.name.clone(),
            })?;

        ctx.set_reginst(reg_inst.uuid.clone());
        let repeat = ctx.resolve_value(&reg_inst.repeat)?;

        if repeat > 1 {
            let stride = regset.ports.address_size();
            for i in 0..repeat {
                for reg in regset.registers_by_address() {
                    let addr = reg.address + reg_inst.offset + block_address + i * stride;
                    entries.push(AddressEntry {
                        block_inst: blk_name.to_string(),
                        reg_inst: format!("{}_{}", reg_inst.name, i),
                        token: reg.token.to_lowercase(),
                        address: addr,
                        width: reg.width,
                    });
                }
            }
        } else {
            for reg in regset.registers_by_address() {
                let addr = reg.address + reg_inst.offset + block_address;
                entries.push(AddressEntry {
                    block_inst: blk_name.to_string(),
                    reg_inst: reg_inst.name.clone(),
                    token: reg.token.to_lowercase(),
                    address: addr,
                    width: reg.width,
                });
            }
        }
    }
    Ok(())
}
