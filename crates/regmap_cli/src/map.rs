//! `regmap map` — print the flattened address map.

use std::path::Path;

use regmap_addrmap::{build_address_map_for, build_address_map_with_base, AddressEntry};
use regmap_db::Project;

use crate::{GlobalArgs, MapArgs, ReportFormat};

/// Runs the `regmap map` command.
///
/// Loads the project, flattens it (the whole project, or one named address
/// map), and prints the entries as an aligned text table or as JSON.
/// Returns exit code 0 on success; an unresolved parameter aborts with an
/// error.
pub fn run(args: &MapArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load(Path::new(&args.project))?;
    let mut ctx = project.build_context();

    let entries = match &args.map {
        Some(name) => {
            let map = project
                .address_maps
                .iter()
                .find(|m| &m.name == name)
                .ok_or_else(|| format!("no address map named '{name}'"))?;
            build_address_map_for(&project, &mut ctx, map)?
        }
        None => build_address_map_with_base(&project, &mut ctx, args.base)?,
    };

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Address map for {} ({} entries)", project.name, entries.len());
    }

    match args.format {
        ReportFormat::Text => print_table(&entries),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{json}");
        }
    }

    Ok(0)
}

/// Prints entries as an aligned table, one register location per line.
fn print_table(entries: &[AddressEntry]) {
    let block_width = column_width(entries.iter().map(|e| e.block_inst.len()));
    let inst_width = column_width(entries.iter().map(|e| e.reg_inst.len()));
    let token_width = column_width(entries.iter().map(|e| e.token.len()));

    for entry in entries {
        println!(
            "{:block_width$}  {:inst_width$}  {:token_width$}  0x{:08x}  {:2}",
            entry.block_inst, entry.reg_inst, entry.token, entry.address, entry.width
        );
    }
}

fn column_width(lengths: impl Iterator<Item = usize>) -> usize {
    lengths.max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_db::{Block, BlockInstance, Register, RegisterSet, RegisterSetInstance};

    fn write_project() -> (tempfile::TempDir, String) {
        let mut regset = RegisterSet::new("regs");
        regset.registers.push(Register::new("Config", "CFG", 0x4));

        let mut block = Block::new("subsys");
        let set_id = block.add_regset(regset);
        block
            .regset_insts
            .push(RegisterSetInstance::new("ctrl", set_id, 0x40));

        let mut project = Project::new("soc");
        let blk_id = block.uuid.clone();
        project.blocks.insert(blk_id.clone(), block);
        project
            .block_insts
            .push(BlockInstance::new("chip0", blk_id, 0x2000));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soc.rpj.json");
        project.save(&path).unwrap();
        let path_str = path.to_string_lossy().into_owned();
        (dir, path_str)
    }

    #[test]
    fn map_command_exits_zero() {
        let (_dir, path) = write_project();
        let args = MapArgs {
            project: path,
            format: ReportFormat::Json,
            base: 0,
            map: None,
        };
        let global = GlobalArgs {
            quiet: true,
            color: false,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }

    #[test]
    fn column_width_of_empty_is_zero() {
        assert_eq!(column_width(std::iter::empty()), 0);
        assert_eq!(column_width([3usize, 7, 5].into_iter()), 7);
    }
}
