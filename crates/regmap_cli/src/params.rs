//! `regmap params` — list parameters and their resolved values.

use std::path::Path;

use regmap_db::{Parameter, Project};

use crate::{GlobalArgs, ParamsArgs};

/// Runs the `regmap params` command.
///
/// Prints every registered parameter with its default and range, then one
/// line per instance scope where overrides change the effective value.
pub fn run(args: &ParamsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load(Path::new(&args.project))?;
    let mut ctx = project.build_context();

    let mut params: Vec<Parameter> = ctx.registry().iter().cloned().collect();
    params.sort_by(|a, b| a.name.cmp(&b.name));

    if !global.quiet {
        eprintln!("   Parameters of {}", project.name);
    }

    for param in &params {
        println!(
            "{} = {}  [{}, {}]",
            param.name, param.default, param.min_val, param.max_val
        );
    }

    // Report effective values at every instance scope that deviates from
    // the default.
    for blk_inst in &project.block_insts {
        let Some(block) = project.block_for(blk_inst) else {
            continue;
        };
        ctx.set_blkinst(blk_inst.uuid.clone());
        for reg_inst in &block.regset_insts {
            ctx.set_reginst(reg_inst.uuid.clone());
            for param in &params {
                match ctx.resolve(param) {
                    Ok(value) if value != param.default => {
                        println!(
                            "{}.{}: {} = {}",
                            blk_inst.name, reg_inst.name, param.name, value
                        );
                    }
                    Ok(_) => {}
                    Err(err) => {
                        eprintln!(
                            "warning: {}.{}: {} did not resolve: {err}",
                            blk_inst.name, reg_inst.name, param.name
                        );
                    }
                }
            }
        }
    }
    ctx.clear_scope();

    Ok(0)
}
