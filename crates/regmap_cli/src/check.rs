//! `regmap check` — address-map guard checks.
//!
//! Loads the project, builds its resolution context, runs every guard
//! check, and renders the findings. The pipeline:
//!
//! 1. Load and validate the project file
//! 2. Build the resolution context (registry + override tables)
//! 3. Run the guard checks into a diagnostic sink
//! 4. Render diagnostics (terminal or JSON) and summarize
//!
//! Returns exit code 0 if the address map is safe, 1 otherwise.

use std::path::Path;

use regmap_addrmap::check_project;
use regmap_db::Project;
use regmap_diagnostics::{DiagnosticSink, Severity, TerminalRenderer};

use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `regmap check` command.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load(Path::new(&args.project))?;

    if !global.quiet {
        eprintln!("   Checking {}", project.name);
    }

    let mut ctx = project.build_context();
    let sink = DiagnosticSink::new();
    check_project(&project, &mut ctx, &sink);

    let diagnostics = sink.diagnostics();

    match args.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &diagnostics {
                eprintln!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            error_count, warning_count
        );
    }

    if sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_db::{
        Block, BlockInstance, Project, Register, RegisterSet, RegisterSetInstance,
    };

    fn write_project(overlapping: bool) -> (tempfile::TempDir, String) {
        let mut regset = RegisterSet::new("regs");
        regset.ports.address_bus_width = 8;
        regset.registers.push(Register::new("Config", "CFG", 0x0));

        let mut block = Block::new("subsys");
        let set_id = block.add_regset(regset);
        block
            .regset_insts
            .push(RegisterSetInstance::new("a", set_id.clone(), 0x0));
        let second_offset = if overlapping { 0x80 } else { 0x100 };
        block
            .regset_insts
            .push(RegisterSetInstance::new("b", set_id, second_offset));

        let mut project = Project::new("soc");
        let blk_id = block.uuid.clone();
        project.blocks.insert(blk_id.clone(), block);
        project
            .block_insts
            .push(BlockInstance::new("chip0", blk_id, 0));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soc.rpj.json");
        project.save(&path).unwrap();
        let path_str = path.to_string_lossy().into_owned();
        (dir, path_str)
    }

    #[test]
    fn clean_project_exits_zero() {
        let (_dir, path) = write_project(false);
        let args = CheckArgs {
            project: path,
            format: ReportFormat::Text,
        };
        let global = GlobalArgs {
            quiet: true,
            color: false,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }

    #[test]
    fn overlapping_project_exits_one() {
        let (_dir, path) = write_project(true);
        let args = CheckArgs {
            project: path,
            format: ReportFormat::Text,
        };
        let global = GlobalArgs {
            quiet: true,
            color: false,
        };
        assert_eq!(run(&args, &global).unwrap(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = CheckArgs {
            project: "/no/such/file.rpj.json".to_string(),
            format: ReportFormat::Text,
        };
        let global = GlobalArgs {
            quiet: true,
            color: false,
        };
        assert!(run(&args, &global).is_err());
    }
}
