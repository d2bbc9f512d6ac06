//! Pre-flight guard checks run before an address map is trusted for
//! generation.

use crate::codes;
use crate::flatten::build_address_map;
use regmap_db::{Project, ResolutionContext};
use regmap_diagnostics::DiagnosticSink;

/// The absolute address span one register-set instance occupies.
struct SpanInfo {
    start: u64,
    end: u64,
    path: String,
}

/// Runs every guard check over a project, emitting findings into `sink`.
///
/// Returns `true` if the address map is safe to generate from (no
/// error-severity findings). Composition itself never refuses to run; it
/// is the caller's responsibility to invoke this first and act on a
/// `false` result.
///
/// Checks, in order:
/// 1. advisory parameter ranges (defaults and literal overrides), `W301`
/// 2. per-instance span computation with replica-spacing validation,
///    `E302`/`E305`
/// 3. project-wide span overlap scan, `E301`
/// 4. flattened-map alignment and duplicate-address scan, `E303`/`E304`
pub fn check_project(
    project: &Project,
    ctx: &mut ResolutionContext,
    sink: &DiagnosticSink,
) -> bool {
    let before = sink.error_count();

    check_parameter_ranges(project, ctx, sink);
    let spans = collect_spans(project, ctx, sink);
    check_overlaps(&spans, sink);

    // The flattened map is only meaningful if every repeat resolved.
    if sink.error_count() == before {
        check_flat_map(project, ctx, sink);
    }

    sink.error_count() == before
}

/// Warns about parameter defaults and literal overrides outside the
/// declared `[min_val, max_val]` range.
fn check_parameter_ranges(project: &Project, ctx: &ResolutionContext, sink: &DiagnosticSink) {
    for param in ctx.registry().iter() {
        if !param.in_range(param.default) {
            sink.emit(codes::warn_out_of_range(
                &param.name,
                param.default,
                param.min_val,
                param.max_val,
            ));
        }
    }

    let all_overrides = project
        .overrides
        .iter()
        .chain(project.blocks.values().flat_map(|b| b.overrides.iter()));
    for ov in all_overrides {
        let Some(param) = ctx.registry().find(&ov.parameter) else {
            continue;
        };
        if let regmap_db::ParamValue::Literal { value } = &ov.value {
            if !param.in_range(*value) {
                sink.emit(codes::warn_out_of_range(
                    &param.name,
                    *value,
                    param.min_val,
                    param.max_val,
                ));
            }
        }
    }
}

/// Computes the absolute span of every (block replica, register-set
/// instance) pair, validating replica spacing along the way.
///
/// A repeated instance spans `repeat * repeat_offset` bytes; an unrepeated
/// instance spans its declared address space (`1 << address_bus_width`).
fn collect_spans(
    project: &Project,
    ctx: &mut ResolutionContext,
    sink: &DiagnosticSink,
) -> Vec<SpanInfo> {
    let mut spans = Vec::new();

    for blk_inst in &project.block_insts {
        let Some(block) = project.block_for(blk_inst) else {
            continue;
        };
        ctx.set_blkinst(blk_inst.uuid.clone());

        for replica in 0..blk_inst.repeat.max(1) as u64 {
            let block_address = blk_inst.address_base + replica * block.address_size;
            let blk_name = if blk_inst.repeat > 1 {
                format!("{}_{}", blk_inst.name, replica)
            } else {
                blk_inst.name.clone()
            };

            for reg_inst in &block.regset_insts {
                let Some(regset) = block.regset_for(reg_inst) else {
                    continue;
                };
                let path = format!("{}.{}", blk_name, reg_inst.name);

                ctx.set_reginst(reg_inst.uuid.clone());
                let repeat = match ctx.resolve_value(&reg_inst.repeat) {
                    Ok(n) => n,
                    Err(err) => {
                        sink.emit(codes::error_unresolved(&path, &err.to_string()));
                        continue;
                    }
                };

                let address_size = regset.ports.address_size();
                let extent = if repeat > 1 {
                    if reg_inst.repeat_offset < address_size {
                        sink.emit(codes::error_repeat_spacing(
                            &path,
                            reg_inst.repeat_offset,
                            address_size,
                        ));
                    }
                    repeat * reg_inst.repeat_offset
                } else {
                    address_size
                };

                let start = block_address + reg_inst.offset;
                spans.push(SpanInfo {
                    start,
                    end: start + extent,
                    path,
                });
            }
        }
    }

    ctx.clear_scope();
    spans
}

/// Sorts spans by start address and reports every adjacent intersection.
fn check_overlaps(spans: &[SpanInfo], sink: &DiagnosticSink) {
    let mut sorted: Vec<&SpanInfo> = spans.iter().collect();
    sorted.sort_by_key(|s| s.start);

    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.start < a.end {
            sink.emit(codes::error_overlap(
                &a.path,
                (a.start, a.end),
                &b.path,
                (b.start, b.end),
            ));
        }
    }
}

/// Validates the flattened map: width alignment and duplicate absolute
/// addresses.
fn check_flat_map(project: &Project, ctx: &mut ResolutionContext, sink: &DiagnosticSink) {
    let entries = match build_address_map(project, ctx) {
        Ok(entries) => entries,
        Err(err) => {
            sink.emit(codes::error_unresolved("<project>", &err.to_string()));
            return;
        }
    };

    for entry in &entries {
        let bytes = (entry.width as u64) / 8;
        if bytes > 1 && entry.address % bytes != 0 {
            let path = format!("{}.{}", entry.block_inst, entry.reg_inst);
            sink.emit(codes::error_misaligned(
                &path,
                &entry.token,
                entry.address,
                entry.width,
            ));
        }
    }

    let mut by_address: Vec<&crate::flatten::AddressEntry> = entries.iter().collect();
    by_address.sort_by_key(|e| e.address);
    for pair in by_address.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.address == b.address {
            sink.emit(codes::error_duplicate_address(
                &format!("{}.{}.{}", a.block_inst, a.reg_inst, a.token),
                &format!("{}.{}.{}", b.block_inst, b.reg_inst, b.token),
                a.address,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_common::Uuid;
    use regmap_db::{
        Block, BlockInstance, ParamValue, Parameter, Register, RegisterSet, RegisterSetInstance,
    };
    use regmap_diagnostics::Severity;

    /// A block with two register-set instances of an 0x100-byte set,
    /// placed at the given offsets.
    fn two_instance_project(offset_a: u64, offset_b: u64) -> Project {
        let mut regset = RegisterSet::new("regs");
        regset.ports.address_bus_width = 8;
        regset.registers.push(Register::new("Config", "CFG", 0x0));

        let mut block = Block::new("subsys");
        let set_id = block.add_regset(regset);
        block
            .regset_insts
            .push(RegisterSetInstance::new("a", set_id.clone(), offset_a));
        block
            .regset_insts
            .push(RegisterSetInstance::new("b", set_id, offset_b));

        let mut project = Project::new("soc");
        let blk_id = block.uuid.clone();
        project.blocks.insert(blk_id.clone(), block);
        project
            .block_insts
            .push(BlockInstance::new("chip0", blk_id, 0));
        project
    }

    #[test]
    fn overlapping_spans_are_reported() {
        let project = two_instance_project(0x0, 0x80);
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(!check_project(&project, &mut ctx, &sink));
        let diags = sink.diagnostics();
        assert!(diags.iter().any(|d| d.code == codes::E301));
        let overlap = diags.iter().find(|d| d.code == codes::E301).unwrap();
        assert!(overlap.message.contains("chip0.a [0x0, 0x100)"));
        assert!(overlap.message.contains("chip0.b [0x80, 0x180)"));
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let project = two_instance_project(0x0, 0x100);
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(check_project(&project, &mut ctx, &sink));
        assert!(!sink.has_errors());
    }

    #[test]
    fn undersized_repeat_spacing_is_reported() {
        let mut project = two_instance_project(0x0, 0x400);
        {
            let block = project.blocks.values_mut().next().unwrap();
            let inst = &mut block.regset_insts[0];
            inst.repeat = ParamValue::literal(2);
            inst.repeat_offset = 0x20; // set occupies 0x100
        }
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(!check_project(&project, &mut ctx, &sink));
        assert!(sink.diagnostics().iter().any(|d| d.code == codes::E302));
    }

    #[test]
    fn adequate_repeat_spacing_passes() {
        let mut project = two_instance_project(0x0, 0x400);
        {
            let block = project.blocks.values_mut().next().unwrap();
            let inst = &mut block.regset_insts[0];
            inst.repeat = ParamValue::literal(2);
            inst.repeat_offset = 0x100;
        }
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(check_project(&project, &mut ctx, &sink));
    }

    #[test]
    fn unresolved_repeat_is_reported_with_path() {
        let mut project = two_instance_project(0x0, 0x100);
        {
            let block = project.blocks.values_mut().next().unwrap();
            block.regset_insts[0].repeat = ParamValue::reference(Uuid::new("ghost"));
        }
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(!check_project(&project, &mut ctx, &sink));
        let diags = sink.diagnostics();
        let unresolved = diags.iter().find(|d| d.code == codes::E305).unwrap();
        assert_eq!(unresolved.origin.as_deref(), Some("chip0.a"));
    }

    #[test]
    fn misaligned_register_is_reported() {
        let mut project = two_instance_project(0x0, 0x100);
        {
            let block = project.blocks.values_mut().next().unwrap();
            let regset = block.regsets.values_mut().next().unwrap();
            regset.registers[0].address = 0x2; // 32-bit register, not 4-aligned
        }
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(!check_project(&project, &mut ctx, &sink));
        assert!(sink.diagnostics().iter().any(|d| d.code == codes::E303));
    }

    #[test]
    fn duplicate_absolute_address_is_reported() {
        // Two registers of one set declared at the same offset.
        let mut project = two_instance_project(0x0, 0x100);
        {
            let block = project.blocks.values_mut().next().unwrap();
            let regset = block.regsets.values_mut().next().unwrap();
            regset.registers.push(Register::new("Shadow", "SHDW", 0x0));
        }
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(!check_project(&project, &mut ctx, &sink));
        let diags = sink.diagnostics();
        let dup = diags.iter().find(|d| d.code == codes::E304).unwrap();
        assert!(dup.message.contains("0x0"));
    }

    #[test]
    fn out_of_range_default_warns_but_stays_safe() {
        let mut project = two_instance_project(0x0, 0x100);
        project.parameters.push(Parameter::new("DEPTH", 100, 0, 64));
        let mut ctx = project.build_context();
        let sink = DiagnosticSink::new();

        assert!(check_project(&project, &mut ctx, &sink));
        let diags = sink.diagnostics();
        let warning = diags.iter().find(|d| d.code == codes::W301).unwrap();
        assert_eq!(warning.severity, Severity::Warning);
    }
}
