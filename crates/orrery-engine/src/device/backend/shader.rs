use std::collections::HashMap;

use crate::device::ShaderStage;

use super::UNIFORM_SLOT_SIZE;

/// Vertex attribute location fed by mesh positions.
pub(crate) const POSITION_LOCATION: u32 = 0;

/// `(group, binding)` pairs the device provides: the per-draw uniform block,
/// the cube texture and its sampler.
const PROVIDED_BINDINGS: [(u32, u32); 3] = [(0, 0), (1, 0), (1, 1)];

/// A WGSL module that parsed and validated, with the reflection data the
/// backend needs for linking and uniform lookup.
pub(crate) struct CompiledModule {
    pub stage: ShaderStage,
    pub entry_point: String,
    /// Member name -> byte offset inside the `@group(0) @binding(0)` uniform block.
    pub uniforms: HashMap<String, u32>,
    /// `@location`s consumed by the entry point.
    pub inputs: Vec<u32>,
    /// `@location`s produced by the entry point.
    pub outputs: Vec<u32>,
}

/// Parses and validates `source`; errors carry naga's rendered diagnostics.
pub(crate) fn compile(stage: ShaderStage, source: &str) -> Result<CompiledModule, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    check_bindings(&module)?;

    let wanted = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == wanted)
        .ok_or_else(|| format!("source has no @{stage} entry point"))?;

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        collect_locations(&module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    let mut outputs = Vec::new();
    if let Some(result) = &entry.function.result {
        collect_locations(&module, result.ty, result.binding.as_ref(), &mut outputs);
    }

    Ok(CompiledModule {
        stage,
        entry_point: entry.name.clone(),
        uniforms: uniform_offsets(&module),
        inputs,
        outputs,
    })
}

/// Checks that a vertex and a fragment module fit together and with the mesh
/// vertex layout.
pub(crate) fn check_interface(vertex: &CompiledModule, fragment: &CompiledModule) -> Result<(), String> {
    if let Some(loc) = vertex.inputs.iter().find(|&&loc| loc != POSITION_LOCATION) {
        return Err(format!(
            "vertex input @location({loc}) is not provided by the mesh layout"
        ));
    }
    if let Some(loc) = fragment.inputs.iter().find(|loc| !vertex.outputs.contains(loc)) {
        return Err(format!(
            "fragment input @location({loc}) has no matching vertex output"
        ));
    }
    Ok(())
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(*location),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn check_bindings(module: &naga::Module) -> Result<(), String> {
    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else {
            continue;
        };
        if !PROVIDED_BINDINGS.contains(&(binding.group, binding.binding)) {
            return Err(format!(
                "@group({}) @binding({}) is not provided by the device",
                binding.group, binding.binding
            ));
        }

        if (binding.group, binding.binding) == (0, 0) {
            let inner = &module.types[var.ty].inner;
            let size = match inner {
                naga::TypeInner::Struct { span, .. } => *span,
                other => other.size(module.to_ctx()),
            };
            if size as usize > UNIFORM_SLOT_SIZE {
                return Err(format!(
                    "uniform block is {size} bytes; at most {UNIFORM_SLOT_SIZE} are supported"
                ));
            }
        }
    }
    Ok(())
}

fn uniform_offsets(module: &naga::Module) -> HashMap<String, u32> {
    let mut offsets = HashMap::new();

    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(naga::ResourceBinding { group: 0, binding: 0 }) = &var.binding else {
            continue;
        };

        match &module.types[var.ty].inner {
            naga::TypeInner::Struct { members, .. } => {
                for member in members {
                    if let Some(name) = &member.name {
                        offsets.insert(name.clone(), member.offset);
                    }
                }
            }
            _ => {
                if let Some(name) = &var.name {
                    offsets.insert(name.clone(), 0);
                }
            }
        }
    }

    offsets
}
