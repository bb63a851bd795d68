use super::{ShaderError, ShaderSource};

/// A shader that parsed, validated against the device's capabilities and
/// exposes both stage entry points.
///
/// Only obtainable through [`validate`].
#[derive(Debug, Clone)]
pub struct ValidatedShader {
    source: ShaderSource,

    /// `@location` inputs of the vertex entry point, ascending.
    vertex_inputs: Vec<u32>,
}

impl ValidatedShader {
    pub fn label(&self) -> &str {
        &self.source.label
    }

    pub fn vertex_entry(&self) -> &str {
        &self.source.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.source.fragment_entry
    }

    pub fn vertex_inputs(&self) -> &[u32] {
        &self.vertex_inputs
    }

    /// Creates the device-side shader module.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.source.label.as_ref()),
            source: wgpu::ShaderSource::Wgsl(self.source.wgsl.clone()),
        })
    }
}

/// Shader capabilities the device grants, given its enabled features.
pub fn capabilities_for(features: wgpu::Features) -> naga::valid::Capabilities {
    use naga::valid::Capabilities;

    let mut caps = Capabilities::empty();
    if features.contains(wgpu::Features::SHADER_F64) {
        caps |= Capabilities::FLOAT64;
    }
    if features.contains(wgpu::Features::SHADER_INT64) {
        caps |= Capabilities::SHADER_INT64;
    }
    if features.contains(wgpu::Features::SHADER_PRIMITIVE_INDEX) {
        caps |= Capabilities::PRIMITIVE_INDEX;
    }
    caps
}

/// Parses and validates `source` with naga for a device with `features`, then
/// checks its entry points.
pub fn validate(
    source: &ShaderSource,
    features: wgpu::Features,
) -> Result<ValidatedShader, ShaderError> {
    let label = source.label.to_string();

    let module = naga::front::wgsl::parse_str(&source.wgsl).map_err(|e| ShaderError::Parse {
        label: label.clone(),
        message: e.emit_to_string(&source.wgsl),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        capabilities_for(features),
    );

    validator
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            label: label.clone(),
            message: e.into_inner().to_string(),
        })?;

    let vertex = find_entry(&module, &label, &source.vertex_entry, naga::ShaderStage::Vertex, "vertex")?;
    find_entry(&module, &label, &source.fragment_entry, naga::ShaderStage::Fragment, "fragment")?;

    let vertex_inputs = input_locations(&module, vertex);

    log::debug!(
        "shader '{label}' validated (vertex inputs at {vertex_inputs:?})"
    );

    Ok(ValidatedShader {
        source: source.clone(),
        vertex_inputs,
    })
}

fn find_entry<'m>(
    module: &'m naga::Module,
    label: &str,
    name: &str,
    stage: naga::ShaderStage,
    stage_name: &'static str,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or_else(|| ShaderError::MissingEntryPoint {
            label: label.to_string(),
            name: name.to_string(),
            stage: stage_name,
        })
}

/// Collects `@location` bindings of an entry point's arguments, including the
/// members of struct-typed arguments.
fn input_locations(module: &naga::Module, entry: &naga::EntryPoint) -> Vec<u32> {
    let mut locations = Vec::new();

    for arg in &entry.function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => locations.push(*location),
            Some(_) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    locations.extend(members.iter().filter_map(|m| match &m.binding {
                        Some(naga::Binding::Location { location, .. }) => Some(*location),
                        _ => None,
                    }));
                }
            }
        }
    }

    locations.sort_unstable();
    locations
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use crate::shader::{FRAGMENT_ENTRY, VERTEX_ENTRY};

    const VERTEX_ONLY: &str = r#"
        @vertex
        fn basic_vertex(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(p, 1.0);
        }
    "#;

    const FLOAT64_LOCAL: &str = r#"
        @vertex
        fn basic_vertex(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
            let scale: f64 = 1.0lf;
            return vec4<f32>(p * f32(scale), 1.0);
        }
        @fragment
        fn basic_fragment() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0);
        }
    "#;

    const STRUCT_INPUTS: &str = r#"
        struct In {
            @location(2) color: vec4<f32>,
            @location(0) position: vec3<f32>,
        };
        @vertex
        fn basic_vertex(v: In, @builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(v.position, 1.0) + v.color * 0.0;
        }
        @fragment
        fn basic_fragment() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0);
        }
    "#;

    fn check(source: &ShaderSource) -> Result<ValidatedShader, ShaderError> {
        validate(source, wgpu::Features::empty())
    }

    // ── bundled shader ────────────────────────────────────────────────────

    #[test]
    fn bundled_triangle_shader_validates() {
        let shader = check(&ShaderSource::triangle()).expect("bundled shader must validate");
        assert_eq!(shader.vertex_entry(), VERTEX_ENTRY);
        assert_eq!(shader.fragment_entry(), FRAGMENT_ENTRY);
        assert_eq!(shader.label(), "triangle");
        assert_eq!(shader.vertex_inputs(), &[0]);
    }

    #[test]
    fn bundled_entry_names_are_fixed() {
        assert_eq!(VERTEX_ENTRY, "basic_vertex");
        assert_eq!(FRAGMENT_ENTRY, "basic_fragment");
    }

    // ── capabilities ──────────────────────────────────────────────────────

    #[test]
    fn no_features_grant_no_capabilities() {
        assert!(capabilities_for(wgpu::Features::empty()).is_empty());
    }

    #[test]
    fn shader_f64_feature_grants_float64() {
        let caps = capabilities_for(wgpu::Features::SHADER_F64);
        assert!(caps.contains(naga::valid::Capabilities::FLOAT64));
    }

    #[test]
    fn float64_rejected_without_device_feature() {
        let err = check(&ShaderSource::wgsl("f64", FLOAT64_LOCAL)).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Validation { ref label, .. } | ShaderError::Parse { ref label, .. }
                if label == "f64"
        ));
    }

    #[test]
    fn float64_accepted_with_device_feature() {
        let source = ShaderSource::wgsl("f64", FLOAT64_LOCAL);
        assert!(validate(&source, wgpu::Features::SHADER_F64).is_ok());
    }

    // ── vertex inputs ─────────────────────────────────────────────────────

    #[test]
    fn struct_member_locations_are_collected() {
        let shader = check(&ShaderSource::wgsl("struct-in", STRUCT_INPUTS)).unwrap();
        assert_eq!(shader.vertex_inputs(), &[0, 2]);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn syntax_error_is_parse_error() {
        let err = check(&ShaderSource::wgsl("broken", "fn basic_vertex( {")).unwrap_err();
        assert!(matches!(err, ShaderError::Parse { ref label, .. } if label == "broken"));
    }

    #[test]
    fn type_error_is_rejected() {
        let src = r#"
            @vertex
            fn basic_vertex() -> @builtin(position) vec4<f32> {
                return 1.0;
            }
            @fragment
            fn basic_fragment() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
        "#;
        // naga reports some type errors while lowering; either kind is a compile failure.
        let err = check(&ShaderSource::wgsl("mistyped", src)).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Parse { .. } | ShaderError::Validation { .. }
        ));
    }

    #[test]
    fn missing_fragment_entry_is_reported() {
        let err = check(&ShaderSource::wgsl("vertex-only", VERTEX_ONLY)).unwrap_err();
        assert_eq!(
            err,
            ShaderError::MissingEntryPoint {
                label: "vertex-only".to_string(),
                name: FRAGMENT_ENTRY.to_string(),
                stage: "fragment",
            }
        );
    }

    #[test]
    fn entry_with_wrong_stage_is_not_accepted() {
        let mut source = ShaderSource::triangle();
        source.fragment_entry = Cow::Borrowed(VERTEX_ENTRY);
        let err = check(&source).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::MissingEntryPoint { stage: "fragment", .. }
        ));
    }

    #[test]
    fn error_message_names_the_shader() {
        let err = check(&ShaderSource::wgsl("vertex-only", VERTEX_ONLY)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("vertex-only"));
        assert!(msg.contains("basic_fragment"));
    }
}
