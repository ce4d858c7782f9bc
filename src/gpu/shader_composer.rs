use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::TriviewError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming shaders
/// use `#import triview::module_name::item` to pull in shared code. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse at
/// runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// A WGSL entry shader that can be composed into a pipeline module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Per-viewport fullscreen background fill.
    Background,
    /// Lit / unlit / textured scene meshes.
    Scene,
    /// Translate gizmo handle lines.
    Gizmo,
}

impl Shader {
    /// Every entry shader.
    pub const ALL: [Shader; 3] = [Shader::Background, Shader::Scene, Shader::Gizmo];

    fn source(self) -> &'static str {
        match self {
            Self::Background => {
                include_str!("../../assets/shaders/background.wgsl")
            }
            Self::Scene => include_str!("../../assets/shaders/scene.wgsl"),
            Self::Gizmo => include_str!("../../assets/shaders/gizmo.wgsl"),
        }
    }

    fn file_path(self) -> &'static str {
        match self {
            Self::Background => "background.wgsl",
            Self::Scene => "scene.wgsl",
            Self::Gizmo => "gizmo.wgsl",
        }
    }
}

/// Shared module definitions in dependency order: (source, file path).
const MODULES: &[(&str, &str)] = &[
    (
        include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        "modules/fullscreen.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/view.wgsl"),
        "modules/view.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/hemisphere.wgsl"),
        "modules/hemisphere.wgsl",
    ),
];

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::ShaderCompose`] if a shared module fails to
    /// parse.
    pub fn new() -> Result<Self, TriviewError> {
        let mut composer = Composer::default();
        for &(source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    TriviewError::ShaderCompose(format!(
                        "failed to register '{file_path}': {e}"
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose an entry shader into a `wgpu::ShaderModule` ready for
    /// pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::ShaderCompose`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, TriviewError> {
        let naga_module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose an entry shader into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::ShaderCompose`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, TriviewError> {
        let file_path = shader.file_path();
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                TriviewError::ShaderCompose(format!(
                    "failed to compose '{file_path}': {e}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer
                .compose_naga(shader)
                .unwrap_or_else(|e| panic!("{shader:?} failed: {e}"));
            let entry_points: Vec<&str> = module
                .entry_points
                .iter()
                .map(|ep| ep.name.as_str())
                .collect();
            assert!(entry_points.contains(&"vs_main"), "{shader:?}");
            assert!(entry_points.contains(&"fs_main"), "{shader:?}");
        }
    }

    #[test]
    fn composed_modules_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer.compose_naga(shader).unwrap();
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            );
            let _ = validator
                .validate(&module)
                .unwrap_or_else(|e| panic!("{shader:?} invalid: {e:?}"));
        }
    }
}
