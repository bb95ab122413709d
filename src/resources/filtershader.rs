//! Full-screen color filter applied while blitting the render target.
//!
//! The accessibility [`DisplayFilter`](crate::resources::accessibility::DisplayFilter)
//! composes into a single affine [`ColorMatrix`]; this shader applies it per
//! pixel. The three rows are uploaded as `vec4` uniforms (`colorRow0..2`).
//!
//! NonSend: the shader lives in the GL context of the main thread.

use std::ffi::CString;

use log::warn;
use raylib::ffi;

use crate::resources::accessibility::ColorMatrix;

const FILTER_FS: &str = r#"#version 330
in vec2 fragTexCoord;
in vec4 fragColor;
uniform sampler2D texture0;
uniform vec4 colDiffuse;
uniform vec4 colorRow0;
uniform vec4 colorRow1;
uniform vec4 colorRow2;
out vec4 finalColor;

void main() {
    vec4 texel = texture(texture0, fragTexCoord) * colDiffuse * fragColor;
    vec3 c = texel.rgb;
    vec3 filtered = vec3(
        dot(colorRow0.xyz, c) + colorRow0.w,
        dot(colorRow1.xyz, c) + colorRow1.w,
        dot(colorRow2.xyz, c) + colorRow2.w
    );
    finalColor = vec4(clamp(filtered, 0.0, 1.0), texel.a);
}
"#;

const ROW_UNIFORMS: [&str; 3] = ["colorRow0", "colorRow1", "colorRow2"];

pub struct ColorFilterShader {
    shader: ffi::Shader,
    /// Uniform locations of the three rows. -1 means not found.
    locations: [i32; 3],
    /// Last uploaded matrix, to skip redundant uploads.
    uploaded: Option<ColorMatrix>,
}

impl ColorFilterShader {
    /// Compile the filter shader. Requires an initialized window.
    pub fn load() -> Result<Self, String> {
        let fs = CString::new(FILTER_FS).map_err(|e| e.to_string())?;
        let shader = unsafe { ffi::LoadShaderFromMemory(std::ptr::null(), fs.as_ptr()) };
        if !unsafe { ffi::IsShaderValid(shader) } {
            return Err("color filter shader failed to compile".to_string());
        }
        let mut locations = [-1; 3];
        for (slot, name) in locations.iter_mut().zip(ROW_UNIFORMS) {
            let cname = CString::new(name).map_err(|e| e.to_string())?;
            *slot = unsafe { ffi::GetShaderLocation(shader, cname.as_ptr()) };
            if *slot < 0 {
                warn!("color filter uniform '{}' not found", name);
            }
        }
        Ok(Self {
            shader,
            locations,
            uploaded: None,
        })
    }

    /// Upload `matrix` if it differs from the last one.
    pub fn set_matrix(&mut self, matrix: &ColorMatrix) {
        if self.uploaded.as_ref() == Some(matrix) {
            return;
        }
        for (row, loc) in matrix.rows.iter().zip(self.locations) {
            if loc < 0 {
                continue;
            }
            unsafe {
                ffi::SetShaderValue(
                    self.shader,
                    loc,
                    row.as_ptr() as *const std::ffi::c_void,
                    ffi::ShaderUniformDataType::SHADER_UNIFORM_VEC4 as i32,
                );
            }
        }
        self.uploaded = Some(*matrix);
    }

    /// Run `draw` with the filter active.
    pub fn with_filter(&self, draw: impl FnOnce()) {
        unsafe { ffi::BeginShaderMode(self.shader) };
        draw();
        unsafe { ffi::EndShaderMode() };
    }
}

impl Drop for ColorFilterShader {
    fn drop(&mut self) {
        unsafe { ffi::UnloadShader(self.shader) };
    }
}
