//! Name-addressed uniform storage laid out by WGSL uniform address space rules.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniformType {
    F32,
    U32,
    I32,
    Vec2F32,
    Vec4F32,
}

impl UniformType {
    const fn size(self) -> usize {
        match self {
            Self::F32 | Self::U32 | Self::I32 => 4,
            Self::Vec2F32 => 8,
            Self::Vec4F32 => 16,
        }
    }

    const fn align(self) -> usize {
        match self {
            Self::F32 | Self::U32 | Self::I32 => 4,
            Self::Vec2F32 => 8,
            Self::Vec4F32 => 16,
        }
    }
}

/// Resolved position of one uniform inside its block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformLocation {
    offset: usize,
    ty: UniformType,
}

impl UniformLocation {
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn ty(&self) -> UniformType {
        self.ty
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UniformField {
    name: &'static str,
    location: UniformLocation,
}

/// CPU staging copy of one uniform buffer.
///
/// Lookups of undeclared names yield `None`, and every setter treats `None`
/// as a no-op, so callers never need to check whether a shader variant
/// actually uses a uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBlock {
    fields: Vec<UniformField>,
    bytes: Vec<u8>,
    changed: bool,
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

impl UniformBlock {
    /// Lays out `fields` in declaration order, matching a WGSL struct with the same members.
    #[must_use]
    pub fn new(fields: &[(&'static str, UniformType)]) -> Self {
        let mut offset = 0;
        let mut struct_align = 16;
        let mut laid_out = Vec::with_capacity(fields.len());

        for &(name, ty) in fields {
            offset = round_up(offset, ty.align());
            struct_align = struct_align.max(ty.align());
            laid_out.push(UniformField {
                name,
                location: UniformLocation { offset, ty },
            });
            offset += ty.size();
        }

        Self {
            fields: laid_out,
            bytes: vec![0; round_up(offset.max(1), struct_align)],
            changed: true,
        }
    }

    /// The invalid-location sentinel is `None`.
    #[must_use]
    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.location)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether anything was written since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }

    pub fn set_f32(&mut self, location: Option<UniformLocation>, value: f32) {
        self.write(location, UniformType::F32, &value.to_le_bytes());
    }

    pub fn set_u32(&mut self, location: Option<UniformLocation>, value: u32) {
        self.write(location, UniformType::U32, &value.to_le_bytes());
    }

    pub fn set_i32(&mut self, location: Option<UniformLocation>, value: i32) {
        self.write(location, UniformType::I32, &value.to_le_bytes());
    }

    pub fn set_vec2(&mut self, location: Option<UniformLocation>, value: [f32; 2]) {
        let mut bytes = [0; 8];
        bytes[..4].copy_from_slice(&value[0].to_le_bytes());
        bytes[4..].copy_from_slice(&value[1].to_le_bytes());
        self.write(location, UniformType::Vec2F32, &bytes);
    }

    pub fn set_vec4(&mut self, location: Option<UniformLocation>, value: [f32; 4]) {
        let mut bytes = [0; 16];
        for (chunk, component) in bytes.chunks_exact_mut(4).zip(value) {
            chunk.copy_from_slice(&component.to_le_bytes());
        }
        self.write(location, UniformType::Vec4F32, &bytes);
    }

    /// Convenience for `set_*(self.location(name), ..)`.
    pub fn set_f32_by_name(&mut self, name: &str, value: f32) {
        self.set_f32(self.location(name), value);
    }

    pub fn set_u32_by_name(&mut self, name: &str, value: u32) {
        self.set_u32(self.location(name), value);
    }

    pub fn set_vec2_by_name(&mut self, name: &str, value: [f32; 2]) {
        self.set_vec2(self.location(name), value);
    }

    fn write(&mut self, location: Option<UniformLocation>, ty: UniformType, bytes: &[u8]) {
        let Some(location) = location else {
            return;
        };
        if location.ty != ty {
            log::debug!(
                "uniform write of {:?} to {:?} slot ignored",
                ty,
                location.ty
            );
            return;
        }

        let end = location.offset + bytes.len();
        if let Some(slot) = self.bytes.get_mut(location.offset..end) {
            if *slot != *bytes {
                slot.copy_from_slice(bytes);
                self.changed = true;
            }
        }
    }
}
