//! Declarative vertex layouts
//!
//! A [`VertexSchema`] is an ordered list of named attribute fields. Field order
//! is memory order: the byte offset of each field is the sum of the sizes of
//! the fields declared before it, and its shader location is its position in
//! the list. A `#[repr(C)]` vertex struct whose fields are declared in the same
//! order (and contain no padding) can therefore be uploaded as raw bytes.

/// Numeric type of a single attribute component
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    F32,
    U32,
    I32,
}

/// One named attribute of a vertex record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexField {
    pub name: &'static str,
    /// Number of components, 1 to 4
    pub components: u32,
    pub scalar: ScalarType,
}

impl VertexField {
    pub const fn new(name: &'static str, components: u32, scalar: ScalarType) -> Self {
        Self { name, components, scalar }
    }

    /// `components` f32 values
    pub const fn float(name: &'static str, components: u32) -> Self {
        Self::new(name, components, ScalarType::F32)
    }

    /// GPU attribute format for this field
    ///
    /// # Panics
    /// If `components` is not in `1..=4`.
    pub fn format(&self) -> wgpu::VertexFormat {
        use wgpu::VertexFormat as F;
        match (self.scalar, self.components) {
            (ScalarType::F32, 1) => F::Float32,
            (ScalarType::F32, 2) => F::Float32x2,
            (ScalarType::F32, 3) => F::Float32x3,
            (ScalarType::F32, 4) => F::Float32x4,
            (ScalarType::U32, 1) => F::Uint32,
            (ScalarType::U32, 2) => F::Uint32x2,
            (ScalarType::U32, 3) => F::Uint32x3,
            (ScalarType::U32, 4) => F::Uint32x4,
            (ScalarType::I32, 1) => F::Sint32,
            (ScalarType::I32, 2) => F::Sint32x2,
            (ScalarType::I32, 3) => F::Sint32x3,
            (ScalarType::I32, 4) => F::Sint32x4,
            (_, n) => panic!("vertex field '{}' has {} components, expected 1 to 4", self.name, n),
        }
    }

    /// Size of the field in bytes
    pub fn size(&self) -> u64 {
        self.format().size()
    }
}

/// Ordered set of vertex fields
#[derive(Clone, Copy, Debug)]
pub struct VertexSchema {
    fields: &'static [VertexField],
}

impl VertexSchema {
    pub const fn new(fields: &'static [VertexField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [VertexField] {
        self.fields
    }

    /// Bytes between consecutive vertices
    pub fn stride(&self) -> u64 {
        self.fields.iter().map(VertexField::size).sum()
    }

    /// Byte offset of the named field
    pub fn offset_of(&self, name: &str) -> Option<u64> {
        let mut offset = 0;
        for field in self.fields {
            if field.name == name {
                return Some(offset);
            }
            offset += field.size();
        }
        None
    }

    /// Attribute bindings: location = declaration index, offsets in declaration order
    pub fn attributes(&self) -> Vec<wgpu::VertexAttribute> {
        let mut offset = 0;
        self.fields
            .iter()
            .enumerate()
            .map(|(location, field)| {
                let attribute = wgpu::VertexAttribute {
                    format: field.format(),
                    offset,
                    shader_location: location as u32,
                };
                offset += field.size();
                attribute
            })
            .collect()
    }
}

/// A vertex record type described by a schema
pub trait Vertex: bytemuck::Pod {
    const SCHEMA: VertexSchema;
}

/// Owned attribute list for building a `wgpu::VertexBufferLayout`
#[derive(Clone, Debug)]
pub struct VertexLayout {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// Layout for `V`
    ///
    /// # Panics
    /// If the schema stride disagrees with `size_of::<V>()`, i.e. the struct
    /// and its schema have drifted apart.
    pub fn of<V: Vertex>() -> Self {
        let stride = V::SCHEMA.stride();
        assert_eq!(
            stride,
            std::mem::size_of::<V>() as u64,
            "vertex schema stride does not match the record size"
        );
        Self {
            stride,
            attributes: V::SCHEMA.attributes(),
        }
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
