//! Static draw buffers
//!
//! Geometry is generated once at startup and uploaded here; nothing in these
//! buffers changes per frame.

use bytemuck::Zeroable;
use juxtapos_math::Hypercube;
use wgpu::util::DeviceExt;

use super::types::{HyperVertex, QuadVertex};

/// Vertex buffer plus face (triangle list) and edge (line list) index buffers
pub struct PeelMesh {
    vertex_buffer: wgpu::Buffer,
    face_index_buffer: wgpu::Buffer,
    face_index_count: u32,
    edge_index_buffer: wgpu::Buffer,
    edge_index_count: u32,
}

impl PeelMesh {
    /// Upload explicit vertices and indices
    pub fn new(
        device: &wgpu::Device,
        vertices: &[HyperVertex],
        face_indices: &[u32],
        edge_indices: &[u32],
    ) -> Self {
        let padding = [HyperVertex::zeroed()];
        let stored = if vertices.is_empty() { &padding[..] } else { vertices };
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Hypercube Vertex Buffer"),
            contents: bytemuck::cast_slice(stored),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let face_index_buffer = index_buffer(device, "Hypercube Face Index Buffer", face_indices);
        let edge_index_buffer = index_buffer(device, "Hypercube Edge Index Buffer", edge_indices);

        Self {
            vertex_buffer,
            face_index_buffer,
            face_index_count: face_indices.len() as u32,
            edge_index_buffer,
            edge_index_count: edge_indices.len() as u32,
        }
    }

    /// Upload a hypercube, coloring each vertex from its (padded) 4D position
    ///
    /// # Panics
    /// If the hypercube has more than 4 dimensions.
    pub fn from_hypercube(
        device: &wgpu::Device,
        cube: &Hypercube,
        color_fn: &dyn Fn(&[f32; 4]) -> [f32; 4],
    ) -> Self {
        let vertices: Vec<HyperVertex> = cube
            .vertex_positions::<4>()
            .into_iter()
            .map(|position| HyperVertex::new(position, color_fn(&position)))
            .collect();

        log::info!(
            "Uploading {}-cube: {} vertices, {} edges, {} quads, {} face indices",
            cube.dimension(),
            cube.vertex_count(),
            cube.edge_count(),
            cube.quad_count(),
            cube.quad_count() * 6,
        );

        Self::new(device, &vertices, &cube.face_indices(), &cube.edge_indices())
    }

    pub fn face_index_count(&self) -> u32 {
        self.face_index_count
    }

    pub fn edge_index_count(&self) -> u32 {
        self.edge_index_count
    }

    pub(crate) fn draw_faces(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.face_index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.face_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.face_index_count, 0, 0..1);
    }

    pub(crate) fn draw_edges(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.edge_index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.edge_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.edge_index_count, 0, 0..1);
    }
}

/// The full-viewport quad: the 2-cube's vertices and its single triangulated face
pub struct QuadMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl QuadMesh {
    pub fn new(device: &wgpu::Device) -> Self {
        let square = Hypercube::new(2);
        let vertices: Vec<QuadVertex> = square
            .vertex_positions::<2>()
            .into_iter()
            .map(|position| QuadVertex { position })
            .collect();
        let indices = square.face_indices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Composite Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            index_buffer: index_buffer(device, "Composite Quad Index Buffer", &indices),
            index_count: indices.len() as u32,
        }
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn index_buffer(device: &wgpu::Device, label: &str, indices: &[u32]) -> wgpu::Buffer {
    // Empty buffers cannot be sliced; keep one index of storage
    let contents: &[u32] = if indices.is_empty() { &[0] } else { indices };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(contents),
        usage: wgpu::BufferUsages::INDEX,
    })
}
