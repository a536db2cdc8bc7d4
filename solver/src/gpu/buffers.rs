//! Device mirrors of the particle arrays.
//!
//! Host arrays stay the source of truth. A quantity is written to the device
//! before a kernel reads it and read back before host code uses the kernel's
//! result. Writes, dispatches and reads all go through the one queue of
//! [GpuContext], so they execute in submission order.

use na::Vector3;
use ljargon_core::SolverError;
use crate::gpu::kernels::KernelParams;
use crate::gpu::GpuContext;

/// Device representation of a vector. The fourth component only pads to the
/// 16 byte `vec4<f32>` stride and is always zero.
pub type DeviceVector = [f32; 4];

const DEVICE_VECTOR_SIZE: usize = std::mem::size_of::<DeviceVector>();

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Quantity {
    Positions,
    PreviousPositions,
    Velocities,
    Forces,
}

pub fn to_device_vectors(host: &[Vector3<f64>]) -> Vec<DeviceVector> {
    host.iter()
        .map(|v| [v.x as f32, v.y as f32, v.z as f32, 0.0])
        .collect()
}

pub fn from_device_vectors(device: &[DeviceVector], host: &mut [Vector3<f64>]) {
    host.iter_mut()
        .zip(device.iter())
        .for_each(|(h, d)| *h = Vector3::new(d[0] as f64, d[1] as f64, d[2] as f64));
}

pub struct DeviceBuffers {
    num_atoms: usize,
    params: wgpu::Buffer,
    positions: wgpu::Buffer,
    previous_positions: wgpu::Buffer,
    velocities: wgpu::Buffer,
    forces: wgpu::Buffer,
    staging: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

fn create_storage_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_SRC
            | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl DeviceBuffers {
    pub fn new(context: &GpuContext, layout: &wgpu::BindGroupLayout, num_atoms: usize) -> Self {
        let device = &context.device;
        let size = (num_atoms * DEVICE_VECTOR_SIZE) as wgpu::BufferAddress;
        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("params_buffer"),
            size: std::mem::size_of::<KernelParams>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let positions = create_storage_buffer(device, "positions_buffer", size);
        let previous_positions = create_storage_buffer(device, "previous_positions_buffer", size);
        let velocities = create_storage_buffer(device, "velocities_buffer", size);
        let forces = create_storage_buffer(device, "forces_buffer", size);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staging_buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ljargon_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: positions.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: previous_positions.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: velocities.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: forces.as_entire_binding(),
                },
            ],
        });
        Self {
            num_atoms,
            params,
            positions,
            previous_positions,
            velocities,
            forces,
            staging,
            bind_group,
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    fn buffer(&self, quantity: Quantity) -> &wgpu::Buffer {
        match quantity {
            Quantity::Positions => &self.positions,
            Quantity::PreviousPositions => &self.previous_positions,
            Quantity::Velocities => &self.velocities,
            Quantity::Forces => &self.forces,
        }
    }

    pub fn write_params(&self, context: &GpuContext, params: &KernelParams) {
        context.queue.write_buffer(&self.params, 0, bytemuck::bytes_of(params));
    }

    /// Queue a host to device copy. It lands before any later submission on the queue.
    pub fn upload(&self, context: &GpuContext, quantity: Quantity, host: &[Vector3<f64>]) {
        debug_assert_eq!(host.len(), self.num_atoms);
        let data = to_device_vectors(host);
        context.queue.write_buffer(self.buffer(quantity), 0, bytemuck::cast_slice(&data));
    }

    /// Copy a quantity back to the host, blocking until the queue has drained.
    pub fn download(&self,
                    context: &GpuContext,
                    quantity: Quantity,
                    host: &mut [Vector3<f64>]) -> Result<(), SolverError> {
        let size = self.staging.size();
        let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("download_encoder"),
        });
        encoder.copy_buffer_to_buffer(self.buffer(quantity), 0, &self.staging, 0, size);
        context.queue.submit(Some(encoder.finish()));

        let slice = self.staging.slice(..);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        context.device.poll(wgpu::Maintain::Wait);
        pollster::block_on(rx.receive())
            .ok_or_else(|| SolverError::Synchronization(
                format!("{:?} buffer was never mapped", quantity)))?
            .map_err(|e| SolverError::Synchronization(
                format!("Can't map {:?} buffer: {:?}", quantity, e)))?;
        {
            let data = slice.get_mapped_range();
            from_device_vectors(bytemuck::cast_slice(&data), host);
        }
        self.staging.unmap();
        Ok(())
    }
}
