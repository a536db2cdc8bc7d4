use log::debug;
use ljargon_core::SolverError;
use crate::gpu::kernels::{kernel_source, FORCE_ENTRY, INIT_FORCE_ENTRY,
                          MOVE_ATOMS_BOOTSTRAP_ENTRY, MOVE_ATOMS_VERLET_ENTRY};

/// Device and the single ordered queue every copy and dispatch goes through.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter_name: String,
}

impl GpuContext {
    /// Acquire the default high performance adapter.
    pub fn new() -> Result<Self, SolverError> {
        // Backends::all => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            dx12_shader_compiler: Default::default(),
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| SolverError::AcceleratorUnavailable(String::from("no compatible adapter")))?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("ljargon device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None, // Trace path
        ))
        .map_err(|e| SolverError::AcceleratorUnavailable(e.to_string()))?;
        let adapter_name = adapter.get_info().name;
        debug!("Acquired device on {}", adapter_name);
        Ok(Self {
            device,
            queue,
            adapter_name,
        })
    }
}

/// Compiled kernels sharing one bind group layout.
pub struct Kernels {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub init_force: wgpu::ComputePipeline,
    pub force: wgpu::ComputePipeline,
    pub move_atoms_bootstrap: wgpu::ComputePipeline,
    pub move_atoms_verlet: wgpu::ComputePipeline,
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_compute_pipeline(device: &wgpu::Device,
                           layout: &wgpu::PipelineLayout,
                           module: &wgpu::ShaderModule,
                           entry_point: &str) -> wgpu::ComputePipeline {
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(entry_point),
        layout: Some(layout),
        module,
        entry_point,
    })
}

impl Kernels {
    /// Compile the kernel source. Validation errors are captured instead of
    /// reaching the device's uncaptured error handler.
    pub fn compile(context: &GpuContext) -> Result<Self, SolverError> {
        let device = &context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ljargon kernels"),
            source: wgpu::ShaderSource::Wgsl(kernel_source().into()),
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ljargon_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(1),
                storage_entry(2),
                storage_entry(3),
                storage_entry(4),
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ljargon pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let kernels = Kernels {
            init_force: create_compute_pipeline(device, &pipeline_layout, &module, INIT_FORCE_ENTRY),
            force: create_compute_pipeline(device, &pipeline_layout, &module, FORCE_ENTRY),
            move_atoms_bootstrap: create_compute_pipeline(device, &pipeline_layout, &module,
                                                          MOVE_ATOMS_BOOTSTRAP_ENTRY),
            move_atoms_verlet: create_compute_pipeline(device, &pipeline_layout, &module,
                                                       MOVE_ATOMS_VERLET_ENTRY),
            bind_group_layout,
        };
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(SolverError::KernelCompilation(error.to_string()));
        }
        Ok(kernels)
    }
}
