//! Accelerator engine built on wgpu compute kernels.
//!
//! Device arithmetic is single precision, so forces and trajectories agree
//! with the host engines only to f32 rounding. Potential energy and virial are
//! always summed on the host thread pool in double precision.

mod buffers;
mod context;
mod kernels;

pub use buffers::*;
pub use context::*;
pub use kernels::*;

use log::debug;
use ljargon_core::{ParallelType, ReducedUnits, SolverError, State};
use crate::macro_parameters::par_get_kinetic_energy;
use crate::solver::{finish_step, par_apply_boundary_conditions, par_get_pair_sums, prepare_step,
                    store_pair_sums, Engine, LennardJonesPotential, Stage};

pub struct GpuEngine {
    context: GpuContext,
    kernels: Kernels,
    buffers: DeviceBuffers,
    potential: LennardJonesPotential,
    shells: i32,
    workgroups: u32,
}

impl GpuEngine {
    pub fn new(state: &State, units: &ReducedUnits, shells: i32) -> Result<Self, SolverError> {
        let num_atoms = state.num_atoms();
        if num_atoms == 0 {
            return Err(SolverError::Configuration(String::from("ensemble has no atoms")));
        }
        let context = GpuContext::new()?;
        let workgroups = workgroup_count(num_atoms);
        let max_workgroups = context.device.limits().max_compute_workgroups_per_dimension;
        if workgroups > max_workgroups {
            return Err(SolverError::Configuration(format!(
                "{} atoms need {} workgroups, adapter allows {}",
                num_atoms, workgroups, max_workgroups)));
        }
        let kernels = Kernels::compile(&context)?;
        let buffers = DeviceBuffers::new(&context, &kernels.bind_group_layout, num_atoms);
        Ok(Self {
            context,
            kernels,
            buffers,
            potential: LennardJonesPotential::new(units),
            shells,
            workgroups,
        })
    }

    pub fn adapter_name(&self) -> &str {
        &self.context.adapter_name
    }

    /// The state handed in must still have the atom count the buffers were sized for.
    fn check_num_atoms(&self, state: &State) -> Result<(), SolverError> {
        if state.num_atoms() != self.buffers.num_atoms() {
            return Err(SolverError::Configuration(format!(
                "device buffers hold {} atoms, state has {}",
                self.buffers.num_atoms(), state.num_atoms())));
        }
        Ok(())
    }

    fn params(&self, state: &State, units: &ReducedUnits, lambda: f64) -> KernelParams {
        KernelParams {
            num_atom: state.num_atoms() as u32,
            shells: self.shells,
            periodic_length: state.periodic_length as f32,
            rc2: self.potential.cutoff_squared() as f32,
            dt: units.dt as f32,
            lambda: lambda as f32,
            _padding: [0; 2],
        }
    }

    /// Run `pipelines` in order over every atom and wait for them to finish.
    fn dispatch(&self, pipelines: &[&wgpu::ComputePipeline]) -> Result<(), SolverError> {
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("dispatch_encoder"),
        });
        for pipeline in pipelines {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("ljargon pass"),
            });
            compute_pass.set_pipeline(pipeline);
            compute_pass.set_bind_group(0, &self.buffers.bind_group, &[]);
            compute_pass.dispatch_workgroups(self.workgroups, 1, 1);
        }
        self.context.queue.submit(Some(encoder.finish()));
        device.poll(wgpu::Maintain::Wait);
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(SolverError::Synchronization(error.to_string()));
        }
        Ok(())
    }
}

impl Engine for GpuEngine {
    fn parallel_type(&self) -> ParallelType {
        ParallelType::Accelerator
    }

    fn compute_forces(&mut self, state: &mut State, units: &ReducedUnits) -> Result<(), SolverError> {
        self.check_num_atoms(state)?;
        let context = &self.context;
        self.buffers.write_params(context, &self.params(state, units, 1.0));
        self.buffers.upload(context, Quantity::Positions, &state.positions);
        self.dispatch(&[&self.kernels.init_force, &self.kernels.force])?;
        self.buffers.download(context, Quantity::Forces, &mut state.forces)?;
        let sums = par_get_pair_sums(&state.positions, state.periodic_length,
                                     &self.potential, self.shells);
        store_pair_sums(state, sums);
        Ok(())
    }

    fn advance_step(&mut self, state: &mut State, units: &ReducedUnits) -> Result<(), SolverError> {
        self.check_num_atoms(state)?;
        let kinetic_energy = par_get_kinetic_energy(&state.velocities);
        let stage = prepare_step(state, units, kinetic_energy);
        let (kernel, lambda) = match stage {
            Stage::Bootstrap { lambda } => (&self.kernels.move_atoms_bootstrap, lambda),
            Stage::Verlet => (&self.kernels.move_atoms_verlet, 1.0),
        };
        debug!("Dispatching {:?} over {} workgroups", stage, self.workgroups);
        let context = &self.context;
        self.buffers.write_params(context, &self.params(state, units, lambda));
        self.buffers.upload(context, Quantity::Positions, &state.positions);
        self.buffers.upload(context, Quantity::PreviousPositions, &state.previous_positions);
        self.buffers.upload(context, Quantity::Velocities, &state.velocities);
        self.buffers.upload(context, Quantity::Forces, &state.forces);
        self.dispatch(&[kernel])?;
        self.buffers.download(context, Quantity::Positions, &mut state.positions)?;
        self.buffers.download(context, Quantity::PreviousPositions, &mut state.previous_positions)?;
        self.buffers.download(context, Quantity::Velocities, &mut state.velocities)?;
        par_apply_boundary_conditions(state);
        finish_step(state, units);
        Ok(())
    }
}
