//! WGSL source of the accelerator kernels and the parameter block they read.
//!
//! The source is handed to wgpu as text; this module only decides what the
//! text and its bindings are.

use bytemuck::{Pod, Zeroable};

/// Invocations per workgroup of every kernel.
pub const WORK_GROUP_SIZE: u32 = 16;

const KERNEL_TEMPLATE: &str = include_str!("kernels.wgsl");

pub const INIT_FORCE_ENTRY: &str = "init_force";
pub const FORCE_ENTRY: &str = "force";
pub const MOVE_ATOMS_BOOTSTRAP_ENTRY: &str = "move_atoms_bootstrap";
pub const MOVE_ATOMS_VERLET_ENTRY: &str = "move_atoms_verlet";

/// Kernel source with the workgroup size filled in.
pub fn kernel_source() -> String {
    KERNEL_TEMPLATE.replace("{{WORK_GROUP_SIZE}}", &WORK_GROUP_SIZE.to_string())
}

/// Workgroups needed to give every atom one invocation.
pub fn workgroup_count(num_atoms: usize) -> u32 {
    ((num_atoms as u32) + WORK_GROUP_SIZE - 1) / WORK_GROUP_SIZE
}

/// Uniform block bound at `@binding(0)`. Layout matches `Params` in the WGSL source.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct KernelParams {
    pub num_atom: u32,
    pub shells: i32,
    pub periodic_length: f32,
    pub rc2: f32,
    pub dt: f32,
    pub lambda: f32,
    pub _padding: [u32; 2],
}
