extern crate ljargon_core;
extern crate nalgebra as na;
extern crate rayon;
pub mod gpu;
pub mod initializer;
pub mod macro_parameters;
pub mod solver;

pub use solver::Simulation;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{from_device_vectors, kernel_source, to_device_vectors, workgroup_count,
                     GpuEngine, KernelParams, FORCE_ENTRY, INIT_FORCE_ENTRY,
                     MOVE_ATOMS_BOOTSTRAP_ENTRY, MOVE_ATOMS_VERLET_ENTRY};
    use crate::initializer::{initialize_positions, initialize_velocities, normalize_direction,
                             WoodcockThermostat, FCC_BASIS};
    use crate::macro_parameters::{get_kinetic_energy, get_mean, get_temperature};
    use crate::solver::{image_shifts, par_update_force, update_force, Engine,
                        LennardJonesPotential, SerialEngine};
    use ljargon_core::{ParallelType, ReducedUnits, SimulationConfig, SolverError, State};
    use na::Vector3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn check_impulse(velocities: &[Vector3<f64>]) {
        let p: Vector3<f64> = velocities.iter().sum();
        assert!(p.x.abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);
    }

    fn test_config(supercells: usize, parallel_type: ParallelType) -> SimulationConfig {
        SimulationConfig {
            supercells,
            parallel_type,
            seed: Some(42),
            ..Default::default()
        }
    }

    /// Two atoms `distance` apart along x in a box large enough to ignore images.
    fn pair_state(distance: f64) -> State {
        let positions = vec![Vector3::new(1.0, 5.0, 5.0), Vector3::new(1.0 + distance, 5.0, 5.0)];
        State::new(positions, vec![Vector3::zeros(); 2], 10.0).expect("Can't create state")
    }

    fn lennard_jones_force(r: f64) -> f64 {
        48.0 * r.powi(-13) - 24.0 * r.powi(-7)
    }

    fn lennard_jones_energy(r: f64, units: &ReducedUnits) -> f64 {
        4.0 * (r.powi(-12) - r.powi(-6)) - units.vrc
    }

    #[test]
    fn initialize_fcc_lattice() {
        for supercells in 1..=4 {
            let positions = initialize_positions(supercells, 1.5);
            assert_eq!(positions.len(), 4 * supercells.pow(3));
            let center = get_mean(&positions);
            assert!(center.norm() < 1e-12);
        }
        let positions = initialize_positions(4, 1.5);
        assert_eq!(positions.len(), 256);
        // first cell emits its basis atoms in order
        for (n, (bx, by, bz)) in FCC_BASIS.iter().enumerate() {
            let offset = positions[n] - positions[0];
            assert!((offset - Vector3::new(*bx, *by, *bz) * 1.5).norm() < 1e-12);
        }
        // next cell along z comes right after
        let offset = positions[4] - positions[0];
        assert!((offset - Vector3::new(0.0, 0.0, 1.5)).norm() < 1e-12);
    }

    #[test]
    fn initialize_velocities_without_drift() {
        let units = ReducedUnits::new(1.0, 50.0);
        let mut rng = StdRng::seed_from_u64(1);
        let velocities = initialize_velocities(256, units.temperature, &mut rng);
        assert_eq!(velocities.len(), 256);
        check_impulse(&velocities);
        // drift removal only lowers the kinetic energy of the draw
        let kinetic_energy = get_kinetic_energy(&velocities);
        assert!(kinetic_energy <= 0.5 * 3.0 * units.temperature * 256.0 + 1e-9);
        assert!(kinetic_energy > 0.0);
    }

    #[test]
    fn degenerate_direction() {
        assert_eq!(normalize_direction(&Vector3::zeros()), None);
        assert_eq!(normalize_direction(&Vector3::new(f64::NAN, 0.0, 1.0)), None);
        let direction = normalize_direction(&Vector3::new(0.0, 3.0, 4.0)).expect("Can't normalize");
        assert!((direction - Vector3::new(0.0, 0.6, 0.8)).norm() < 1e-15);
    }

    #[test]
    fn woodcock_thermostat() {
        let thermostat = WoodcockThermostat::new(0.2);
        assert_eq!(thermostat.calculate_lambda(0.5, 0.5), 1.0);
        let lambda = thermostat.calculate_lambda(1.0, 0.5);
        assert!((lambda - f64::sqrt(0.6)).abs() < 1e-15);
        assert_eq!(thermostat.calculate_lambda(0.0, 0.5), 1.0);
        // with alpha = 1 nothing is rescaled
        assert_eq!(WoodcockThermostat::new(1.0).calculate_lambda(2.0, 0.5), 1.0);
    }

    #[test]
    fn lennard_jones() {
        let units = ReducedUnits::new(1.0, 50.0);
        let potential = LennardJonesPotential::new(&units);
        let r_min = 2.0f64.powf(1.0 / 6.0);
        let (energy, force) = potential.get_potential_and_force(r_min * r_min)
            .expect("Inside cutoff");
        assert!(force.abs() < 1e-12);
        assert!((energy - (-1.0 - units.vrc)).abs() < 1e-12);
        let (energy, _) = potential.get_potential_and_force(units.rc2).expect("At cutoff");
        assert!(energy.abs() < 1e-15);
        assert_eq!(potential.get_potential_and_force(units.rc2 * 1.0001), None);
        assert_eq!(potential.get_potential_and_force(0.0), None);
    }

    #[test]
    fn image_shift_count() {
        assert_eq!(image_shifts(0, 2.0).len(), 1);
        let shifts = image_shifts(3, 2.0);
        assert_eq!(shifts.len(), 343);
        assert_eq!(shifts.iter().filter(|image| image.is_origin).count(), 1);
        assert!(shifts.iter().any(|image| image.shift == Vector3::new(-6.0, 6.0, 0.0)));
    }

    #[test]
    fn update_force_lennard_jones_pair() {
        let units = ReducedUnits::new(1.0, 50.0);
        let potential = LennardJonesPotential::new(&units);
        let r = 1.2;
        for shells in [0, 1] {
            let mut state = pair_state(r);
            let sums = update_force(&mut state, &potential, shells);
            let f1 = state.forces[0];
            let f2 = state.forces[1];
            let expected = lennard_jones_force(r);
            // force on atom 0 points along r0 - r1
            assert!((f1.x + expected).abs() < 1e-10);
            assert!((f2.x - expected).abs() < 1e-10);
            assert!(f1.y.abs() < 1e-15 && f1.z.abs() < 1e-15);
            assert!((sums.potential_energy - lennard_jones_energy(r, &units)).abs() < 1e-12);
            assert!((sums.virial - expected * r).abs() < 1e-10);
        }
    }

    #[test]
    fn update_force_across_boundary() {
        let units = ReducedUnits::new(1.0, 50.0);
        let potential = LennardJonesPotential::new(&units);
        // 1.2 apart through the periodic boundary only
        let positions = vec![Vector3::new(0.1, 2.0, 2.0), Vector3::new(3.9, 2.0, 2.0)];
        let mut state = State::new(positions, vec![Vector3::zeros(); 2], 5.0)
            .expect("Can't create state");
        let sums = update_force(&mut state, &potential, 1);
        let expected = lennard_jones_force(1.2);
        assert!((state.forces[0].x - expected).abs() < 1e-9);
        assert!((state.forces[1].x + expected).abs() < 1e-9);
        assert!((sums.potential_energy - lennard_jones_energy(1.2, &units)).abs() < 1e-10);
        // without images the pair is outside the cutoff
        let sums = update_force(&mut state, &potential, 0);
        assert_eq!(state.forces[0], Vector3::zeros());
        assert_eq!(sums.potential_energy, 0.0);
    }

    #[test]
    fn serial_and_thread_pool_forces_agree() {
        let units = ReducedUnits::new(1.0, 50.0);
        let potential = LennardJonesPotential::new(&units);
        let mut positions = initialize_positions(2, units.lattice_constant);
        for (n, position) in positions.iter_mut().enumerate() {
            position.x += 0.01 * (n % 5) as f64;
            position.y -= 0.007 * (n % 3) as f64;
        }
        let count = positions.len();
        let mut serial = State::new(positions, vec![Vector3::zeros(); count], 2.0 * units.lattice_constant)
            .expect("Can't create state");
        let mut parallel = serial.clone();
        let serial_sums = update_force(&mut serial, &potential, 3);
        let parallel_sums = par_update_force(&mut parallel, &potential, 3);
        for (a, b) in serial.forces.iter().zip(parallel.forces.iter()) {
            assert!((a - b).norm() < 1e-10);
        }
        assert!((serial_sums.potential_energy - parallel_sums.potential_energy).abs() < 1e-9);
        // Newton's third law holds for the whole ensemble
        let total: Vector3<f64> = serial.forces.iter().sum();
        assert!(total.norm() < 1e-9);
    }

    #[test]
    fn host_and_device_forces_agree() {
        let units = ReducedUnits::new(1.0, 50.0);
        let mut positions = initialize_positions(2, units.lattice_constant);
        for (n, position) in positions.iter_mut().enumerate() {
            position.x += 0.02 * (n % 4) as f64;
            position.z -= 0.01 * (n % 7) as f64;
        }
        let count = positions.len();
        assert_eq!(count, 32);
        let mut host = State::new(positions, vec![Vector3::zeros(); count], 2.0 * units.lattice_constant)
            .expect("Can't create state");
        let mut device = host.clone();
        let mut gpu = match GpuEngine::new(&device, &units, 3) {
            Ok(engine) => engine,
            Err(SolverError::AcceleratorUnavailable(reason)) => {
                eprintln!("Skipping device comparison: {}", reason);
                return;
            }
            Err(e) => panic!("Can't create accelerator engine: {}", e),
        };
        SerialEngine::new(&units, 3).compute_forces(&mut host, &units).expect("Host forces");
        gpu.compute_forces(&mut device, &units).expect("Device forces");
        for (h, d) in host.forces.iter().zip(device.forces.iter()) {
            for axis in 0..3 {
                let tolerance = f64::max(1e-3, 1e-4 * h[axis].abs());
                assert!((h[axis] - d[axis]).abs() < tolerance,
                        "host {} and device {} differ", h[axis], d[axis]);
            }
        }
        assert!((host.macro_parameters.potential_energy
            - device.macro_parameters.potential_energy).abs() < 1e-9);
        // buffers are sized once at construction
        device.positions.pop();
        device.previous_positions.pop();
        device.velocities.pop();
        device.forces.pop();
        assert!(matches!(gpu.compute_forces(&mut device, &units), Err(SolverError::Configuration(_))));
        assert!(matches!(gpu.advance_step(&mut device, &units), Err(SolverError::Configuration(_))));
    }

    #[test]
    fn straight_line_from_rest() {
        // zero forces; the target temperature equals the kinetic one so lambda is 1
        let positions = vec![Vector3::new(2.0, 2.0, 2.0), Vector3::new(7.0, 7.0, 7.0)];
        let velocities = vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)];
        let state = State::new(positions, velocities, 10.0).expect("Can't create state");
        let mut units = ReducedUnits::new(1.0, 50.0);
        units.temperature = get_temperature(1.0, 2);
        let mut simulation = Simulation::from_state(state, units, ParallelType::NoParallel, 1)
            .expect("Can't create simulation");
        let expected = [(2.001, 6.999), (2.002, 6.998), (2.003, 6.997)];
        let mut previous = (2.0, 7.0);
        for (x0, x1) in expected {
            simulation.compute_forces().expect("Can't compute forces");
            assert_eq!(simulation.forces()[0], Vector3::zeros());
            simulation.advance_step().expect("Can't advance");
            let state = simulation.state();
            assert!((state.positions[0].x - x0).abs() < 1e-12);
            assert!((state.positions[1].x - x1).abs() < 1e-12);
            assert!((state.previous_positions[0].x - previous.0).abs() < 1e-12);
            assert!((state.previous_positions[1].x - previous.1).abs() < 1e-12);
            assert_eq!(state.positions[0].y, 2.0);
            assert!((state.velocities[0].x - 1.0).abs() < 1e-9);
            assert!((state.velocities[1].x + 1.0).abs() < 1e-9);
            previous = (x0, x1);
        }
        assert!((simulation.temperature() - units.temperature).abs() < 1e-9);
    }

    #[test]
    fn bootstrap_from_rest() {
        let state = pair_state(4.0);
        let units = ReducedUnits::new(1.0, 50.0);
        let mut simulation = Simulation::from_state(state, units, ParallelType::ThreadPool, 0)
            .expect("Can't create simulation");
        let start = simulation.positions().to_vec();
        simulation.compute_forces().expect("Can't compute forces");
        simulation.advance_step().expect("Can't advance");
        let state = simulation.state();
        assert_eq!(state.positions, start);
        assert_eq!(state.previous_positions, start);
        assert_eq!(state.velocities, vec![Vector3::zeros(); 2]);
        assert_eq!(simulation.temperature(), 0.0);
    }

    #[test]
    fn iteration_and_time() {
        let mut simulation = Simulation::new(test_config(1, ParallelType::NoParallel))
            .expect("Can't create simulation");
        assert_eq!(simulation.iteration(), 1);
        assert_eq!(simulation.time(), 0.0);
        for k in 1..=5u64 {
            simulation.compute_forces().expect("Can't compute forces");
            simulation.advance_step().expect("Can't advance");
            assert_eq!(simulation.iteration(), k + 1);
            assert_eq!(simulation.time(), k as f64 * simulation.units().dt);
        }
    }

    #[test]
    fn simulation_keeps_invariants() {
        let mut simulation = Simulation::new(test_config(2, ParallelType::ThreadPool))
            .expect("Can't create simulation");
        assert_eq!(simulation.num_atoms(), 32);
        assert_eq!(simulation.parallel_type(), ParallelType::ThreadPool);
        check_impulse(simulation.velocities());
        assert!(get_mean(simulation.positions()).norm() < 1e-12);
        let length = simulation.periodic_length();
        let mut energies = vec![];
        for _ in 0..20 {
            simulation.compute_forces().expect("Can't compute forces");
            simulation.advance_step().expect("Can't advance");
            for position in simulation.positions() {
                for axis in 0..3 {
                    assert!(position[axis] >= 0.0 && position[axis] < length);
                }
            }
            check_impulse(simulation.velocities());
            energies.push(simulation.total_energy());
        }
        // the thermostat acts on the first step only
        let reference = energies[1];
        for energy in &energies[1..] {
            assert!(((energy - reference) / reference).abs() < 5e-3);
        }
        assert!(simulation.temperature_kelvin() > 0.0);
        assert!(simulation.pressure().is_finite());
    }

    #[test]
    fn serial_and_thread_pool_trajectories_agree() {
        let mut serial = Simulation::new(test_config(2, ParallelType::NoParallel))
            .expect("Can't create simulation");
        let mut parallel = Simulation::new(test_config(2, ParallelType::ThreadPool))
            .expect("Can't create simulation");
        for _ in 0..3 {
            serial.compute_forces().expect("Can't compute forces");
            serial.advance_step().expect("Can't advance");
            parallel.compute_forces().expect("Can't compute forces");
            parallel.advance_step().expect("Can't advance");
        }
        for (a, b) in serial.positions().iter().zip(parallel.positions()) {
            assert!((a - b).norm() < 1e-10);
        }
        assert!((serial.total_energy() - parallel.total_energy()).abs() < 1e-9);
    }

    #[test]
    fn kernel_source_is_complete() {
        let source = kernel_source();
        assert!(!source.contains("{{"));
        assert!(source.contains("@workgroup_size(16)"));
        for entry in [INIT_FORCE_ENTRY, FORCE_ENTRY, MOVE_ATOMS_BOOTSTRAP_ENTRY, MOVE_ATOMS_VERLET_ENTRY] {
            assert!(source.contains(&format!("fn {}(", entry)), "missing {}", entry);
        }
        // uniform blocks are read in 16 byte rows
        assert_eq!(std::mem::size_of::<KernelParams>() % 16, 0);
    }

    #[test]
    fn workgroups_cover_every_atom() {
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(16), 1);
        assert_eq!(workgroup_count(17), 2);
        assert_eq!(workgroup_count(256), 16);
    }

    #[test]
    fn device_vectors() {
        let host = vec![Vector3::new(1.5, -2.0, 0.25), Vector3::new(0.0, 3.0, -1.0)];
        let device = to_device_vectors(&host);
        assert_eq!(device, vec![[1.5, -2.0, 0.25, 0.0], [0.0, 3.0, -1.0, 0.0]]);
        let mut back = vec![Vector3::zeros(); 2];
        from_device_vectors(&device, &mut back);
        assert_eq!(back, host);
    }

    #[test]
    fn invalid_configuration() {
        let res = Simulation::new(test_config(0, ParallelType::NoParallel));
        assert!(matches!(res, Err(SolverError::Configuration(_))));
        let units = ReducedUnits::new(1.0, 50.0);
        let state = State::new(vec![], vec![], 1.0).expect("Can't create state");
        let res = Simulation::from_state(state, units, ParallelType::NoParallel, 3);
        assert!(matches!(res, Err(SolverError::Configuration(_))));
        let mut state = pair_state(1.2);
        state.velocities.pop();
        let res = Simulation::from_state(state, units, ParallelType::NoParallel, 3);
        assert!(matches!(res, Err(SolverError::Configuration(_))));
        for length in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let mut state = pair_state(1.2);
            state.periodic_length = length;
            let res = Simulation::from_state(state, units, ParallelType::ThreadPool, 3);
            assert!(matches!(res, Err(SolverError::Configuration(_))));
        }
    }

    #[test]
    fn host_and_device_trajectories_agree() {
        let mut device = match Simulation::new(test_config(2, ParallelType::Accelerator)) {
            Ok(simulation) => simulation,
            Err(SolverError::AcceleratorUnavailable(reason)) => {
                eprintln!("Skipping device comparison: {}", reason);
                return;
            }
            Err(e) => panic!("Can't create accelerator simulation: {}", e),
        };
        let mut host = Simulation::new(test_config(2, ParallelType::NoParallel))
            .expect("Can't create simulation");
        assert_eq!(device.parallel_type(), ParallelType::Accelerator);
        assert_eq!(device.num_atoms(), 32);
        // bootstrap then two Verlet steps
        for _ in 0..3 {
            host.compute_forces().expect("Can't compute forces");
            host.advance_step().expect("Can't advance");
            device.compute_forces().expect("Can't compute forces");
            device.advance_step().expect("Can't advance");
        }
        assert_eq!(device.iteration(), host.iteration());
        assert_eq!(device.time(), host.time());
        for (h, d) in host.positions().iter().zip(device.positions()) {
            assert!((h - d).norm() < 1e-4, "positions {} and {} differ", h, d);
        }
        for (h, d) in host.state().previous_positions.iter().zip(&device.state().previous_positions) {
            assert!((h - d).norm() < 1e-4);
        }
        // device velocities are differences of f32 positions over 2 dt
        for (h, d) in host.velocities().iter().zip(device.velocities()) {
            assert!((h - d).norm() < 5e-3, "velocities {} and {} differ", h, d);
        }
        let energy = host.total_energy();
        assert!(((device.total_energy() - energy) / energy).abs() < 1e-3);
    }
}
