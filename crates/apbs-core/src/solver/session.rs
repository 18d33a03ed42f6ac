use super::error::SolverError;
use super::library::{CalculationKind, PrintDirective, Resource, SolverLibrary};
use super::results::{CalculationResult, CalculationResults};
use crate::core::io::pqr;
use tracing::{debug, info, instrument, warn};

/// Exclusive use of a solver library for one run.
///
/// Every solver resource is released in [`Resource::TEARDOWN_ORDER`] exactly once, when the
/// session is closed or dropped, whichever happens first.
pub struct SolverSession<'a, L: SolverLibrary> {
    library: &'a mut L,
    released: bool,
}

impl<'a, L: SolverLibrary> SolverSession<'a, L> {
    pub fn open(library: &'a mut L) -> Self {
        Self {
            library,
            released: false,
        }
    }

    pub fn library(&mut self) -> &mut L {
        self.library
    }

    pub fn close(mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        debug!("Releasing solver resources.");
        for resource in Resource::TEARDOWN_ORDER {
            self.library.release(resource);
        }
    }
}

impl<L: SolverLibrary> Drop for SolverSession<'_, L> {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Runs every calculation of `deck` on the atoms of the PQR `molecule`.
///
/// Calculations run in deck order, and print directives are executed afterwards. An
/// undefined print directive stops print processing without failing the run.
#[instrument(skip_all, name = "local_solver_run")]
pub fn run_calculations<L: SolverLibrary>(
    library: &mut L,
    deck: &str,
    molecule: &str,
) -> Result<CalculationResults, SolverError> {
    let mut session = SolverSession::open(library);
    let solver = session.library();

    let layout = solver.parse_input(deck)?;
    let atoms = pqr::read_atoms_from_str(molecule)?;
    info!(atoms = atoms.len(), "Loaded molecule.");
    solver.load_atoms(&atoms)?;
    solver.setup_calculations()?;

    info!(
        "Preparing to run {} PBE calculations.",
        layout.calculation_count
    );
    let mut calculations = Vec::with_capacity(layout.calculation_count);
    for index in 0..layout.calculation_count {
        let number = index + 1;
        let calc = solver.calculation(index)?;
        if calc.kind != CalculationKind::Multigrid {
            return Err(SolverError::UnsupportedCalculation {
                number,
                kind: calc.kind,
            });
        }
        match &calc.name {
            Some(name) => info!("CALCULATION #{number} ({name}): MULTIGRID"),
            None => info!("CALCULATION #{number}: MULTIGRID"),
        }

        let total_energy = solver.solve(index)?;
        let has_forces = solver.compute_forces(index)?;
        let potentials = solver.potentials(index)?;
        let energies = solver.energies(index)?;
        let forces = if has_forces {
            Some(solver.forces(index)?)
        } else {
            None
        };

        calculations.push(CalculationResult {
            name: calc.name,
            total_energy,
            potentials,
            energies,
            forces,
        });
    }

    let results = CalculationResults::new(calculations);
    let totals = results.total_energies();
    for (index, directive) in layout.print_directives.iter().enumerate() {
        match directive {
            PrintDirective::Energy => solver.print_energy(index, &totals)?,
            PrintDirective::Force => solver.print_force(index)?,
            PrintDirective::Undefined => {
                warn!(
                    directive = index,
                    "Undefined PRINT keyword; skipping remaining print statements."
                );
                break;
            }
        }
    }

    session.close();
    Ok(results)
}
