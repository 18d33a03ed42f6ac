use super::error::SolverError;
use crate::core::models::atoms::AtomList;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationKind {
    Multigrid,
    FiniteElement,
    /// A calculation type code this driver does not know.
    Other(i32),
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationKind::Multigrid => f.write_str("multigrid"),
            CalculationKind::FiniteElement => f.write_str("finite-element"),
            CalculationKind::Other(code) => write!(f, "type {code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationInfo {
    pub kind: CalculationKind,
    /// Name given in the `elec name ...` block, if any.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintDirective {
    Energy,
    Force,
    Undefined,
}

/// What the library found in the parsed input deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckLayout {
    pub calculation_count: usize,
    pub print_directives: Vec<PrintDirective>,
}

/// Per-atom force components in kT/Å: fixed-charge, ionic boundary and dielectric
/// boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomForces {
    pub qf: Vec<[f64; 3]>,
    pub ib: Vec<[f64; 3]>,
    pub db: Vec<[f64; 3]>,
}

/// Solver-owned structures that must be destroyed after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Forces,
    Energy,
    Multigrid,
    ChargeMaps,
    KappaMaps,
    DielectricMaps,
    Molecules,
}

impl Resource {
    /// The order in which resources are released.
    pub const TEARDOWN_ORDER: [Resource; 7] = [
        Resource::Forces,
        Resource::Energy,
        Resource::Multigrid,
        Resource::ChargeMaps,
        Resource::KappaMaps,
        Resource::DielectricMaps,
        Resource::Molecules,
    ];
}

/// The calls exposed by a native APBS library.
///
/// This crate ships no implementation. Implementors provide the binding to a compiled APBS
/// library (for example through FFI) and hand it to [`super::session::run_calculations`].
///
/// Calculation indices are zero-based. Implementations keep all solver state internally;
/// the driver only sequences the calls and collects the results.
pub trait SolverLibrary {
    /// Parses an input deck held in memory.
    fn parse_input(&mut self, deck: &str) -> Result<DeckLayout, SolverError>;

    /// Loads atoms into the solver's internal molecule list.
    fn load_atoms(&mut self, atoms: &AtomList) -> Result<(), SolverError>;

    /// Sets up the electrostatics calculations and loads dielectric, kappa and charge maps.
    fn setup_calculations(&mut self) -> Result<(), SolverError>;

    fn calculation(&self, index: usize) -> Result<CalculationInfo, SolverError>;

    /// Initializes and solves one calculation, returning its total energy in kT.
    fn solve(&mut self, index: usize) -> Result<f64, SolverError>;

    /// Computes forces for one calculation. Returns `false` when the deck requested none.
    fn compute_forces(&mut self, index: usize) -> Result<bool, SolverError>;

    /// Per-atom potentials in kT/e.
    fn potentials(&self, index: usize) -> Result<Vec<f64>, SolverError>;

    /// Per-atom energies in kT.
    fn energies(&self, index: usize) -> Result<Vec<f64>, SolverError>;

    fn forces(&self, index: usize) -> Result<AtomForces, SolverError>;

    fn print_energy(&mut self, directive: usize, totals: &[f64]) -> Result<(), SolverError>;

    fn print_force(&mut self, directive: usize) -> Result<(), SolverError>;

    /// Destroys one group of solver structures. Called once per resource after a run.
    fn release(&mut self, resource: Resource);
}
