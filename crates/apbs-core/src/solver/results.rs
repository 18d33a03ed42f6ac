use super::library::AtomForces;
use crate::core::units;
use std::fmt;

/// Raw outputs of one solved calculation, in the solver's thermal units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationResult {
    pub name: Option<String>,
    /// Total electrostatic energy in kT.
    pub total_energy: f64,
    pub potentials: Vec<f64>,
    pub energies: Vec<f64>,
    /// Present only when the deck requested forces for this calculation.
    pub forces: Option<AtomForces>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResults {
    pub calculations: Vec<CalculationResult>,
    factor: f64,
}

impl CalculationResults {
    pub fn new(calculations: Vec<CalculationResult>) -> Self {
        Self::with_conversion(calculations, units::unit_conversion())
    }

    /// Uses a custom kT to kJ/mol factor, e.g. for a non-default temperature.
    pub fn with_conversion(calculations: Vec<CalculationResult>, factor: f64) -> Self {
        Self {
            calculations,
            factor,
        }
    }

    pub fn total_energies(&self) -> Vec<f64> {
        self.calculations.iter().map(|c| c.total_energy).collect()
    }

    /// Per-atom energies of one calculation in kJ/mol.
    ///
    /// Each pairwise interaction is counted once per partner atom, hence the factor of one
    /// half.
    pub fn energies_kj_per_mol(&self, calculation: usize) -> Option<Vec<f64>> {
        self.calculations
            .get(calculation)
            .map(|c| c.energies.iter().map(|e| e * self.factor * 0.5).collect())
    }

    /// Per-atom forces of one calculation in kJ/(mol·Å), if computed.
    pub fn forces_kj_per_mol(&self, calculation: usize) -> Option<AtomForces> {
        let forces = self.calculations.get(calculation)?.forces.as_ref()?;
        let scale = |components: &[[f64; 3]]| {
            components
                .iter()
                .map(|v| v.map(|c| c * self.factor))
                .collect::<Vec<_>>()
        };
        Some(AtomForces {
            qf: scale(&forces.qf),
            ib: scale(&forces.ib),
            db: scale(&forces.db),
        })
    }
}

impl fmt::Display for CalculationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, calc) in self.calculations.iter().enumerate() {
            writeln!(f, "\nPer-atom potentials from calculation {i}")?;
            for (j, potential) in calc.potentials.iter().enumerate() {
                writeln!(f, "\t{j}\t{potential:.4} kT/e")?;
            }
        }

        for i in 0..self.calculations.len() {
            writeln!(f, "\nPer-atom energies from calculation {i}")?;
            for (j, energy) in self
                .energies_kj_per_mol(i)
                .unwrap_or_default()
                .iter()
                .enumerate()
            {
                writeln!(f, "\t{j}\t{energy:.4} kJ/mol")?;
            }
        }

        for i in 0..self.calculations.len() {
            let Some(forces) = self.forces_kj_per_mol(i) else {
                continue;
            };
            writeln!(f, "\nPer-atom forces from calculation {i}")?;
            for j in 0..forces.qf.len() {
                let components = [("qf", &forces.qf), ("ib", &forces.ib), ("db", &forces.db)];
                for (label, components) in components {
                    if let Some(v) = components.get(j) {
                        writeln!(f, "\t{j}\t{} ({label})", format_vector(v))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn format_vector(v: &[f64; 3]) -> String {
    v.iter()
        .map(|&c| format_scientific(c, 3))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats like C's `%.{precision}E`: an explicit exponent sign and at least two exponent
/// digits, e.g. `1.234E+05`.
pub fn format_scientific(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return format!("{value}").to_uppercase();
    }
    let formatted = format!("{value:.precision$E}");
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}E{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}
