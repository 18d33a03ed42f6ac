/// Boltzmann constant in J/K.
pub const BOLTZMANN: f64 = 1.3806581e-23;
/// Avogadro's number in 1/mol.
pub const AVOGADRO: f64 = 6.0221367e23;
/// Reference temperature in K used when reporting energies.
pub const DEFAULT_TEMPERATURE: f64 = 298.15;

/// Factor converting energies in units of kT to kJ/mol at the given temperature.
pub fn kt_to_kj_per_mol(temperature: f64) -> f64 {
    BOLTZMANN / 1000.0 * temperature * AVOGADRO
}

/// Conversion factor at [`DEFAULT_TEMPERATURE`].
pub fn unit_conversion() -> f64 {
    kt_to_kj_per_mol(DEFAULT_TEMPERATURE)
}
