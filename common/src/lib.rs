//! Common definitions shared by the spacetime simulation crates
//!
//! Physical constants are kept here in SI units so every crate in the
//! workspace agrees on the same values.

/// Physical constants used in simulations
pub mod constants {
    use std::f64::consts::PI;

    /// Newtonian gravitational constant in m³ kg⁻¹ s⁻²
    pub const G: f64 = 6.674_30e-11;

    /// Speed of light in m/s
    pub const C: f64 = 299_792_458.0;

    /// Coupling between entanglement density and the effective G
    pub const KAPPA: f64 = 1.0e-38;

    /// Schwarzschild radius coefficient: 2G/c²
    pub const SCHWARZSCHILD_COEFF: f64 = 2.0 * G / (C * C);

    /// Factor applied to the Schwarzschild radius when clamping radial distances
    pub const HORIZON_CLAMP: f64 = 1.01;

    /// 8π, the prefactor in the effective gravity formula
    pub const EIGHT_PI: f64 = 8.0 * PI;
}

#[cfg(test)]
mod tests {
    use super::constants::*;

    #[test]
    fn schwarzschild_coefficient_matches_solar_radius() {
        // The Sun's Schwarzschild radius is close to 2.95 km.
        let rs = SCHWARZSCHILD_COEFF * 1.989e30;
        assert!((rs - 2954.0).abs() < 5.0);
    }
}
