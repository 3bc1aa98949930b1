// cs-core/src/units.rs

use uom::si::f64::{
    ElectricCharge as UomElectricCharge, ElectricCurrent as UomElectricCurrent,
    ElectricPotential as UomElectricPotential, Power as UomPower, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Charge = UomElectricCharge;
pub type Current = UomElectricCurrent;
pub type Potential = UomElectricPotential;
pub type Power = UomPower;
pub type Velocity = UomVelocity;

#[inline]
pub fn kph(v: f64) -> Velocity {
    use uom::si::velocity::kilometer_per_hour;
    Velocity::new::<kilometer_per_hour>(v)
}

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn volts(v: f64) -> Potential {
    use uom::si::electric_potential::volt;
    Potential::new::<volt>(v)
}

#[inline]
pub fn amp_hours(v: f64) -> Charge {
    use uom::si::electric_charge::ampere_hour;
    Charge::new::<ampere_hour>(v)
}

/// Drive-cycle speed (km/h) as m/s.
#[inline]
pub fn kph_to_mps(speed_kph: f64) -> f64 {
    use uom::si::velocity::meter_per_second;
    kph(speed_kph).get::<meter_per_second>()
}

/// Rated capacity (Ah) as coulombs.
#[inline]
pub fn amp_hours_to_coulombs(capacity_ah: f64) -> f64 {
    use uom::si::electric_charge::coulomb;
    amp_hours(capacity_ah).get::<coulomb>()
}

/// Electrical power in kW for a terminal voltage and current.
#[inline]
pub fn power_kw(voltage_v: f64, current_a: f64) -> f64 {
    use uom::si::power::kilowatt;
    let power: Power = volts(voltage_v) * amps(current_a);
    power.get::<kilowatt>()
}

pub mod constants {
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_conversion() {
        assert!((kph_to_mps(100.0) - 27.777_777_777_777_78).abs() < 1e-9);
        assert_eq!(kph_to_mps(0.0), 0.0);
    }

    #[test]
    fn capacity_conversion() {
        assert!((amp_hours_to_coulombs(5.0) - 18_000.0).abs() < 1e-9);
    }

    #[test]
    fn power_in_kilowatts() {
        assert!((power_kw(4.0, 250.0) - 1.0).abs() < 1e-12);
    }
}
