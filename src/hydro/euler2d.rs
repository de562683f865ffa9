use super::error::Error;
use super::geometry::Direction;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::ops::{Add, Div, Mul, Sub};

/// Number of conserved (and primitive) fields per zone.
pub const NUM_FIELDS: usize = 4;

// ============================================================================
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conserved(pub f64, pub f64, pub f64, pub f64);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive(pub f64, pub f64, pub f64, pub f64);

// ============================================================================
impl Conserved {
    pub fn from_slice(cons: &[f64]) -> Self {
        Self(cons[0], cons[1], cons[2], cons[3])
    }

    pub fn write_to_slice(&self, cons: &mut [f64]) {
        cons[0] = self.0;
        cons[1] = self.1;
        cons[2] = self.2;
        cons[3] = self.3;
    }

    pub fn as_array(&self) -> [f64; NUM_FIELDS] {
        [self.0, self.1, self.2, self.3]
    }

    pub fn mass_density(&self) -> f64 {
        self.0
    }

    pub fn momentum_1(&self) -> f64 {
        self.1
    }

    pub fn momentum_2(&self) -> f64 {
        self.2
    }

    pub fn energy_density(&self) -> f64 {
        self.3
    }

    pub fn momentum(&self, direction: Direction) -> f64 {
        match direction {
            Direction::X => self.momentum_1(),
            Direction::Y => self.momentum_2(),
        }
    }

    pub fn momentum_squared(&self) -> f64 {
        self.1 * self.1 + self.2 * self.2
    }

    /// Recover the primitive state without validating it. A zero or negative
    /// density yields non-finite velocities; a negative pressure is passed
    /// through as is.
    pub fn recover_primitive(&self, gamma_law_index: f64) -> Primitive {
        let d = self.mass_density();
        let v1 = self.momentum_1() / d;
        let v2 = self.momentum_2() / d;
        let pg = (gamma_law_index - 1.0) * (self.energy_density() - 0.5 * d * (v1 * v1 + v2 * v2));
        Primitive(d, v1, v2, pg)
    }

    /// Recover the primitive state, failing if the density or the pressure is
    /// not strictly positive (NaN counts as not positive).
    pub fn to_primitive(&self, gamma_law_index: f64) -> Result<Primitive, Error> {
        let prim = self.recover_primitive(gamma_law_index);

        if !(prim.mass_density() > 0.0) {
            Err(Error::NegativeMassDensity(prim.mass_density()))
        } else if !(prim.gas_pressure() > 0.0) {
            Err(Error::NegativeGasPressure(prim.gas_pressure()))
        } else {
            Ok(prim)
        }
    }

    /// The analytic Euler flux of this state through a face with the given
    /// normal direction.
    pub fn flux_vector(&self, direction: Direction, gamma_law_index: f64) -> Conserved {
        let pg = self.recover_primitive(gamma_law_index).gas_pressure();
        let vn = self.momentum(direction) / self.mass_density();

        Conserved(
            self.0 * vn,
            self.1 * vn + pg * direction.along(Direction::X),
            self.2 * vn + pg * direction.along(Direction::Y),
            (self.3 + pg) * vn,
        )
    }
}

impl TryFrom<&[f64]> for Conserved {
    type Error = Error;

    fn try_from(cons: &[f64]) -> Result<Self, Self::Error> {
        if cons.len() == NUM_FIELDS {
            Ok(Self::from_slice(cons))
        } else {
            Err(Error::InvalidInputShape(cons.len()))
        }
    }
}

// ============================================================================
impl Primitive {
    pub fn from_slice(prim: &[f64]) -> Self {
        Self(prim[0], prim[1], prim[2], prim[3])
    }

    pub fn mass_density(&self) -> f64 {
        self.0
    }

    pub fn velocity_1(&self) -> f64 {
        self.1
    }

    pub fn velocity_2(&self) -> f64 {
        self.2
    }

    pub fn gas_pressure(&self) -> f64 {
        self.3
    }

    pub fn velocity(&self, direction: Direction) -> f64 {
        match direction {
            Direction::X => self.velocity_1(),
            Direction::Y => self.velocity_2(),
        }
    }

    pub fn velocity_squared(&self) -> f64 {
        self.1 * self.1 + self.2 * self.2
    }

    pub fn sound_speed_squared(&self, gamma_law_index: f64) -> f64 {
        gamma_law_index * self.gas_pressure() / self.mass_density()
    }

    /// Adiabatic sound speed, with the radicand floored at zero.
    pub fn sound_speed(&self, gamma_law_index: f64) -> f64 {
        self.sound_speed_squared(gamma_law_index).max(0.0).sqrt()
    }

    /// The fastest signal speed along either grid axis, `max(|u| + a, |v| +
    /// a)`.
    pub fn max_signal_speed(&self, gamma_law_index: f64) -> f64 {
        let cs = self.sound_speed(gamma_law_index);
        (self.velocity_1().abs() + cs).max(self.velocity_2().abs() + cs)
    }

    pub fn to_conserved(&self, gamma_law_index: f64) -> Conserved {
        let d = self.mass_density();
        let p = self.gas_pressure();
        let vsq = self.velocity_squared();

        Conserved(
            d,
            d * self.velocity_1(),
            d * self.velocity_2(),
            p / (gamma_law_index - 1.0) + 0.5 * d * vsq,
        )
    }

    /// Return this state with the roles of the two velocity components
    /// exchanged.
    pub fn transpose(&self) -> Primitive {
        Primitive(self.0, self.2, self.1, self.3)
    }
}

// ============================================================================
impl Add<Conserved> for Conserved {
    type Output = Conserved;
    fn add(self, u: Self) -> Conserved {
        Conserved(self.0 + u.0, self.1 + u.1, self.2 + u.2, self.3 + u.3)
    }
}

impl Sub<Conserved> for Conserved {
    type Output = Self;
    fn sub(self, u: Self) -> Self {
        Self(self.0 - u.0, self.1 - u.1, self.2 - u.2, self.3 - u.3)
    }
}

impl Mul<f64> for Conserved {
    type Output = Self;
    fn mul(self, a: f64) -> Self {
        Self(self.0 * a, self.1 * a, self.2 * a, self.3 * a)
    }
}

impl Div<f64> for Conserved {
    type Output = Self;
    fn div(self, a: f64) -> Self {
        Self(self.0 / a, self.1 / a, self.2 / a, self.3 / a)
    }
}

// ============================================================================
/// Two-wave acoustic estimate of the pressure and normal velocity in the star
/// region between two primitive states. Returns `None` when the combined
/// acoustic impedance `ρ_L a_L + ρ_R a_R` vanishes.
pub fn star_region_estimate(
    pl: &Primitive,
    pr: &Primitive,
    direction: Direction,
    gamma_law_index: f64,
) -> Option<(f64, f64)> {
    let zl = pl.mass_density() * pl.sound_speed(gamma_law_index);
    let zr = pr.mass_density() * pr.sound_speed(gamma_law_index);
    let impedance = zl + zr;

    if impedance == 0.0 {
        return None;
    }
    let (pgl, pgr) = (pl.gas_pressure(), pr.gas_pressure());
    let (vnl, vnr) = (pl.velocity(direction), pr.velocity(direction));

    let pstar = (zl * pgr + zr * pgl + zl * zr * (vnl - vnr)) / impedance;
    let vstar = (vnl * zl + vnr * zr + pgl - pgr) / impedance;
    Some((pstar, vstar))
}

/// Local Lax-Friedrichs (Rusanov) flux with the given maximum wave speed.
pub fn riemann_lax_friedrichs(
    ul: Conserved,
    ur: Conserved,
    max_wavespeed: f64,
    direction: Direction,
    gamma_law_index: f64,
) -> Conserved {
    let fl = ul.flux_vector(direction, gamma_law_index);
    let fr = ur.flux_vector(direction, gamma_law_index);
    (fl + fr) * 0.5 - (ur - ul) * (0.5 * max_wavespeed)
}

/// HLLC approximate Riemann solver. Returns the numerical flux through the
/// interface separating `ul` (on the low side) from `ur` (on the high side),
/// whose normal is `direction`.
///
/// The outer wave speeds are Davis-type estimates bounded by the acoustic
/// star velocity, and the contact speed is that velocity. No positivity,
/// entropy or carbuncle fix is applied. If the combined acoustic impedance is
/// zero the local Lax-Friedrichs flux is returned instead.
pub fn riemann_hllc(ul: Conserved, ur: Conserved, direction: Direction, gamma_law_index: f64) -> Conserved {
    let pl = ul.recover_primitive(gamma_law_index);
    let pr = ur.recover_primitive(gamma_law_index);
    let al = pl.sound_speed(gamma_law_index);
    let ar = pr.sound_speed(gamma_law_index);

    let vstar = match star_region_estimate(&pl, &pr, direction, gamma_law_index) {
        Some((_, vstar)) => vstar,
        None => return riemann_lax_friedrichs(ul, ur, al.max(ar), direction, gamma_law_index),
    };

    let vnl = pl.velocity(direction);
    let vnr = pr.velocity(direction);
    let sl = (vnl - al).min(vstar);
    let sr = (vnr + ar).max(vstar);

    if sl >= 0.0 {
        return ul.flux_vector(direction, gamma_law_index);
    }
    if sr <= 0.0 {
        return ur.flux_vector(direction, gamma_law_index);
    }

    let pstar = pl.gas_pressure() + pl.mass_density() * (sl - vnl) * (vstar - vnl);

    if vstar >= 0.0 {
        let usl = star_state(&pl, sl, vstar, pstar, direction, gamma_law_index);
        ul.flux_vector(direction, gamma_law_index) + (usl - ul) * sl
    } else {
        let usr = star_state(&pr, sr, vstar, pstar, direction, gamma_law_index);
        ur.flux_vector(direction, gamma_law_index) + (usr - ur) * sr
    }
}

/// Same as [`riemann_hllc`], for states given as raw slices. Fails if either
/// slice does not have exactly [`NUM_FIELDS`] components.
pub fn riemann_hllc_slice(
    ul: &[f64],
    ur: &[f64],
    direction: Direction,
    gamma_law_index: f64,
) -> Result<Conserved, Error> {
    let ul = Conserved::try_from(ul)?;
    let ur = Conserved::try_from(ur)?;
    Ok(riemann_hllc(ul, ur, direction, gamma_law_index))
}

fn star_state(
    prim: &Primitive,
    s: f64,
    sstar: f64,
    pstar: f64,
    direction: Direction,
    gamma_law_index: f64,
) -> Conserved {
    let vn = prim.velocity(direction);
    let vt = prim.velocity(direction.transverse());
    let d = prim.mass_density() * (s - vn) / (s - sstar);
    let e = pstar / (gamma_law_index - 1.0) + 0.5 * d * (sstar * sstar + vt * vt);

    match direction {
        Direction::X => Conserved(d, d * sstar, d * vt, e),
        Direction::Y => Conserved(d, d * vt, d * sstar, e),
    }
}
