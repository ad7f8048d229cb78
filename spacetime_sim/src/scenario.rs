//! Preset object configurations

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use crate::error::{require_positive, Result};
use crate::object::MassiveObject;
use crate::point::SpacetimePoint;

pub const EARTH_MASS: f64 = 5.972e24;
pub const MOON_MASS: f64 = 7.342e22;
pub const EARTH_MOON_DISTANCE: f64 = 3.844e8;

/// Earth at the origin and the Moon on a circular orbit in the x-z plane
pub fn earth_moon(g: f64) -> Result<Vec<MassiveObject>> {
    let earth = MassiveObject::new("Earth", EARTH_MASS, SpacetimePoint::ORIGIN)?;

    let orbital_speed = (g * EARTH_MASS / EARTH_MOON_DISTANCE).sqrt();
    let moon = MassiveObject::new(
        "Moon",
        MOON_MASS,
        SpacetimePoint::new(EARTH_MOON_DISTANCE, 0.0, 0.0, 0.0),
    )?
    .with_velocity(DVec3::new(0.0, 0.0, orbital_speed));

    Ok(vec![earth, moon])
}

/// Two equal masses on the x axis, `separation` apart, orbiting their
/// common centre
pub fn binary_pair(mass: f64, separation: f64, g: f64) -> Result<Vec<MassiveObject>> {
    require_positive("separation", separation)?;
    let half = separation / 2.0;
    // v² / (d/2) = G m / d²
    let speed = (g * mass / (2.0 * separation)).sqrt();

    let a = MassiveObject::new("A", mass, SpacetimePoint::new(-half, 0.0, 0.0, 0.0))?
        .with_velocity(DVec3::new(0.0, 0.0, -speed));
    let b = MassiveObject::new("B", mass, SpacetimePoint::new(half, 0.0, 0.0, 0.0))?
        .with_velocity(DVec3::new(0.0, 0.0, speed));

    Ok(vec![a, b])
}

/// `count` objects at rest scattered through a disc of radius `extent`,
/// masses drawn uniformly from `min_mass..max_mass`
pub fn random_cluster<R: Rng>(
    rng: &mut R,
    count: usize,
    extent: f64,
    min_mass: f64,
    max_mass: f64,
) -> Result<Vec<MassiveObject>> {
    require_positive("extent", extent)?;
    require_positive("minimum mass", min_mass)?;
    require_positive("maximum mass", max_mass)?;

    let mut objects = Vec::with_capacity(count);
    for n in 0..count {
        let distance = rng.gen::<f64>() * extent;
        let angle = rng.gen::<f64>() * TAU;
        let height = (rng.gen::<f64>() - 0.5) * extent * 0.1;
        let mass = if max_mass > min_mass {
            rng.gen_range(min_mass..max_mass)
        } else {
            min_mass
        };

        let position = SpacetimePoint::new(angle.cos() * distance, height, angle.sin() * distance, 0.0);
        objects.push(MassiveObject::new(&format!("body-{n}"), mass, position)?);
    }

    Ok(objects)
}
