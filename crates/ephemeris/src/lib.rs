//! Body catalog and ephemeris providers.
//!
//! Trajectory models only ever see bodies through [`SystemOfBodies`]: a name
//! lookup returning the gravitational parameter, physical radius and a shared
//! [`Ephemeris`] handle. High-fidelity ephemerides plug in by implementing the
//! trait; the crate ships an analytic two-body provider and a fixed-state one.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use mga_core::state::StateVector;
use mga_orbits::{KeplerianElements, OrbitError, keplerian_to_cartesian};
use thiserror::Error;

/// Errors surfaced while resolving bodies or evaluating their ephemerides.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("unknown body `{0}`")]
    UnknownBody(String),
    #[error("body `{0}` has no ephemeris")]
    MissingEphemeris(String),
    #[error("ephemeris evaluation at {epoch_s} s failed: {source}")]
    Propagation {
        epoch_s: f64,
        #[source]
        source: OrbitError,
    },
    #[error("invalid ephemeris definition: {0}")]
    Definition(#[from] OrbitError),
}

/// State provider for a single body, relative to the trajectory's central body.
pub trait Ephemeris: fmt::Debug + Send + Sync {
    fn state_at(&self, epoch_s: f64) -> Result<StateVector, EphemerisError>;
}

/// Body frozen at one state; mostly useful in tests.
#[derive(Debug, Clone)]
pub struct FixedStateEphemeris {
    pub state: StateVector,
}

impl Ephemeris for FixedStateEphemeris {
    fn state_at(&self, _epoch_s: f64) -> Result<StateVector, EphemerisError> {
        Ok(self.state)
    }
}

/// Two-body motion of a reference state about the central body.
#[derive(Debug, Clone)]
pub struct KeplerEphemeris {
    reference_epoch_s: f64,
    reference_state: StateVector,
    central_mu_km3_s2: f64,
}

impl KeplerEphemeris {
    pub fn new(reference_epoch_s: f64, reference_state: StateVector, central_mu_km3_s2: f64) -> Self {
        Self {
            reference_epoch_s,
            reference_state,
            central_mu_km3_s2,
        }
    }

    pub fn from_elements(
        reference_epoch_s: f64,
        elements: &KeplerianElements,
        central_mu_km3_s2: f64,
    ) -> Result<Self, EphemerisError> {
        let state = keplerian_to_cartesian(elements, central_mu_km3_s2)?;
        Ok(Self::new(reference_epoch_s, state, central_mu_km3_s2))
    }

    /// Circular equatorial orbit with the body at `phase` radians at `reference_epoch_s`.
    pub fn circular(
        radius_km: f64,
        phase: f64,
        reference_epoch_s: f64,
        central_mu_km3_s2: f64,
    ) -> Result<Self, EphemerisError> {
        Self::from_elements(
            reference_epoch_s,
            &KeplerianElements::circular(radius_km, phase),
            central_mu_km3_s2,
        )
    }
}

impl Ephemeris for KeplerEphemeris {
    fn state_at(&self, epoch_s: f64) -> Result<StateVector, EphemerisError> {
        mga_orbits::propagate(
            &self.reference_state,
            epoch_s - self.reference_epoch_s,
            self.central_mu_km3_s2,
        )
        .map_err(|source| EphemerisError::Propagation { epoch_s, source })
    }
}

/// Physical data attached to one named body.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub gravitational_parameter_km3_s2: Option<f64>,
    pub radius_km: Option<f64>,
    pub ephemeris: Option<Arc<dyn Ephemeris>>,
}

impl Body {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gravitational_parameter_km3_s2: None,
            radius_km: None,
            ephemeris: None,
        }
    }

    pub fn with_gravitational_parameter(mut self, mu_km3_s2: f64) -> Self {
        self.gravitational_parameter_km3_s2 = Some(mu_km3_s2);
        self
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    pub fn with_ephemeris(mut self, ephemeris: impl Ephemeris + 'static) -> Self {
        self.ephemeris = Some(Arc::new(ephemeris));
        self
    }

    /// Shared handle to the body's ephemeris.
    pub fn ephemeris(&self) -> Result<Arc<dyn Ephemeris>, EphemerisError> {
        self.ephemeris
            .clone()
            .ok_or_else(|| EphemerisError::MissingEphemeris(self.name.clone()))
    }
}

/// Bodies addressable by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct SystemOfBodies {
    bodies: BTreeMap<String, Body>,
}

impl SystemOfBodies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, body: Body) {
        debug!("registering body `{}`", body.name);
        self.bodies.insert(body.name.to_uppercase(), body);
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.add(body);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Body, EphemerisError> {
        self.bodies
            .get(&name.to_uppercase())
            .ok_or_else(|| EphemerisError::UnknownBody(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(&name.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.values().map(|body| body.name.as_str())
    }
}
