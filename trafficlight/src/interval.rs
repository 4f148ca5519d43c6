//! fuentes de duracion para las fases del semaforo
//! el semaforo recibe la fuente desde afuera, asi los tests pueden usar secuencias fijas

use crate::config::SignalConfig;
use crate::error::SignalError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Entrega la duracion de la siguiente fase.
///
/// La fuente se mueve al hilo del semaforo mientras cicla, por eso pide `Send`.
/// Cualquier closure `FnMut() -> Duration + Send` sirve como fuente.
pub trait IntervalSource: Send {
    fn next_interval(&mut self) -> Duration;
}

impl<F> IntervalSource for F
where
    F: FnMut() -> Duration + Send,
{
    fn next_interval(&mut self) -> Duration {
        self()
    }
}

/// Duracion uniforme en el rango cerrado `[min, max]`.
#[derive(Debug, Clone)]
pub struct RandomInterval {
    min: Duration,
    max: Duration,
    rng: StdRng,
}

impl RandomInterval {
    /// Fuente aleatoria sembrada desde el sistema operativo
    pub fn new(min: Duration, max: Duration) -> Result<Self, SignalError> {
        check_range(min, max)?;
        Ok(Self {
            min,
            max,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Fuente reproducible, misma semilla misma secuencia
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Result<Self, SignalError> {
        check_range(min, max)?;
        Ok(Self {
            min,
            max,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn range(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }
}

// rango de 4 a 6 segundos
impl Default for RandomInterval {
    fn default() -> Self {
        let config = SignalConfig::default();
        Self {
            min: config.min_cycle,
            max: config.max_cycle,
            rng: StdRng::from_os_rng(),
        }
    }
}

impl IntervalSource for RandomInterval {
    fn next_interval(&mut self) -> Duration {
        self.rng.random_range(self.min..=self.max)
    }
}

fn check_range(min: Duration, max: Duration) -> Result<(), SignalError> {
    if min > max {
        return Err(SignalError::InvalidConfig(format!(
            "rango {:?}..={:?} vacio",
            min, max
        )));
    }
    Ok(())
}

/// Recorre una lista fija de duraciones y vuelve a empezar al llegar al final.
#[derive(Debug, Clone)]
pub struct FixedIntervals {
    intervals: Vec<Duration>,
    next: usize,
}

impl FixedIntervals {
    pub fn new(intervals: impl IntoIterator<Item = Duration>) -> Result<Self, SignalError> {
        let intervals: Vec<Duration> = intervals.into_iter().collect();
        if intervals.is_empty() {
            return Err(SignalError::InvalidConfig(
                "FixedIntervals necesita al menos una duracion".into(),
            ));
        }
        Ok(Self { intervals, next: 0 })
    }

    /// Siempre la misma duracion
    pub fn constant(interval: Duration) -> Self {
        Self {
            intervals: vec![interval],
            next: 0,
        }
    }
}

impl IntervalSource for FixedIntervals {
    fn next_interval(&mut self) -> Duration {
        let interval = self.intervals[self.next];
        self.next = (self.next + 1) % self.intervals.len();
        interval
    }
}
