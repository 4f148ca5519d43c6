use crate::error::SignalError;
use std::time::Duration;

/// Tiempos del semaforo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalConfig {
    /// duracion minima de una fase
    pub min_cycle: Duration,
    /// duracion maxima de una fase (inclusive)
    pub max_cycle: Duration,
    /// pausa entre dos revisiones del reloj en el hilo del semaforo
    pub poll_every: Duration,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_cycle: Duration::from_secs(4),
            max_cycle: Duration::from_secs(6),
            poll_every: Duration::from_millis(1),
        }
    }
}

impl SignalConfig {
    /// Verifica que el rango de fases y el intervalo de sondeo tengan sentido
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.min_cycle > self.max_cycle {
            return Err(SignalError::InvalidConfig(format!(
                "min_cycle {:?} es mayor que max_cycle {:?}",
                self.min_cycle, self.max_cycle
            )));
        }
        if self.max_cycle.is_zero() {
            return Err(SignalError::InvalidConfig("max_cycle no puede ser cero".into()));
        }
        if self.poll_every.is_zero() {
            return Err(SignalError::InvalidConfig("poll_every no puede ser cero".into()));
        }
        Ok(())
    }
}
