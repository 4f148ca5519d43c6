//! hilo que alterna la fase del semaforo
//!
//! El hilo revisa el reloj cada `poll_every`; cuando la fase actual ya duro
//! mas que su intervalo, cambia la fase, la publica en la cola y sortea el
//! siguiente intervalo.

use crate::interval::IntervalSource;
use crate::signal::Shared;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Marca de inicio de la fase actual y cuanto debe durar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimer {
    started: Instant,
    interval: Duration,
}

impl PhaseTimer {
    pub fn new(started: Instant, interval: Duration) -> Self {
        Self { started, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Verdadero solo cuando lo transcurrido supera estrictamente el intervalo
    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) > self.interval
    }

    pub fn restart(&mut self, now: Instant, interval: Duration) {
        self.started = now;
        self.interval = interval;
    }
}

/// Cuerpo del hilo del semaforo. Corre hasta que `stop` se levanta y
/// devuelve la fuente de intervalos para poder arrancar de nuevo.
pub(crate) fn run(
    shared: Arc<Shared>,
    stop: Arc<AtomicBool>,
    mut source: Box<dyn IntervalSource>,
    poll_every: Duration,
) -> Box<dyn IntervalSource> {
    let mut timer = PhaseTimer::new(Instant::now(), source.next_interval());
    debug!("primera fase dura {:?}", timer.interval());

    while !stop.load(Ordering::Acquire) {
        let now = Instant::now();
        if timer.expired(now) {
            let phase = shared.toggle();
            // el lock de la fase ya se solto, publicar no lo retiene
            shared.queue.send(phase);

            timer.restart(Instant::now(), source.next_interval());
            debug!("semaforo en {}, siguiente cambio en {:?}", phase, timer.interval());
        }

        thread::sleep(poll_every);
    }

    source
}
