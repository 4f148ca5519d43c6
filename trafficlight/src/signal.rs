//! semaforo con hilo propio y espera bloqueante del verde
//!
//! La fase vive en su propio mutex, separado del lock de la cola de avisos:
//! leer la fase nunca espera a un consumidor de la cola ni al reves.
//!
//! Cada cambio de fase se publica una sola vez en la cola y lo consume un solo
//! observador (entrega uno a uno, no broadcast). Con varios observadores
//! esperando, cada verde libera a uno; los demas salen en verdes posteriores.
//!
//! Los avisos que nadie consume se quedan en la cola. Un observador que llega
//! tarde puede recibir un verde viejo y salir con el semaforo en rojo; para
//! esperar un verde nuevo esta `wait_for_next_green`.

use crate::config::SignalConfig;
use crate::cycler;
use crate::error::SignalError;
use crate::interval::{IntervalSource, RandomInterval};
use crate::phase::Phase;
use log::{error, info, trace, warn};
use msgqueue::BlockingQueue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Estado compartido entre el semaforo y su hilo
pub(crate) struct Shared {
    phase: Mutex<Phase>,
    pub(crate) queue: BlockingQueue<Phase>,
}

impl Shared {
    fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::Red),
            queue: BlockingQueue::new(),
        }
    }

    // cambia la fase con el lock tomado y devuelve la nueva
    pub(crate) fn toggle(&self) -> Phase {
        let mut phase = self.lock_phase();
        *phase = phase.toggled();
        *phase
    }

    fn current(&self) -> Phase {
        *self.lock_phase()
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ciclo de vida del hilo
enum Cycling {
    Idle(Box<dyn IntervalSource>),
    Running {
        stop: Arc<AtomicBool>,
        handle: JoinHandle<Box<dyn IntervalSource>>,
    },
    // la fuente se perdio (panic del hilo o fallo al lanzarlo)
    Failed,
}

/// Semaforo de dos fases que arranca en rojo.
///
/// `start` lanza el hilo que alterna las fases, `stop` lo detiene y lo junta.
/// Soltar el semaforo tambien lo detiene. Para compartirlo entre hilos
/// observadores se envuelve en un `Arc`.
pub struct TrafficLight {
    shared: Arc<Shared>,
    config: SignalConfig,
    cycling: Mutex<Cycling>,
}

impl TrafficLight {
    /// Semaforo en rojo con fases aleatorias de 4 a 6 segundos
    pub fn new() -> Self {
        Self::build(SignalConfig::default(), Box::new(RandomInterval::default()))
    }

    /// Fases aleatorias en el rango de `config`
    pub fn with_config(config: SignalConfig) -> Result<Self, SignalError> {
        config.validate()?;
        let source = RandomInterval::new(config.min_cycle, config.max_cycle)?;
        Ok(Self::build(config, Box::new(source)))
    }

    /// Fases con duraciones de una fuente inyectada. El rango de `config` no
    /// se usa para sortear, solo `poll_every`.
    pub fn with_source(
        config: SignalConfig,
        source: impl IntervalSource + 'static,
    ) -> Result<Self, SignalError> {
        config.validate()?;
        Ok(Self::build(config, Box::new(source)))
    }

    fn build(config: SignalConfig, source: Box<dyn IntervalSource>) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            config,
            cycling: Mutex::new(Cycling::Idle(source)),
        }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Lanza el hilo que alterna las fases y retorna de inmediato.
    ///
    /// Llamarlo con el hilo ya corriendo falla con `AlreadyRunning`; despues
    /// de `stop` se puede volver a llamar.
    pub fn start(&self) -> Result<(), SignalError> {
        let mut cycling = self.lock_cycling();
        let source = match std::mem::replace(&mut *cycling, Cycling::Failed) {
            Cycling::Idle(source) => source,
            running @ Cycling::Running { .. } => {
                *cycling = running;
                return Err(SignalError::AlreadyRunning);
            }
            Cycling::Failed => return Err(SignalError::SourceLost),
        };

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let shared = Arc::clone(&self.shared);
        let poll_every = self.config.poll_every;

        // si el spawn falla el closure se suelta con la fuente adentro y queda Failed
        let handle = thread::Builder::new()
            .name("semaforo".into())
            .spawn(move || cycler::run(shared, thread_stop, source, poll_every))?;

        *cycling = Cycling::Running { stop, handle };
        info!("semaforo iniciado en {}", self.current_phase());
        Ok(())
    }

    /// Detiene el hilo y espera a que termine. Sin efecto si no esta corriendo.
    ///
    /// Los observadores bloqueados en `wait_for_green` no se despiertan: sin
    /// hilo no hay mas avisos.
    pub fn stop(&self) -> Result<(), SignalError> {
        let mut cycling = self.lock_cycling();
        match std::mem::replace(&mut *cycling, Cycling::Failed) {
            Cycling::Running { stop, handle } => {
                stop.store(true, Ordering::Release);
                match handle.join() {
                    Ok(source) => {
                        *cycling = Cycling::Idle(source);
                        info!("semaforo detenido en {}", self.current_phase());
                        Ok(())
                    }
                    Err(_) => {
                        error!("el hilo del semaforo termino en panic");
                        Err(SignalError::CyclerPanicked)
                    }
                }
            }
            other => {
                *cycling = other;
                Ok(())
            }
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.lock_cycling(), Cycling::Running { .. })
    }

    /// Fase actual, solo toma el lock de la fase
    pub fn current_phase(&self) -> Phase {
        self.shared.current()
    }

    /// Bloquea hasta el siguiente cambio de fase publicado y lo devuelve
    pub fn next_phase_change(&self) -> Phase {
        self.shared.queue.receive()
    }

    /// Bloquea hasta recibir un aviso de verde. Los avisos de rojo se descartan.
    ///
    /// Consume avisos ya encolados antes de esperar. Si el semaforo cambio
    /// varias veces sin observadores, la cola (LIFO) entrega primero el rojo
    /// mas reciente y despues un verde viejo: la llamada retorna de inmediato
    /// aunque la fase actual sea rojo. Usar `wait_for_next_green` cuando el
    /// observador llega tarde.
    pub fn wait_for_green(&self) {
        loop {
            let phase = self.next_phase_change();
            if phase.is_green() {
                return;
            }
            trace!("aviso de {} descartado", phase);
        }
    }

    /// Descarta los avisos pendientes y bloquea hasta el proximo verde que se
    /// publique despues de la llamada. Al retornar la fase acaba de pasar a verde.
    pub fn wait_for_next_green(&self) {
        let stale = self.discard_pending();
        if stale > 0 {
            trace!("{} avisos viejos descartados", stale);
        }
        self.wait_for_green();
    }

    /// Como `wait_for_green` pero se rinde despues de `timeout`.
    /// Devuelve `true` si llego un verde a tiempo. Un `timeout` que no cabe en
    /// un `Instant` (p. ej. `Duration::MAX`) espera sin limite.
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait_for_green();
            return true;
        };
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.shared.queue.receive_timeout(remaining) {
                Some(phase) if phase.is_green() => return true,
                Some(phase) => trace!("aviso de {} descartado", phase),
                None => return false,
            }
        }
    }

    // vacia la cola sin bloquear, devuelve cuantos avisos habia
    fn discard_pending(&self) -> usize {
        let mut count = 0;
        while self.shared.queue.try_receive().is_some() {
            count += 1;
        }
        count
    }

    fn lock_cycling(&self) -> MutexGuard<'_, Cycling> {
        self.cycling.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("al soltar el semaforo: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::FixedIntervals;

    fn fast_config() -> SignalConfig {
        SignalConfig {
            min_cycle: Duration::from_millis(10),
            max_cycle: Duration::from_millis(20),
            poll_every: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_starts_red_and_idle() {
        let light = TrafficLight::new();
        assert_eq!(light.current_phase(), Phase::Red);
        assert!(!light.is_running());
        assert_eq!(light.config(), &SignalConfig::default());
    }

    #[test]
    fn test_shared_toggle_publishes_nothing_by_itself() {
        let shared = Shared::new();
        assert_eq!(shared.toggle(), Phase::Green);
        assert_eq!(shared.current(), Phase::Green);
        assert!(shared.queue.is_empty());
    }

    #[test]
    fn test_double_start_is_rejected() {
        let light = TrafficLight::with_config(fast_config()).unwrap();
        light.start().unwrap();
        assert!(matches!(light.start(), Err(SignalError::AlreadyRunning)));
        assert!(light.is_running());
        light.stop().unwrap();
        assert!(!light.is_running());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let light = TrafficLight::new();
        assert!(light.stop().is_ok());
        assert!(light.stop().is_ok());
    }

    #[test]
    fn test_restart_after_stop() {
        let source = FixedIntervals::constant(Duration::from_millis(5));
        let light = TrafficLight::with_source(fast_config(), source).unwrap();

        light.start().unwrap();
        light.wait_for_green();
        light.stop().unwrap();

        light.start().unwrap();
        assert!(light.wait_for_green_timeout(Duration::from_secs(2)));
        light.stop().unwrap();
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SignalConfig {
            poll_every: Duration::ZERO,
            ..fast_config()
        };
        assert!(matches!(
            TrafficLight::with_config(config),
            Err(SignalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_wait_for_green_timeout_without_start() {
        let light = TrafficLight::new();
        assert!(!light.wait_for_green_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_wait_for_green_timeout_with_max_duration() {
        let light = TrafficLight::with_source(
            fast_config(),
            FixedIntervals::constant(Duration::from_millis(5)),
        )
        .unwrap();
        light.start().unwrap();
        assert!(light.wait_for_green_timeout(Duration::MAX));
        light.stop().unwrap();
    }

    #[test]
    fn test_discard_pending_empties_queue() {
        let light = TrafficLight::new();
        light.shared.queue.send(Phase::Green);
        light.shared.queue.send(Phase::Red);
        assert_eq!(light.discard_pending(), 2);
        assert!(light.shared.queue.is_empty());
        assert!(!light.wait_for_green_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_panicking_source_is_reported() {
        let mut calls = 0;
        let source = move || {
            calls += 1;
            if calls > 1 {
                panic!("fuente rota");
            }
            Duration::from_millis(2)
        };
        let light = TrafficLight::with_source(fast_config(), source).unwrap();
        light.start().unwrap();

        // el primer cambio pide el segundo intervalo y el hilo muere
        thread::sleep(Duration::from_millis(100));
        assert!(matches!(light.stop(), Err(SignalError::CyclerPanicked)));
        assert!(matches!(light.start(), Err(SignalError::SourceLost)));
    }
}
