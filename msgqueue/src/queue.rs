//! cola bloqueante protegida por un mutex y una condvar (patron monitor)

use crate::discipline::Discipline;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Cola sin limite de capacidad con `receive` bloqueante y `send` no bloqueante.
///
/// Toda mutacion de la secuencia ocurre con el lock tomado. Cada `send`
/// despierta a lo sumo a un consumidor (`notify_one`), asi que con varios
/// consumidores cada elemento lo recibe exactamente uno de ellos.
///
/// El elemento se mueve al consumidor: la cola no guarda ninguna referencia
/// despues de entregarlo, por eso sirve para tipos que no son `Copy`.
pub struct BlockingQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
    discipline: Discipline,
}

impl<T> BlockingQueue<T> {
    /// Cola vacia con la politica por defecto (`Lifo`).
    pub fn new() -> Self {
        Self::with_discipline(Discipline::default())
    }

    pub fn with_discipline(discipline: Discipline) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            discipline,
        }
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    /// Agrega `value` al final y despierta a un consumidor si hay alguno esperando.
    /// Nunca bloquea mas alla de la seccion critica.
    pub fn send(&self, value: T) {
        {
            let mut items = self.lock();
            items.push_back(value);
        }
        // el lock ya se libero, el consumidor despertado no choca con nosotros
        self.available.notify_one();
    }

    /// Bloquea hasta que haya un elemento y lo devuelve.
    ///
    /// La condicion se vuelve a revisar despues de cada despertar, asi que un
    /// despertar espurio nunca devuelve nada con la cola vacia. La condvar
    /// suelta el lock mientras el hilo duerme.
    pub fn receive(&self) -> T {
        let mut items = self.lock();
        loop {
            if let Some(value) = self.discipline.take(&mut items) {
                return value;
            }
            items = self
                .available
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Version no bloqueante de `receive`.
    pub fn try_receive(&self) -> Option<T> {
        let mut items = self.lock();
        self.discipline.take(&mut items)
    }

    /// Igual que `receive` pero se rinde cuando pasa `timeout`.
    /// Devuelve `None` si la cola siguio vacia hasta el deadline.
    /// Un `timeout` que no cabe en un `Instant` (p. ej. `Duration::MAX`) espera sin limite.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.receive());
        };
        let mut items = self.lock();
        loop {
            if let Some(value) = self.discipline.take(&mut items) {
                return Some(value);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .available
                .wait_timeout(items, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            items = guard;
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // ninguna operacion deja la secuencia a medias, un lock envenenado se puede recuperar
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("len", &self.len())
            .field("discipline", &self.discipline)
            .finish()
    }
}
