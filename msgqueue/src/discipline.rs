//! orden en que la cola entrega sus elementos

use std::collections::VecDeque;

/// Politica de extraccion de la cola.
///
/// `Lifo` saca siempre del final de la secuencia (el ultimo que entro),
/// `Fifo` saca del frente. Ambas insertan al final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Discipline {
    #[default]
    Lifo,
    Fifo,
}

impl Discipline {
    // saca un elemento segun la politica, None si la secuencia esta vacia
    pub fn take<T>(self, items: &mut VecDeque<T>) -> Option<T> {
        match self {
            Discipline::Lifo => items.pop_back(),
            Discipline::Fifo => items.pop_front(),
        }
    }
}
