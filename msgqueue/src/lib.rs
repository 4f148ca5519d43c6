//! cola bloqueante generica para pasar mensajes entre hilos
//! send nunca bloquea, receive espera hasta que haya un elemento

pub mod discipline;
pub mod queue;

pub use discipline::Discipline;
pub use queue::BlockingQueue;
