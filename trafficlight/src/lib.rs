// modulo raiz de trafficlight
// un semaforo que alterna rojo y verde en un hilo propio y deja que otros hilos esperen el verde

pub mod config;
pub mod cycler;
pub mod error;
pub mod interval;
pub mod logging;
pub mod phase;
pub mod signal;

// reexports comodos
pub use config::SignalConfig;
pub use error::SignalError;
pub use interval::{FixedIntervals, IntervalSource, RandomInterval};
pub use phase::Phase;
pub use signal::TrafficLight;
