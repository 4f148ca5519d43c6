//! errores del ciclo de vida del semaforo
//! esperar el verde y leer la fase nunca fallan, solo start/stop y la construccion

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("el semaforo ya esta ciclando")]
    AlreadyRunning,
    #[error("configuracion invalida: {0}")]
    InvalidConfig(String),
    #[error("no se pudo lanzar el hilo del semaforo")]
    Spawn(#[from] std::io::Error),
    #[error("el hilo del semaforo entro en panic")]
    CyclerPanicked,
    #[error("la fuente de intervalos se perdio en un fallo anterior")]
    SourceLost,
}
