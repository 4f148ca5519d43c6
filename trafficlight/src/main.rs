// ============================================================================
// main.rs - un semaforo y dos observadores que esperan el verde
// ============================================================================

use std::sync::Arc;
use std::thread;

use log::{info, warn, LevelFilter};
use trafficlight::{logging, SignalError, TrafficLight};

// cuantos verdes espera cada observador antes de irse
const GREENS_PER_OBSERVER: u32 = 2;

fn main() -> Result<(), SignalError> {
    if let Err(e) = logging::init(LevelFilter::Debug) {
        eprintln!("no se pudo instalar el logger: {}", e);
    }

    let light = Arc::new(TrafficLight::new());
    info!("semaforo creado en {}", light.current_phase());
    light.start()?;

    // con entrega uno a uno cada verde despierta a un solo observador
    let observers: Vec<_> = ["Carro-1", "Carro-2"]
        .into_iter()
        .map(|name| {
            let light = Arc::clone(&light);
            thread::Builder::new().name(name.into()).spawn(move || {
                for n in 1..=GREENS_PER_OBSERVER {
                    light.wait_for_next_green();
                    info!("{} recibe aviso de verde #{}", name, n);
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for observer in observers {
        if observer.join().is_err() {
            warn!("un observador termino en panic");
        }
    }

    light.stop()?;
    info!("fin de la simulacion");
    Ok(())
}
