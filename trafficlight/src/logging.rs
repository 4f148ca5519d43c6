// logger del semaforo sobre la fachada `log`
// por defecto imprime a consola; con set_sink se redirige cada linea a otra funcion
// set_sink solo tiene efecto antes de la primera linea o la primera llamada a set_sink

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;

type SinkFn = fn(&str);

fn default_sink(s: &str) {
    println!("{}", s);
}

static SINK: OnceCell<SinkFn> = OnceCell::new();

struct SignalLogger;
static SIGNAL_LOGGER: SignalLogger = SignalLogger;

/// Cambia el destino de las lineas. Devuelve `false` si ya habia uno fijado.
pub fn set_sink(f: SinkFn) -> bool {
    SINK.set(f).is_ok()
}

/// Instala el logger global. Lo llama el binario, nunca las bibliotecas.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&SIGNAL_LOGGER).map(|()| log::set_max_level(level))
}

impl Log for SignalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let thread = std::thread::current();
        let line = format!(
            "[{:<5}] [{}] {}",
            record.level(),
            thread.name().unwrap_or("?"),
            record.args()
        );
        let sink = SINK.get_or_init(|| default_sink);
        sink(&line);
    }

    fn flush(&self) {}
}
