use std::io;
use std::process;

use sertraline_predictor::config::{init_dotenv, AppConfig};
use sertraline_predictor::{shell, Predictor};
use tracing_subscriber::EnvFilter;

fn main() {
    // Cargar .env antes de leer RUST_LOG y las rutas de los artefactos
    init_dotenv();
    // Los registros de `log` de los crates de la librería también pasan por aquí
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_writer(io::stderr)
                             .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[predictor] {e}");
            process::exit(2);
        }
    };
    log::info!("modelo: {}, columnas: {}, backend: {:?}",
               config.model_path.display(),
               config.schema_path.display(),
               config.backend);

    // Sin modelo o esquema no se acepta ninguna entrada
    let predictor = match Predictor::load(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[predictor] no se pudo arrancar: {e}");
            process::exit(3);
        }
    };

    let stdin = io::stdin();
    if let Err(e) = shell::run(&predictor, stdin.lock(), io::stdout()) {
        eprintln!("[predictor] error de E/S: {e}");
        process::exit(4);
    }
}
