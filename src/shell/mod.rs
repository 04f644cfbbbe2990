//! Sesión interactiva de línea de comandos.
//!
//! Cada SMILES enviado reemplaza por completo al anterior; la predicción sólo
//! se calcula cuando el usuario la pide con `:predict`.
pub mod command;
pub mod render;

use std::io::{self, BufRead, Write};

use chem_domain::DescriptorVector;
use chem_inference::PredictionResult;

pub use command::Command;

use crate::predictor::{Analysis, Predictor};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    NoInput,
    InvalidInput,
    AwaitingPrediction(DescriptorVector),
    PredictionShown(DescriptorVector, PredictionResult),
}

/// Qué hacer tras procesar una línea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Reply(String),
    Quit,
}

pub struct Session<'a> {
    predictor: &'a Predictor,
    state: SessionState,
}

impl<'a> Session<'a> {
    pub fn new(predictor: &'a Predictor) -> Self {
        Self { predictor,
               state: SessionState::NoInput }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn handle(&mut self, line: &str) -> Step {
        match Command::parse(line) {
            Command::Quit => Step::Quit,
            Command::Empty => Step::Reply(String::new()),
            Command::Help => Step::Reply(render::help()),
            Command::Unknown(cmd) => Step::Reply(format!("Unknown command {cmd}. Type :help for the list of commands.")),
            Command::Submit(smiles) => Step::Reply(self.submit(&smiles)),
            Command::Descriptors => Step::Reply(match &self.state {
                SessionState::AwaitingPrediction(vector) | SessionState::PredictionShown(vector, _) => {
                    render::descriptor_table(vector)
                }
                _ => render::NEEDS_SMILES.to_string(),
            }),
            Command::Predict => Step::Reply(self.predict()),
        }
    }

    fn submit(&mut self, smiles: &str) -> String {
        match self.predictor.analyze(smiles) {
            Ok(Analysis::Valid(vector)) => {
                self.state = SessionState::AwaitingPrediction(vector);
                render::VALID_SMILES.to_string()
            }
            Ok(Analysis::Invalid { .. }) => {
                self.state = SessionState::InvalidInput;
                render::INVALID_SMILES.to_string()
            }
            Err(e) => {
                log::error!("fallo del backend de descriptores: {e}");
                self.state = SessionState::InvalidInput;
                format!("⚠️ Descriptor calculation failed: {e}")
            }
        }
    }

    fn predict(&mut self) -> String {
        let vector = match std::mem::take(&mut self.state) {
            SessionState::AwaitingPrediction(vector) | SessionState::PredictionShown(vector, _) => vector,
            other => {
                self.state = other;
                return render::NEEDS_SMILES.to_string();
            }
        };
        match self.predictor.predict(&vector) {
            Ok(result) => {
                let text = render::verdict(&result);
                self.state = SessionState::PredictionShown(vector, result);
                text
            }
            Err(e) => {
                log::error!("predicción rechazada: {e}");
                self.state = SessionState::AwaitingPrediction(vector);
                format!("⚠️ Prediction failed: {e}")
            }
        }
    }
}

/// Bucle de lectura/respuesta hasta `:quit` o fin de la entrada.
pub fn run<R: BufRead, W: Write>(predictor: &Predictor, input: R, mut output: W) -> io::Result<()> {
    write!(output, "{}", render::banner())?;
    let mut session = Session::new(predictor);
    let mut lines = input.lines();
    loop {
        write!(output, "{}", render::PROMPT)?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        match session.handle(&line?) {
            Step::Quit => break,
            Step::Reply(text) if text.is_empty() => {}
            Step::Reply(text) => writeln!(output, "{text}")?,
        }
    }
    Ok(())
}
