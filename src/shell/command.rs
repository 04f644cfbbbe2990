/// Línea introducida por el usuario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Cualquier texto que no empiece por `:` se trata como SMILES.
    Submit(String),
    Descriptors,
    Predict,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        match line.strip_prefix(':') {
            Some(cmd) => match cmd.trim().to_ascii_lowercase().as_str() {
                "descriptors" | "d" => Command::Descriptors,
                "predict" | "p" => Command::Predict,
                "help" | "h" | "?" => Command::Help,
                "quit" | "q" | "exit" => Command::Quit,
                _ => Command::Unknown(line.to_string()),
            },
            None => Command::Submit(line.to_string()),
        }
    }
}
