//! Textos que ve el usuario.
use chem_domain::DescriptorVector;
use chem_inference::PredictionResult;

pub const TITLE: &str = "🧬 Sertraline Activity Predictor";
pub const SUBTITLE: &str = "Predict molecular activities for cancer chemosensitization";
pub const INVALID_SMILES: &str = "❌ Invalid SMILES string. Please check and try again.";
pub const VALID_SMILES: &str = "✅ Valid SMILES! Descriptors extracted.";
pub const NEEDS_SMILES: &str = "Enter a valid SMILES string first (e.g., CCO or CN1C=NC2=C1C(=O)N(C(=O)N2C)C).";
pub const PROMPT: &str = "SMILES> ";

pub fn banner() -> String {
    format!("{TITLE}\n{SUBTITLE}\n---\nType :help for the list of commands.\n")
}

pub fn help() -> String {
    ["Enter a SMILES string to validate it and extract its descriptors.",
     "  :descriptors   show the extracted descriptor values",
     "  :predict       predict sertraline-like activity",
     "  :help          show this help",
     "  :quit          exit"].join("\n")
}

/// Valor de un descriptor; `nan` para los indefinidos.
pub fn format_value(value: f64) -> String {
    // -0.0 se muestra como 0
    let value = if value == 0.0 { 0.0 } else { value };
    if value.is_nan() {
        "nan".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

pub fn descriptor_table(vector: &DescriptorVector) -> String {
    let width = vector.names().map(|n| n.as_str().len()).max().unwrap_or(0).max("Descriptor".len());
    let mut lines = vec![format!("{:<width$}  Value", "Descriptor")];
    lines.push(format!("{}  {}", "-".repeat(width), "-".repeat(10)));
    for (name, value) in vector.iter() {
        lines.push(format!("{:<width$}  {}", name.as_str(), format_value(value)));
    }
    lines.join("\n")
}

/// Porcentaje con dos decimales, como `87.50%`.
pub fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

pub fn verdict(result: &PredictionResult) -> String {
    let probability = percent(result.positive_probability());
    if result.is_positive() {
        format!("✅ POSITIVE - Probability: {probability}\nThe compound shows sertraline-like activity")
    } else {
        format!("❌ NEGATIVE - Probability: {probability}\nThe compound does not show sertraline-like activity")
    }
}

#[cfg(test)]
mod tests {
    use chem_domain::DescriptorName;

    use super::*;

    #[test]
    fn verdicts() {
        let positive = PredictionResult { label: 1,
                                          probabilities: [0.125, 0.875],
                                          classes: [0, 1] };
        assert_eq!(verdict(&positive),
                   "✅ POSITIVE - Probability: 87.50%\nThe compound shows sertraline-like activity");
        let negative = PredictionResult { label: 0,
                                          probabilities: [0.875, 0.125],
                                          classes: [0, 1] };
        assert!(verdict(&negative).starts_with("❌ NEGATIVE - Probability: 12.50%"));
    }

    #[test]
    fn table_shows_nan() {
        let vector = DescriptorVector::from_pairs([(DescriptorName::MolWt, 46.069),
                                                   (DescriptorName::NumHDonors, 1.0),
                                                   (DescriptorName::MaxPartialCharge, f64::NAN)]);
        let table = descriptor_table(&vector);
        assert!(table.contains("MolWt             46.0690"));
        assert!(table.contains("NumHDonors        1"));
        assert!(table.contains("MaxPartialCharge  nan"));
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-1.5), "-1.5000");
    }
}
