//! Capacidad mínima que el motor de inferencia necesita de un modelo.
use crate::InferenceError;

pub trait Classifier {
    /// Número de columnas que espera el modelo.
    fn n_features(&self) -> usize;

    /// Nombres de columna registrados al entrenar, si el artefacto los guarda.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Valores de clase, en el mismo orden que las probabilidades.
    fn classes(&self) -> [i64; 2];

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError>;

    /// Clase con mayor probabilidad; en caso de empate gana la primera.
    fn predict_label(&self, features: &[f64]) -> Result<i64, InferenceError> {
        let proba = self.predict_proba(features)?;
        Ok(argmax_label(self.classes(), proba))
    }
}

pub fn argmax_label(classes: [i64; 2], proba: [f64; 2]) -> i64 {
    if proba[1] > proba[0] {
        classes[1]
    } else {
        classes[0]
    }
}

/// Normaliza un par de pesos no negativos a probabilidades que suman 1.
pub(crate) fn normalize(weights: [f64; 2]) -> Result<[f64; 2], InferenceError> {
    let total = weights[0] + weights[1];
    if !total.is_finite() || total <= 0.0 || weights.iter().any(|w| *w < 0.0) {
        return Err(InferenceError::InvalidModel(format!("pesos de clase no válidos: {weights:?}")));
    }
    Ok([weights[0] / total, weights[1] / total])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed([f64; 2]);

    impl Classifier for Fixed {
        fn n_features(&self) -> usize {
            1
        }

        fn classes(&self) -> [i64; 2] {
            [0, 1]
        }

        fn predict_proba(&self, _features: &[f64]) -> Result<[f64; 2], InferenceError> {
            Ok(self.0)
        }
    }

    #[test]
    fn label_is_argmax_and_ties_go_to_first_class() {
        assert_eq!(Fixed([0.2, 0.8]).predict_label(&[0.0]).unwrap(), 1);
        assert_eq!(Fixed([0.7, 0.3]).predict_label(&[0.0]).unwrap(), 0);
        assert_eq!(Fixed([0.5, 0.5]).predict_label(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize([1.0, 3.0]).unwrap(), [0.25, 0.75]);
        assert!(normalize([0.0, 0.0]).is_err());
        assert!(normalize([-1.0, 2.0]).is_err());
    }
}
