//! Artefacto de modelo nativo (JSON).
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "classes": [0, 1],
//!   "n_features": 3,
//!   "feature_names": ["MolWt", "LogP", "TPSA"],
//!   "scaler": { "mean": [..], "scale": [..] },
//!   "estimator": { "kind": "logistic_regression", "coefficients": [..], "intercept": -1.0 }
//! }
//! ```
//!
//! Los árboles usan la disposición de arrays de scikit-learn: `-1` marca una
//! hoja y `x <= threshold` va a la izquierda.
use serde::{Deserialize, Serialize};

use crate::classifier::{normalize, Classifier};
use crate::InferenceError;

pub const FORMAT_VERSION: u32 = 1;

fn default_classes() -> [i64; 2] {
    [0, 1]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, features: &[f64]) -> Vec<f64> {
        features.iter()
                .zip(self.mean.iter().zip(&self.scale))
                .map(|(x, (m, s))| if *s == 0.0 { x - m } else { (x - m) / s })
                .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        if let Some(index) = features.iter().position(|x| x.is_nan()) {
            return Err(undefined(index));
        }
        let z: f64 = self.intercept + self.coefficients.iter().zip(features).map(|(w, x)| w * x).sum::<f64>();
        let p1 = 1.0 / (1.0 + (-z).exp());
        Ok([1.0 - p1, p1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Pesos (o recuentos) de cada clase por nodo.
    pub value: Vec<[f64; 2]>,
    /// Hacia dónde van los NaN en cada nodo; sin él, un NaN es un error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_go_to_left: Option<Vec<bool>>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize) -> Result<(), InferenceError> {
        let n = self.children_left.len();
        if n == 0 {
            return Err(InferenceError::InvalidModel("árbol sin nodos".into()));
        }
        let lengths = [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()];
        if lengths.iter().any(|l| *l != n) || self.missing_go_to_left.as_ref().is_some_and(|m| m.len() != n) {
            return Err(InferenceError::InvalidModel("los arrays del árbol tienen longitudes distintas".into()));
        }
        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == -1 && right == -1 {
                continue;
            }
            let in_range = |child: i64| child > node as i64 && (child as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(InferenceError::InvalidModel(format!("nodo {node}: hijos fuera de rango")));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(InferenceError::InvalidModel(format!("nodo {node}: columna {feature} fuera de rango")));
            }
        }
        Ok(())
    }

    fn leaf_for(&self, features: &[f64]) -> Result<usize, InferenceError> {
        let mut node = 0usize;
        while self.children_left[node] != -1 {
            let column = self.feature[node] as usize;
            let x = features[column];
            let go_left = if x.is_nan() {
                match &self.missing_go_to_left {
                    Some(routes) => routes[node],
                    None => return Err(undefined(column)),
                }
            } else {
                x <= self.threshold[node]
            };
            let next = if go_left { self.children_left[node] } else { self.children_right[node] };
            node = next as usize;
        }
        Ok(node)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        normalize(self.value[self.leaf_for(features)?])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        let mut acc = [0.0, 0.0];
        for tree in &self.trees {
            let p = tree.predict_proba(features)?;
            acc[0] += p[0];
            acc[1] += p[1];
        }
        let n = self.trees.len() as f64;
        Ok([acc[0] / n, acc[1] / n])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression(_) => "logistic_regression",
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest(_) => "random_forest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Lee y valida un artefacto JSON.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, InferenceError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.format_version != FORMAT_VERSION {
            return Err(InferenceError::UnsupportedFormat(format!("format_version {} (se esperaba {FORMAT_VERSION})",
                                                                 self.format_version)));
        }
        if self.n_features == 0 {
            return Err(InferenceError::InvalidModel("n_features debe ser mayor que cero".into()));
        }
        if self.classes[0] == self.classes[1] {
            return Err(InferenceError::InvalidModel("las dos clases deben ser distintas".into()));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(InferenceError::InvalidModel(format!("feature_names tiene {} nombres y n_features es {}",
                                                                names.len(),
                                                                self.n_features)));
            }
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != self.n_features || scaler.scale.len() != self.n_features {
                return Err(InferenceError::InvalidModel("el escalador no coincide con n_features".into()));
            }
        }
        match &self.estimator {
            Estimator::LogisticRegression(lr) if lr.coefficients.len() != self.n_features => {
                Err(InferenceError::InvalidModel(format!("{} coeficientes para {} columnas",
                                                         lr.coefficients.len(),
                                                         self.n_features)))
            }
            Estimator::LogisticRegression(_) => Ok(()),
            Estimator::DecisionTree(tree) => tree.validate(self.n_features),
            Estimator::RandomForest(forest) if forest.trees.is_empty() => {
                Err(InferenceError::InvalidModel("bosque sin árboles".into()))
            }
            Estimator::RandomForest(forest) => forest.trees.iter().try_for_each(|t| t.validate(self.n_features)),
        }
    }
}

impl Classifier for ModelArtifact {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn classes(&self) -> [i64; 2] {
        self.classes
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::SchemaMismatch(format!("el modelo espera {} columnas y recibió {}",
                                                              self.n_features,
                                                              features.len())));
        }
        let scaled;
        let input = match &self.scaler {
            Some(scaler) => {
                scaled = scaler.transform(features);
                scaled.as_slice()
            }
            None => features,
        };
        match &self.estimator {
            Estimator::LogisticRegression(lr) => lr.predict_proba(input),
            Estimator::DecisionTree(tree) => tree.predict_proba(input),
            Estimator::RandomForest(forest) => forest.predict_proba(input),
        }
    }
}

fn undefined(index: usize) -> InferenceError {
    InferenceError::UndefinedFeature { index,
                                       name: format!("#{index}") }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    use super::*;

    fn stump(missing_left: Option<bool>) -> DecisionTree {
        DecisionTree { children_left: vec![1, -1, -1],
                       children_right: vec![2, -1, -1],
                       feature: vec![0, -2, -2],
                       threshold: vec![0.5, -2.0, -2.0],
                       value: vec![[5.0, 5.0], [4.0, 1.0], [1.0, 4.0]],
                       missing_go_to_left: missing_left.map(|l| vec![l, false, false]) }
    }

    fn artifact(estimator: Estimator, n: usize) -> ModelArtifact {
        ModelArtifact { format_version: FORMAT_VERSION,
                        classes: [0, 1],
                        n_features: n,
                        feature_names: None,
                        scaler: None,
                        estimator }
    }

    #[test]
    fn logistic_regression_sigmoid() {
        let model = artifact(Estimator::LogisticRegression(LogisticRegression { coefficients: vec![1.0, -1.0],
                                                                                intercept: 0.0 }),
                             2);
        let p = model.predict_proba(&[2.0, 2.0]).unwrap();
        assert_abs_diff_eq!(p[1], 0.5);
        let p = model.predict_proba(&[3.0, 0.0]).unwrap();
        assert_abs_diff_eq!(p[1], 1.0 / (1.0 + (-3.0f64).exp()), epsilon = 1e-12);
        assert_abs_diff_eq!(p[0] + p[1], 1.0, epsilon = 1e-12);
        assert!(matches!(model.predict_proba(&[f64::NAN, 0.0]), Err(InferenceError::UndefinedFeature { index: 0, .. })));
    }

    #[test]
    fn tree_goes_left_on_equal_threshold() {
        let model = artifact(Estimator::DecisionTree(stump(None)), 1);
        assert_eq!(model.predict_proba(&[0.5]).unwrap(), [0.8, 0.2]);
        assert_eq!(model.predict_proba(&[0.6]).unwrap(), [0.2, 0.8]);
        assert_eq!(model.predict_label(&[0.6]).unwrap(), 1);
    }

    #[test]
    fn tree_routes_missing_values_when_trained_to() {
        let strict = artifact(Estimator::DecisionTree(stump(None)), 1);
        assert!(strict.predict_proba(&[f64::NAN]).is_err());
        let routed = artifact(Estimator::DecisionTree(stump(Some(false))), 1);
        assert_eq!(routed.predict_proba(&[f64::NAN]).unwrap(), [0.2, 0.8]);
    }

    #[test]
    fn forest_averages_trees() {
        let model = artifact(Estimator::RandomForest(RandomForest { trees: vec![stump(None), stump(None)] }), 1);
        assert_eq!(model.predict_proba(&[0.0]).unwrap(), [0.8, 0.2]);
    }

    #[test]
    fn scaler_is_applied_first() {
        let mut model = artifact(Estimator::LogisticRegression(LogisticRegression { coefficients: vec![1.0],
                                                                                    intercept: 0.0 }),
                                 1);
        model.scaler = Some(StandardScaler { mean: vec![10.0],
                                             scale: vec![2.0] });
        assert_abs_diff_eq!(model.predict_proba(&[10.0]).unwrap()[1], 0.5);
    }

    #[test]
    fn parses_tagged_json() {
        let json = json!({
            "format_version": 1,
            "n_features": 1,
            "estimator": {"kind": "decision_tree",
                          "children_left": [1, -1, -1], "children_right": [2, -1, -1],
                          "feature": [0, -2, -2], "threshold": [0.5, -2.0, -2.0],
                          "value": [[5.0, 5.0], [4.0, 1.0], [1.0, 4.0]]}
        });
        let model = ModelArtifact::from_json_slice(json.to_string().as_bytes()).unwrap();
        assert_eq!(model.classes, [0, 1]);
        assert_eq!(model.estimator.kind(), "decision_tree");
    }

    #[test]
    fn validation_rejects_inconsistent_artifacts() {
        let bad_len = artifact(Estimator::LogisticRegression(LogisticRegression { coefficients: vec![1.0],
                                                                                  intercept: 0.0 }),
                               2);
        assert!(bad_len.validate().is_err());

        let mut bad_tree = stump(None);
        bad_tree.feature[0] = 7;
        assert!(artifact(Estimator::DecisionTree(bad_tree), 1).validate().is_err());

        let mut cyclic = stump(None);
        cyclic.children_left[0] = 0;
        assert!(artifact(Estimator::DecisionTree(cyclic), 1).validate().is_err());

        let mut wrong_version = artifact(Estimator::RandomForest(RandomForest { trees: vec![stump(None)] }), 1);
        wrong_version.format_version = 2;
        assert!(matches!(wrong_version.validate(), Err(InferenceError::UnsupportedFormat(_))));
    }
}
