use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use sertraline_predictor::{Analysis, AppConfig, BackendKind, CoreError, Predictor};

const SERTRALINE: &str = "CN[C@H]1CC[C@@H](C2=CC=CC=C12)C3=CC(=C(C=C3)Cl)Cl";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn config(model: &str) -> AppConfig {
    AppConfig { model_path: fixture(model),
                schema_path: fixture("feature_columns.json"),
                backend: BackendKind::Native }
}

fn valid(predictor: &Predictor, smiles: &str) -> chem_domain::DescriptorVector {
    match predictor.analyze(smiles).unwrap() {
        Analysis::Valid(v) => v,
        Analysis::Invalid { reason } => panic!("{smiles} debería ser válido: {reason}"),
    }
}

#[test]
fn test_loads_fixture_artifacts() {
    let predictor = Predictor::load(&config("best_model.json")).unwrap();
    assert_eq!(predictor.schema().len(), 9);
    assert_eq!(predictor.backend_name(), "native");
    assert_eq!(predictor.model_digest().map(str::len), Some(64));
}

#[test]
fn test_ethanol_scenario() {
    let predictor = Predictor::load(&config("best_model.json")).unwrap();
    let vector = valid(&predictor, "CCO");
    assert!(vector.matches_schema(predictor.schema()));
    assert!(vector.iter().all(|(_, v)| v.is_finite()));
    let result = predictor.predict(&vector).unwrap();
    assert!(!result.is_positive());
    assert_abs_diff_eq!(result.positive_probability(), 0.182426, epsilon = 1e-6);
}

#[test]
fn test_not_a_smiles_is_rejected() {
    let predictor = Predictor::load(&config("best_model.json")).unwrap();
    assert!(matches!(predictor.analyze("not_a_smiles").unwrap(), Analysis::Invalid { .. }));
}

#[test]
fn test_forest_with_scaler() {
    let predictor = Predictor::load(&config("forest_model.json")).unwrap();
    let sertraline = predictor.predict(&valid(&predictor, SERTRALINE)).unwrap();
    assert!(sertraline.is_positive());
    assert_abs_diff_eq!(sertraline.positive_probability(), 11.0 / 12.0, epsilon = 1e-12);
    let ethanol = predictor.predict(&valid(&predictor, "CCO")).unwrap();
    assert!(!ethanol.is_positive());
    assert_abs_diff_eq!(ethanol.positive_probability(), 5.0 / 24.0, epsilon = 1e-12);
}

#[test]
fn test_reloading_gives_identical_predictions() {
    let first = Predictor::load(&config("best_model.json")).unwrap();
    let second = Predictor::load(&config("best_model.json")).unwrap();
    assert_eq!(first.model_digest(), second.model_digest());
    for smiles in ["CCO", SERTRALINE, "CN1C=NC2=C1C(=O)N(C(=O)N2C)C"] {
        let a = first.predict(&valid(&first, smiles)).unwrap();
        let b = second.predict(&valid(&second, smiles)).unwrap();
        assert_eq!(a, b, "{smiles}");
    }
}

#[test]
fn test_startup_failures_are_fatal() {
    let mut missing = config("best_model.json");
    missing.model_path = fixture("does_not_exist.json");
    assert!(matches!(Predictor::load(&missing), Err(CoreError::Artifact(_))));

    let dir = tempfile::tempdir().unwrap();
    let short_schema = dir.path().join("feature_columns.json");
    std::fs::write(&short_schema, r#"["LogP", "MolWt"]"#).unwrap();
    let mismatched = AppConfig { schema_path: short_schema,
                                 ..config("best_model.json") };
    assert!(matches!(Predictor::load(&mismatched), Err(CoreError::Artifact(_))));

    let corrupt = dir.path().join("best_model.json");
    std::fs::write(&corrupt, "{ not json").unwrap();
    let broken = AppConfig { model_path: corrupt,
                             ..config("best_model.json") };
    assert!(Predictor::load(&broken).is_err());
}
