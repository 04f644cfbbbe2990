use std::io::Cursor;
use std::path::Path;

use sertraline_predictor::shell::{self, Session, SessionState, Step};
use sertraline_predictor::{AppConfig, BackendKind, Predictor};

fn predictor() -> Predictor {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    Predictor::load(&AppConfig { model_path: fixtures.join("best_model.json"),
                                 schema_path: fixtures.join("feature_columns.json"),
                                 backend: BackendKind::Native }).unwrap()
}

fn reply(step: Step) -> String {
    match step {
        Step::Reply(text) => text,
        Step::Quit => panic!("la sesión terminó inesperadamente"),
    }
}

#[test]
fn test_state_transitions() {
    let p = predictor();
    let mut session = Session::new(&p);
    assert_eq!(session.state(), &SessionState::NoInput);

    assert!(reply(session.handle(":predict")).starts_with("Enter a valid SMILES"));
    assert_eq!(session.state(), &SessionState::NoInput);

    assert_eq!(reply(session.handle("not_a_smiles")), "❌ Invalid SMILES string. Please check and try again.");
    assert_eq!(session.state(), &SessionState::InvalidInput);

    assert_eq!(reply(session.handle("CCO")), "✅ Valid SMILES! Descriptors extracted.");
    assert!(matches!(session.state(), SessionState::AwaitingPrediction(_)));

    let verdict = reply(session.handle(":predict"));
    assert_eq!(verdict, "❌ NEGATIVE - Probability: 18.24%\nThe compound does not show sertraline-like activity");
    assert!(matches!(session.state(), SessionState::PredictionShown(..)));

    // un nuevo envío descarta la predicción anterior
    reply(session.handle("c1ccccc1"));
    assert!(matches!(session.state(), SessionState::AwaitingPrediction(_)));
    assert_eq!(reply(session.handle(":predict")),
               "✅ POSITIVE - Probability: 81.76%\nThe compound shows sertraline-like activity");

    assert_eq!(session.handle(":quit"), Step::Quit);
}

#[test]
fn test_descriptor_table_follows_schema() {
    let p = predictor();
    let mut session = Session::new(&p);
    reply(session.handle("CCO"));
    let table = reply(session.handle(":descriptors"));
    let names: Vec<&str> = table.lines().skip(2).filter_map(|l| l.split_whitespace().next()).collect();
    assert_eq!(names, p.schema().as_strs());
    assert!(table.contains("NumHDonors        1"));
}

#[test]
fn test_undefined_charges_are_displayed_and_prediction_fails_loudly() {
    let p = predictor();
    let mut session = Session::new(&p);
    assert_eq!(reply(session.handle("[Na+].[Cl-]")), "✅ Valid SMILES! Descriptors extracted.");
    let table = reply(session.handle(":descriptors"));
    assert!(table.contains("MaxPartialCharge  nan"));
    let answer = reply(session.handle(":predict"));
    assert!(answer.starts_with("⚠️ Prediction failed"), "{answer}");
    assert!(answer.contains("MaxPartialCharge"));
    assert!(matches!(session.state(), SessionState::AwaitingPrediction(_)));
}

#[test]
fn test_run_loop() {
    let p = predictor();
    let input = Cursor::new("CCO\n:predict\n\n:help\n:quit\nCCC\n");
    let mut output = Vec::new();
    shell::run(&p, input, &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.starts_with("🧬 Sertraline Activity Predictor\n"));
    assert!(text.contains("✅ Valid SMILES! Descriptors extracted."));
    assert!(text.contains("❌ NEGATIVE - Probability: 18.24%"));
    assert!(text.contains(":descriptors"));
    // lo que sigue a :quit no se procesa
    assert_eq!(text.matches("Valid SMILES").count(), 1);
}

#[test]
fn test_run_stops_at_end_of_input() {
    let p = predictor();
    let mut output = Vec::new();
    shell::run(&p, Cursor::new("c1ccccc1\n:p"), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("✅ POSITIVE - Probability: 81.76%"));
}
