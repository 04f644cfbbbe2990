use approx::assert_abs_diff_eq;
use chemengine::{ChemEngine, DescriptorValues, EngineError, Molecule, DESCRIPTOR_NAMES};

const CAFFEINE: &str = "CN1C=NC2=C1C(=O)N(C(=O)N2C)C";
const SERTRALINE: &str = "CN[C@H]1CC[C@@H](C2=CC=CC=C12)C3=CC(=C(C=C3)Cl)Cl";

fn native(smiles: &str) -> DescriptorValues {
    ChemEngine::native().descriptors(smiles).unwrap_or_else(|e| panic!("{smiles}: {e}"))
}

#[test]
fn ethanol_reference_values() {
    let v = native("CCO");
    assert_abs_diff_eq!(v.mol_wt, 46.07, epsilon = 0.01);
    assert_eq!(v.num_h_donors, 1);
    assert_eq!(v.num_h_acceptors, 1);
    assert_eq!(v.num_rotatable_bonds, 0);
    assert_eq!(v.ring_count, 0);
    assert_abs_diff_eq!(v.tpsa, 20.23, epsilon = 1e-6);
    assert_abs_diff_eq!(v.log_p, -0.0014, epsilon = 1e-4);
    assert_abs_diff_eq!(v.fraction_csp3, 1.0);
    assert!(v.max_partial_charge.is_finite());
    assert!(v.min_partial_charge.is_finite());
    assert!(v.min_partial_charge < 0.0);
}

#[test]
fn caffeine_rings() {
    let v = native(CAFFEINE);
    assert!(v.num_aromatic_rings >= 1);
    assert!(v.ring_count >= 2);
    assert_eq!(v.num_heavy_atoms, 14);
    assert_eq!(v.num_h_acceptors, 6);
    assert_eq!(v.num_h_donors, 0);
}

#[test]
fn sertraline_is_parsed() {
    let v = native(SERTRALINE);
    assert_eq!(v.num_heavy_atoms, 20);
    assert_eq!(v.ring_count, 3);
    assert_eq!(v.num_aromatic_rings, 2);
    assert_eq!(v.num_aliphatic_rings, 1);
    assert_eq!(v.num_h_donors, 1);
    assert_abs_diff_eq!(v.mol_wt, 306.236, epsilon = 0.01);
}

#[test]
fn repeated_extraction_is_bit_identical() {
    let first = native(SERTRALINE);
    let second = native(SERTRALINE);
    for ((name, a), (_, b)) in first.entries().iter().zip(second.entries().iter()) {
        assert_eq!(a.to_bits(), b.to_bits(), "{name}");
    }
}

#[test]
fn aromatic_and_kekule_forms_agree() {
    let aromatic = native("c1ccccc1O");
    let kekule = native("C1=CC=CC=C1O");
    for ((name, a), (_, b)) in aromatic.entries().iter().zip(kekule.entries().iter()) {
        assert!((a - b).abs() < 1e-9, "{name}: {a} != {b}");
    }
}

#[test]
fn invalid_inputs_are_rejected() {
    let engine = ChemEngine::native();
    for bad in ["", "not_a_smiles", "C1CC", "C((C)", "[Xx]", "c1cccc1", "CC(C)(C)(C)C"] {
        let err = engine.descriptors(bad).expect_err(bad);
        assert!(err.is_invalid_input(), "{bad}: {err}");
    }
}

#[test]
fn oversized_bracket_counts_are_invalid_input() {
    let engine = ChemEngine::native();
    let many_plus = format!("[C{}]", "+".repeat(130));
    for bad in ["[CH255]C",
                "c1cc[cH255]cc1",
                "[CH9]C",
                "c1cc[cH9]cc1",
                "[CH99999999999]",
                "[C+99999999999]",
                "[99999999999C]",
                many_plus.as_str()]
    {
        let err = engine.descriptors(bad).expect_err(bad);
        assert!(err.is_invalid_input(), "{bad}: {err}");
    }
}

#[test]
fn parse_errors_report_position() {
    match Molecule::from_smiles("CC)C") {
        Err(EngineError::Parse { position, .. }) => assert_eq!(position, 2),
        other => panic!("se esperaba error de parseo, se obtuvo {other:?}"),
    }
}

#[test]
fn every_canonical_name_is_present() {
    let v = native("CCO");
    for name in DESCRIPTOR_NAMES {
        assert!(v.get(name).is_some(), "{name}");
    }
}
