use std::io::Write;

use approx::assert_abs_diff_eq;
use chem_domain::{DescriptorExtractor, DescriptorName, DomainError, FeatureSchema};

const CAFFEINE: &str = "CN1C=NC2=C1C(=O)N(C(=O)N2C)C";

fn extractor(names: &[&str]) -> DescriptorExtractor {
    DescriptorExtractor::native(FeatureSchema::from_names(names).unwrap())
}

#[test]
fn test_invalid_smiles_is_invalid_input() {
    let ex = DescriptorExtractor::native(FeatureSchema::canonical());
    for bad in ["not_a_smiles", "", "   ", "C1CC"] {
        assert!(matches!(ex.extract(bad), Err(DomainError::InvalidInput(_))), "{bad:?}");
    }
}

#[test]
fn test_vector_follows_schema() {
    let ex = extractor(&["NumHAcceptors", "MolWt", "NumHDonors"]);
    let v = ex.extract("CCO").unwrap();
    assert!(v.matches_schema(ex.schema()));
    assert_eq!(v.len(), 3);
    assert_eq!(v.get(DescriptorName::NumHDonors), Some(1.0));
    assert_eq!(v.get(DescriptorName::NumHAcceptors), Some(1.0));
    assert_abs_diff_eq!(v.get(DescriptorName::MolWt).unwrap(), 46.07, epsilon = 0.01);
}

#[test]
fn test_full_schema_has_21_columns() {
    let ex = DescriptorExtractor::native(FeatureSchema::canonical());
    let v = ex.extract(CAFFEINE).unwrap();
    assert_eq!(v.len(), 21);
    assert!(v.get(DescriptorName::NumAromaticRings).unwrap() >= 1.0);
    assert!(v.get(DescriptorName::RingCount).unwrap() >= 2.0);
}

#[test]
fn test_ethanol_charges_are_defined() {
    let ex = extractor(&["MaxPartialCharge", "MinPartialCharge"]);
    let v = ex.extract("CCO").unwrap();
    assert!(v.to_features().iter().all(|x| x.is_finite()));
}

#[test]
fn test_extraction_is_deterministic() {
    let ex = DescriptorExtractor::native(FeatureSchema::canonical());
    let a = ex.extract(CAFFEINE).unwrap().to_features();
    let b = ex.extract(CAFFEINE).unwrap().to_features();
    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    let ex = extractor(&["MolWt"]);
    assert_eq!(ex.extract("  CCO \n").unwrap(), ex.extract("CCO").unwrap());
}

#[test]
fn test_schema_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"["RingCount", "LogP"]"#).unwrap();
    let schema = FeatureSchema::from_json_file(file.path()).unwrap();
    assert_eq!(schema.as_strs(), vec!["RingCount", "LogP"]);

    let missing = FeatureSchema::from_json_file(std::path::Path::new("/nonexistent/feature_columns.json"));
    assert!(matches!(missing, Err(DomainError::ExternalError(_))));
}
