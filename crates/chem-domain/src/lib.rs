// chem-domain library entry point
pub mod descriptor;
pub mod errors;
pub mod extractor;
pub mod schema;
pub mod vector;
pub use descriptor::DescriptorName;
pub use errors::DomainError;
pub use extractor::DescriptorExtractor;
pub use schema::FeatureSchema;
pub use vector::DescriptorVector;
