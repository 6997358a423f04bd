// Error taxonomy shared by the whole request path
pub mod errors;

// Fixed feature schema and input codec
pub mod features;

// Model names, prediction results, audit records
pub mod model;
