// ATS Compliance Validator: font policy, text extraction, garble detection, extraction rate.
// Extraction runs on the blocking pool; everything else is pure.

pub mod extractor;
pub mod font_policy;
pub mod garble;
pub mod handlers;
pub mod issues;
pub mod validator;
