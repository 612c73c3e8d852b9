//! Custom request extractors.

mod upload_form;
mod validated_json;

pub use upload_form::UploadForm;
pub use validated_json::ValidatedJson;
