#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod data_url;
mod error;
mod http_client;
mod method;

pub use data_url::{JPEG_DATA_URL_PREFIX, to_data_url, to_image_reference};
pub use error::{ErrorReply, HttpError};
pub use http_client::http_client;
pub use method::{endpoint, method_not_allowed, preflight};
