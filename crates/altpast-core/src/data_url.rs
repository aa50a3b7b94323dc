use std::borrow::Cow;

/// Prefix assumed for bare base64 image payloads
pub const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Turn a bare base64 image into a data URL
///
/// Values that already start with `data:` are returned as-is.
pub fn to_data_url(image: &str) -> Cow<'_, str> {
    if image.starts_with("data:") {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(format!("{JPEG_DATA_URL_PREFIX}{image}"))
    }
}

/// Like [`to_data_url`], but remote `http(s)` references pass through too
pub fn to_image_reference(image: &str) -> Cow<'_, str> {
    if image.starts_with("http") {
        Cow::Borrowed(image)
    } else {
        to_data_url(image)
    }
}
