//! `multipart/form-data` extraction for browser file uploads
//!
//! Works on raw bytes so binary payloads survive untouched, including
//! non-UTF-8 data and boundary-like text that is not preceded by CRLF.
//! Nested multipart bodies and folded headers are not supported.

use std::collections::HashMap;

use axum::body::Bytes;
use thiserror::Error;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One file (or plain field) pulled out of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Raw payload bytes
    pub buffer: Bytes,
    /// Filename from the `Content-Disposition` header, if any
    pub filename: Option<String>,
    /// Part content type, `application/octet-stream` when absent
    pub content_type: String,
}

/// The request body could not be treated as multipart
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("no boundary found in content-type header")]
    MissingBoundary,
}

/// Parse every `form-data` part of `body`, keyed by field name
///
/// A later part with the same name replaces an earlier one. Parts that are
/// cut off before their closing delimiter are dropped.
///
/// # Errors
///
/// Returns [`MultipartError::MissingBoundary`] if `content_type` carries no
/// `boundary=` parameter
pub fn extract(content_type: &str, body: &Bytes) -> Result<HashMap<String, UploadedFile>, MultipartError> {
    let boundary = boundary(content_type)?;
    Ok(Parser::new(body, boundary).run())
}

/// Pull the boundary token out of a `Content-Type` header value
fn boundary(content_type: &str) -> Result<&str, MultipartError> {
    let (_, rest) = content_type
        .split_once("boundary=")
        .ok_or(MultipartError::MissingBoundary)?;

    let token = rest.split(';').next().unwrap_or_default().trim();
    let token = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token);

    if token.is_empty() {
        return Err(MultipartError::MissingBoundary);
    }

    Ok(token)
}

enum State {
    /// Looking for the first delimiter
    Preamble,
    /// Just past a delimiter, at the given offset
    Delimiter(usize),
    /// At the start of a part's header block
    Headers(usize),
    /// At the start of a part's payload
    Payload { start: usize, headers: PartHeaders },
    Done,
}

struct Parser<'a> {
    body: &'a Bytes,
    /// `--boundary`, the first delimiter
    dash_boundary: Vec<u8>,
    /// `\r\n--boundary`, every delimiter that follows a payload
    delimiter: Vec<u8>,
    fields: HashMap<String, UploadedFile>,
}

impl<'a> Parser<'a> {
    fn new(body: &'a Bytes, boundary: &str) -> Self {
        let dash_boundary = [b"--".as_slice(), boundary.as_bytes()].concat();
        let delimiter = [b"\r\n".as_slice(), &dash_boundary].concat();

        Self {
            body,
            dash_boundary,
            delimiter,
            fields: HashMap::new(),
        }
    }

    fn run(mut self) -> HashMap<String, UploadedFile> {
        let mut state = State::Preamble;

        loop {
            state = match state {
                State::Preamble => self.preamble(),
                State::Delimiter(at) => self.after_delimiter(at),
                State::Headers(at) => self.headers(at),
                State::Payload { start, headers } => self.payload(start, headers),
                State::Done => return self.fields,
            };
        }
    }

    fn preamble(&self) -> State {
        find(self.body, &self.dash_boundary, 0).map_or(State::Done, |at| State::Delimiter(at + self.dash_boundary.len()))
    }

    fn after_delimiter(&self, at: usize) -> State {
        let rest = &self.body[at..];

        // `--boundary--` closes the body
        if rest.starts_with(b"--") {
            return State::Done;
        }

        // skip transport padding up to the line end
        find(self.body, b"\r\n", at).map_or(State::Done, |eol| State::Headers(eol + 2))
    }

    fn headers(&self, at: usize) -> State {
        let (block_end, payload_start) = if self.body[at..].starts_with(b"\r\n") {
            (at, at + 2)
        } else {
            match find(self.body, b"\r\n\r\n", at) {
                Some(end) => (end, end + 4),
                None => return State::Done,
            }
        };

        State::Payload {
            start: payload_start,
            headers: PartHeaders::parse(&self.body[at..block_end]),
        }
    }

    fn payload(&mut self, start: usize, headers: PartHeaders) -> State {
        let Some(end) = find(self.body, &self.delimiter, start) else {
            tracing::debug!("multipart body ended inside a part, dropping it");
            return State::Done;
        };

        if let Some(name) = headers.name {
            self.fields.insert(
                name,
                UploadedFile {
                    buffer: self.body.slice(start..end),
                    filename: headers.filename,
                    content_type: headers.content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
                },
            );
        }

        State::Delimiter(end + self.delimiter.len())
    }
}

/// The headers of one part that matter for form uploads
#[derive(Debug, Default)]
struct PartHeaders {
    /// Field name, only set for `form-data` dispositions
    name: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(block: &[u8]) -> Self {
        let text = String::from_utf8_lossy(block);
        let mut headers = Self::default();

        for line in text.split("\r\n") {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };

            let value = value.trim();

            if name.trim().eq_ignore_ascii_case("content-disposition") {
                let mut segments = split_params(value).into_iter();

                let is_form_data = segments
                    .next()
                    .is_some_and(|disposition| disposition.trim().eq_ignore_ascii_case("form-data"));

                if !is_form_data {
                    continue;
                }

                for segment in segments {
                    let Some((key, raw)) = segment.split_once('=') else {
                        continue;
                    };

                    match key.trim().to_ascii_lowercase().as_str() {
                        "name" => headers.name = Some(unquote(raw)),
                        "filename" => headers.filename = Some(unquote(raw)),
                        _ => {}
                    }
                }
            } else if name.trim().eq_ignore_ascii_case("content-type") && !value.is_empty() {
                headers.content_type = Some(value.to_owned());
            }
        }

        headers
    }
}

/// Split a header value on `;`, ignoring separators inside quotes
fn split_params(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    segments.push(&value[start..]);
    segments
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim();

    raw.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .map_or_else(|| raw.to_owned(), |inner| inner.replace("\\\"", "\"").replace("\\\\", "\\"))
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }

    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}
