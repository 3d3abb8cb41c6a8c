//! Rendered payloads and the sinks that receive them.

/// A fully rendered export, ready to be written to an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub status: u16,
    pub content_type: &'static str,
    /// Attachment filename including extension; `None` for inline content.
    pub attachment: Option<String>,
    pub body: Vec<u8>,
}

impl ExportResponse {
    /// 200 response served as a download.
    pub fn attachment(content_type: &'static str, filename: String, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            attachment: Some(filename),
            body,
        }
    }

    /// 200 response rendered inline.
    pub fn inline(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            attachment: None,
            body,
        }
    }

    /// `Content-Disposition` header value, for attachments.
    pub fn content_disposition(&self) -> Option<String> {
        self.attachment
            .as_ref()
            .map(|name| format!("attachment; filename={}", name))
    }

    /// Response headers in emission order.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", self.content_type.to_string())];
        if let Some(disposition) = self.content_disposition() {
            headers.push(("Content-Disposition", disposition));
        }
        headers
    }

    /// Body as UTF-8 text, for text formats.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Destination for rendered exports (an HTTP response writer, a file, a buffer).
pub trait ResponseSink {
    fn send(&mut self, response: ExportResponse);
}

/// Sink that keeps every response it receives.
#[derive(Debug, Default)]
pub struct BufferedSink {
    responses: Vec<ExportResponse>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent response.
    pub fn last(&self) -> Option<&ExportResponse> {
        self.responses.last()
    }

    pub fn take(&mut self) -> Option<ExportResponse> {
        self.responses.pop()
    }

    /// Number of times `send` was called.
    pub fn sends(&self) -> usize {
        self.responses.len()
    }
}

impl ResponseSink for BufferedSink {
    fn send(&mut self, response: ExportResponse) {
        self.responses.push(response);
    }
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn send(&mut self, response: ExportResponse) {
        (**self).send(response)
    }
}
