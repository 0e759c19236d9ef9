//! Incremental Server-Sent-Events line parser.
//!
//! The streaming endpoint frames each chunk as `data: <json>` lines
//! separated by blank lines. Chunks from the transport can split a line
//! anywhere, so the parser buffers partial lines across `feed` calls and
//! emits only complete `data:` payloads, in order.

/// Stateful line parser over raw byte chunks.
#[derive(Debug, Default)]
pub struct SseLineParser {
    buffer: String,
}

impl SseLineParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a transport chunk; returns the complete `data:` payloads it
    /// finished. Comment lines, event fields and blank separators are
    /// consumed silently.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut out = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(rest) = line.strip_prefix("data:") {
                let data = rest.trim();
                if !data.is_empty() && data != "[DONE]" {
                    out.push(data.to_string());
                }
            }
        }
        out
    }
}
