//! Incremental decoder for the chat-completions SSE stream.
//!
//! HTTP chunks arrive at arbitrary boundaries, so the parser buffers raw
//! bytes and only interprets complete `data:` lines. UTF-8 conversion
//! happens per line, never per chunk.

use serde::Deserialize;

/// One decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A text delta from the model.
    Delta(String),
    /// The `[DONE]` terminator.
    Done,
}

#[derive(Deserialize)]
struct DeltaChunk {
    choices: Vec<DeltaChoice>,
}

#[derive(Deserialize)]
struct DeltaChoice {
    delta: Delta,
}

#[derive(Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Line-buffered SSE parser.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    done: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` terminator has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a raw chunk and return the events completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if self.done {
                continue;
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = parse_line(line.trim_end_matches(['\n', '\r'])) {
                if event == SseEvent::Done {
                    self.done = true;
                }
                events.push(event);
            }
        }
        events
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let payload = line.strip_prefix("data:")?.trim_start();
    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }
    let chunk: DeltaChunk = serde_json::from_str(payload).ok()?;
    let content = chunk.choices.first()?.delta.content.as_ref()?;
    if content.is_empty() {
        return None;
    }
    Some(SseEvent::Delta(content.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_line(text: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{text}\"}}}}]}}\n\n"
        )
    }

    #[test]
    fn decodes_single_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(delta_line("hello").as_bytes());
        assert_eq!(events, vec![SseEvent::Delta("hello".to_string())]);
    }

    #[test]
    fn reassembles_events_split_across_chunks() {
        let mut parser = SseParser::new();
        let line = delta_line("split");
        let (a, b) = line.as_bytes().split_at(17);
        assert!(parser.feed(a).is_empty());
        assert_eq!(parser.feed(b), vec![SseEvent::Delta("split".to_string())]);
    }

    #[test]
    fn stops_at_done_marker() {
        let mut parser = SseParser::new();
        let input = format!("{}data: [DONE]\n\n{}", delta_line("a"), delta_line("late"));
        let events = parser.feed(input.as_bytes());
        assert_eq!(
            events,
            vec![SseEvent::Delta("a".to_string()), SseEvent::Done]
        );
        assert!(parser.is_done());
    }

    #[test]
    fn ignores_comments_and_empty_deltas() {
        let mut parser = SseParser::new();
        let input = ": keep-alive\n\ndata: {\"choices\":[{\"delta\":{}}]}\n\n";
        assert!(parser.feed(input.as_bytes()).is_empty());
    }

    #[test]
    fn handles_crlf_lines() {
        let mut parser = SseParser::new();
        let events = parser.feed(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\r\n\r\n",
        );
        assert_eq!(events, vec![SseEvent::Delta("x".to_string())]);
    }
}
