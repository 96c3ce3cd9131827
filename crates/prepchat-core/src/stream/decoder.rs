use serde::Deserialize;

use super::{LineBuffer, StreamEvent};

/// Event-line prefix of the wire format.
const EVENT_PREFIX: &str = "data: ";

/// Terminal line ending a stream with no further content.
const SENTINEL: &str = "data: [DONE]";

/// Per-fragment progress notification with the cumulative char count
/// consumed so far.
pub type ProgressHook = Box<dyn FnMut(usize) + Send>;

/// Structured event payload. Anything that fails to parse as this shape is
/// treated as raw literal text instead.
#[derive(Debug, Deserialize)]
struct EventPayload {
    content: String,
    #[serde(default, rename = "final")]
    is_final: bool,
}

/// Push-driven decoder for the chat wire stream.
///
/// Fed one transport fragment at a time via [`feed`](Self::feed); emits
/// [`StreamEvent`]s in wire order. One decoder instance serves exactly one
/// network call. A malformed frame never aborts the stream: the payload
/// falls back to raw text.
pub struct StreamDecoder {
    lines: LineBuffer,
    consumed: usize,
    finished: bool,
    on_progress: Option<ProgressHook>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            lines: LineBuffer::new(),
            consumed: 0,
            finished: false,
            on_progress: None,
        }
    }

    /// Creates a decoder that reports cumulative progress once per fragment.
    pub fn with_progress(hook: impl FnMut(usize) + Send + 'static) -> Self {
        let mut decoder = Self::new();
        decoder.on_progress = Some(Box::new(hook));
        decoder
    }

    /// Consumes one transport fragment and returns the events it completed.
    pub fn feed(&mut self, fragment: &str) -> Vec<StreamEvent> {
        self.consumed += fragment.chars().count();
        if let Some(hook) = self.on_progress.as_mut() {
            hook(self.consumed);
        }

        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        for line in self.lines.push(fragment) {
            if self.finished {
                break;
            }
            self.decode_line(&line, &mut events);
        }
        events
    }

    /// Signals end-of-stream: drains the carry buffer and decodes any final
    /// unterminated line by the same rules.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        if let Some(line) = self.lines.drain() {
            self.decode_line(&line, &mut events);
        }
        events
    }

    /// True once the terminal sentinel or a `final` event has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Cumulative chars consumed across all fragments.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn decode_line(&mut self, line: &str, out: &mut Vec<StreamEvent>) {
        let trimmed = line.trim();
        if trimmed == SENTINEL {
            self.finished = true;
            return;
        }
        // Non-event lines (keep-alives, comments) are ignored.
        let Some(payload) = trimmed.strip_prefix(EVENT_PREFIX) else {
            return;
        };

        match serde_json::from_str::<EventPayload>(payload) {
            Ok(parsed) => {
                if parsed.is_final {
                    self.finished = true;
                }
                if !parsed.content.trim().is_empty() {
                    out.push(StreamEvent {
                        text: parsed.content,
                        is_final: parsed.is_final,
                    });
                }
            }
            Err(_) => {
                // Raw-text fallback; a whitespace-only payload produces
                // no event.
                if !payload.trim().is_empty() {
                    out.push(StreamEvent {
                        text: payload.to_string(),
                        is_final: false,
                    });
                }
            }
        }
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn collect(decoder: &mut StreamDecoder, fragments: &[&str]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        for fragment in fragments {
            events.extend(decoder.feed(fragment));
        }
        events.extend(decoder.finish());
        events
    }

    fn texts(events: &[StreamEvent]) -> Vec<&str> {
        events.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_events_preserve_wire_order() {
        let mut decoder = StreamDecoder::new();
        let events = collect(
            &mut decoder,
            &["data: one\ndata: two\n", "data: three\ndata: [DONE]\n"],
        );
        assert_eq!(texts(&events), vec!["one", "two", "three"]);
        assert!(decoder.is_finished());
    }

    #[test]
    fn test_structured_payloads_are_decoded() {
        let mut decoder = StreamDecoder::new();
        let events = collect(
            &mut decoder,
            &["data: {\"content\":\"Hello\"}\ndata: {\"content\":\" world\",\"final\":true}\n"],
        );
        assert_eq!(
            events,
            vec![
                StreamEvent {
                    text: "Hello".to_string(),
                    is_final: false
                },
                StreamEvent {
                    text: " world".to_string(),
                    is_final: true
                },
            ]
        );
        assert!(decoder.is_finished());
    }

    #[test]
    fn test_malformed_frame_falls_back_to_raw_text() {
        let mut decoder = StreamDecoder::new();
        let events = collect(&mut decoder, &["data: {not json\n"]);
        assert_eq!(
            events,
            vec![StreamEvent {
                text: "{not json".to_string(),
                is_final: false
            }]
        );
    }

    #[test]
    fn test_non_event_lines_are_ignored() {
        let mut decoder = StreamDecoder::new();
        let events = collect(
            &mut decoder,
            &[": keep-alive\nevent: ping\n\ndata: real\n"],
        );
        assert_eq!(texts(&events), vec!["real"]);
    }

    #[test]
    fn test_whitespace_only_payload_produces_no_event() {
        let mut decoder = StreamDecoder::new();
        let events = collect(
            &mut decoder,
            &["data:   \ndata: {\"content\":\"  \"}\ndata: ok\n"],
        );
        assert_eq!(texts(&events), vec!["ok"]);
    }

    #[test]
    fn test_no_events_after_sentinel() {
        let mut decoder = StreamDecoder::new();
        let events = collect(&mut decoder, &["data: a\ndata: [DONE]\ndata: late\n"]);
        assert_eq!(texts(&events), vec!["a"]);

        // Fragments fed after the sentinel are ignored too.
        assert!(decoder.feed("data: later\n").is_empty());
    }

    #[test]
    fn test_final_flag_with_empty_content_terminates_silently() {
        let mut decoder = StreamDecoder::new();
        let events = collect(
            &mut decoder,
            &["data: {\"content\":\"\",\"final\":true}\ndata: late\n"],
        );
        assert!(events.is_empty());
        assert!(decoder.is_finished());
    }

    #[test]
    fn test_lines_split_across_fragments() {
        let wire = "data: first chunk\ndata: second chunk\ndata: [DONE]\n";
        let expected = vec!["first chunk", "second chunk"];

        // Any split point must decode identically.
        for split in 0..=wire.len() {
            let mut decoder = StreamDecoder::new();
            let events = collect(&mut decoder, &[&wire[..split], &wire[split..]]);
            assert_eq!(texts(&events), expected, "split at byte {split}");
        }
    }

    #[test]
    fn test_finish_recovers_unterminated_line() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed("data: no trailing newline").is_empty());
        let events = decoder.finish();
        assert_eq!(texts(&events), vec!["no trailing newline"]);
    }

    #[test]
    fn test_progress_fires_once_per_fragment_with_cumulative_count() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut decoder = StreamDecoder::with_progress(move |n| {
            sink.lock().expect("poisoned").push(n);
        });

        decoder.feed("data: ab\n"); // 9 chars
        decoder.feed("data: cd\n"); // 9 more

        assert_eq!(*seen.lock().expect("poisoned"), vec![9, 18]);
        assert_eq!(decoder.consumed(), 18);
    }
}
