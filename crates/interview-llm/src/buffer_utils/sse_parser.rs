use anyhow::Result;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;

use super::buffering::CircularLineBuffer;
use crate::StreamEvent;

/// Strategy pattern for parsing different SSE response types
pub trait SseLineParser: Send {
    /// Parse a data line into stream events
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>>;
    
    /// Check if this line signals end of stream
    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Payload of an SSE `data:` field, if the line carries one
/// 
/// Comments (`:`) and other fields (`event:`, `id:`, `retry:`) yield `None`.
fn data_field(line: &str) -> Option<&str> {
    let value = line.strip_prefix("data:")?;
    Some(value.strip_prefix(' ').unwrap_or(value).trim_end())
}

/// Generic SSE stream parser over any byte-chunk stream
/// 
/// Stops at the first error, at the parser's done marker, or when the
/// underlying stream closes.
pub fn parse_sse_stream<S, B, E, P>(
    byte_stream: S,
    parser: P,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
    P: SseLineParser + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);
        
        'chunks: loop {
            let next_chunk = byte_chunks.next().await;
            let (line_results, ended): (Vec<Result<String>>, bool) = match next_chunk {
                Some(Ok(bytes)) => {
                    buffer.extend(bytes.as_ref());
                    (std::iter::from_fn(|| buffer.next_line()).collect(), false)
                }
                Some(Err(e)) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break 'chunks;
                }
                // Provider closed the connection; flush an unterminated last line
                None => (buffer.take_remainder().into_iter().collect(), true),
            };
            
            for line_result in line_results {
                let line = match line_result {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        break 'chunks;
                    }
                };
                
                let Some(data) = data_field(&line) else {
                    continue;
                };
                
                if parser.is_done_marker(data) {
                    yield Ok(StreamEvent::Done { finish_reason: None });
                    break 'chunks;
                }
                
                match parser.parse_data_line(data) {
                    Ok(events) => {
                        for event in events {
                            yield Ok(event);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        break 'chunks;
                    }
                }
            }
            
            if ended {
                break 'chunks;
            }
        }
    })
}
