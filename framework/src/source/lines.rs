use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use super::{MessageSource, SourceError};

/// Reads one payload per line from an async reader. Blank lines are skipped
/// and end of input ends the source.
pub struct LineSource<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl LineSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MessageSource for LineSource<R> {
    async fn next_message(&mut self) -> Result<Option<Bytes>, SourceError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| SourceError::Receive(e.to_string()))?;

            match line {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(Bytes::from(line))),
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_non_blank_lines_then_ends() {
        let input: &[u8] = b"{\"a\":1}\n\n   \nnot json\r\n";
        let mut source = LineSource::new(input);

        assert_eq!(source.next_message().await.unwrap().unwrap(), "{\"a\":1}");
        assert_eq!(source.next_message().await.unwrap().unwrap(), "not json");
        assert!(source.next_message().await.unwrap().is_none());
    }
}
