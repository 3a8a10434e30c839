type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum DemuxError {
    #[error("Failed to read line {line} from the producer: {source}")]
    Read {
        line: usize,
        #[source]
        source: BoxError,
    },

    #[error("Failed to write to the {sink} sink: {source}")]
    Write {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl DemuxError {
    pub fn read(line: usize, source: impl Into<BoxError>) -> Self {
        Self::Read {
            line,
            source: source.into(),
        }
    }

    pub fn write(sink: &'static str, source: std::io::Error) -> Self {
        Self::Write { sink, source }
    }
}
