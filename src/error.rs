//! Error kinds for scanning, parsing, and ingestion.
//!
//! All of these are per-call or per-record failures: the splitter and the
//! ingester collect them and keep going, they never abort a run.

use thiserror::Error;

/// A failure while locating annotation calls in source text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// An annotation call's argument list never closed before end of input.
    /// The call is abandoned and scanning resumes at the next token.
    #[error("unterminated `{kind}` annotation at offset {offset}: argument list never closes")]
    MalformedCallSpan { kind: String, offset: usize },

    /// Begin/end markers were present but inconsistent (end before begin,
    /// or the block runs to the end of the buffer). Treated as "no marker
    /// block found"; reported so the caller can see why nothing was excised.
    #[error("marker block ignored: {reason}")]
    MalformedMarkerBlock { reason: String },
}

/// A failure turning one annotation call's argument text into a record.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The argument text is not valid quasi-JSON after normalization.
    #[error("`{kind}` annotation is not valid quasi-JSON ({source})")]
    ParameterParse {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The argument parsed, but does not have the shape of a record
    /// (e.g. missing `name`, or not an object at all).
    #[error("`{kind}` annotation is not a valid record: {source}")]
    InvalidRecord {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
