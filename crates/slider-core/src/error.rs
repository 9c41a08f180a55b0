use bstr::BString;

/// Errors raised while parsing diff text, slider records, or scorer specs.
///
/// Parse failures are recoverable: the outer iteration over file sections
/// logs them and continues. Violated structural invariants (an empty change
/// group, sliding outside the legal range) are programmer errors and panic
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("diff line not found in file section")]
    MissingDiffHeader,

    #[error("could not parse filename from {0:?}")]
    BadFilenameLine(BString),

    #[error("filename {0:?} is not safe for shell commands")]
    UnsafeFilename(BString),

    #[error("error parsing hunk header {0:?}")]
    BadHunkHeader(BString),

    #[error("expected hunk header, got {0:?}")]
    ExpectedHunkHeader(BString),

    #[error("empty diff body line")]
    EmptyDiffLine,

    #[error("unexpected diff body line prefix in {0:?}")]
    BadLinePrefix(BString),

    #[error("could not read slider record {0:?}")]
    BadRecord(String),

    #[error("{field} ({value:?}) is not an integer in record {record:?}")]
    BadRecordInteger {
        field: &'static str,
        value: String,
        record: String,
    },

    #[error("unknown scorer spec {0:?}")]
    BadScorerSpec(String),

    #[error("requested slider was not found")]
    SliderNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
