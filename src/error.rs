use thiserror::Error;

/// Terminal error code attached to an [`Expression`](crate::Expression).
///
/// At most one code is reported per expression, first condition wins across
/// the parse and validation stages. An expression with [`Error::Syntax`] has
/// no usable rule list; the other codes keep the rule list intact and only
/// gate evaluation.
#[derive(Clone, Debug, Error, Hash, PartialEq, Eq)]
pub enum Error {
    /// The input is not part of the tolerant grammar.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// The expression refers to public holidays but no holiday region is
    /// configured in the context.
    #[error("expression requires a holiday region")]
    MissingRegion,
    /// The expression refers to sun events but no location is configured in
    /// the context.
    #[error("expression requires a geographic location")]
    MissingLocation,
    /// Evaluation was attempted without a wall-clock reference. The core
    /// engine never produces this: instants are supplied by the caller.
    #[error("expression requires a local time source")]
    MissingLocalTime,
    /// The construct is recognized by the grammar but deliberately not
    /// implemented (school holidays, wrapping week ranges, periodic
    /// open-ended year ranges, open-ended single times).
    #[error("using an unsupported feature: {0}")]
    UnsupportedFeature(&'static str),
    /// The construct is only valid in the points-in-time mode, which this
    /// engine does not implement.
    #[error("expression is only valid in points-in-time mode")]
    IncompatibleMode,
}

pub type Result<T> = std::result::Result<T, Error>;
