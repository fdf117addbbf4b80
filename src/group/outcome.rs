/// What a completed child task handed back to the group.
///
/// The non-throwing flavor pins `ErrorType` to `std::convert::Infallible`,
/// which makes the `Error` arm statically unreachable without needing a
/// separate record type for each flavor.
pub(crate) enum Outcome<ValueType, ErrorType> {
    Value(ValueType),
    Error(ErrorType),
}

/// Result of the single critical section behind `next`/`poll_next`.
pub(crate) enum PollResult<ValueType, ErrorType> {
    Empty,
    Ready(Outcome<ValueType, ErrorType>),
    Waiting,
}
