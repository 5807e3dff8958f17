/// Domain layer for the weekly inventory export
///
/// Pure types and services with no network or filesystem access:
/// date windows, fetch history, column resolution and record flattening.
pub mod domain;
pub mod services;
