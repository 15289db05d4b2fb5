//! Integration scenarios for the NameID link store live under `tests/`.
