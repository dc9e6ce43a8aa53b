/// Preserved verbatim from the reference implementation's header; no
/// downstream contract confirming it is safe to bump was found, so it stays
/// byte-for-byte.
pub const VERSION: &str = "1.2.6-KUL-SuperMann";

pub fn version() -> &'static str {
    VERSION
}
