//! Re-exports from either `regex` or `regex_lite`, depending on features.

#[cfg(feature = "lite")]
pub(crate) use regex_lite::{Regex, RegexBuilder, escape};
#[cfg(all(feature = "regex", not(feature = "lite")))]
pub(crate) use regex::{Regex, RegexBuilder, escape};

#[cfg(not(any(feature = "regex", feature = "lite")))]
compile_error!("agribib requires the \"regex\" or \"lite\" feature to be enabled");
