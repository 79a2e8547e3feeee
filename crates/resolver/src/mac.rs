use std::fmt::{Display, Formatter, Result as FmtResult};

/// A hardware address used as an opaque key.
///
/// Underscore-separated notation (`aa_bb_cc_dd_ee_ff`) is rewritten to the colon form so
/// both spellings address the same assignment. Nothing else is checked or changed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalizes a raw address string.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        Self(raw.replace('_', ":"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MacAddress {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<String> for MacAddress {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for MacAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscores_become_colons() {
        assert_eq!(
            MacAddress::normalize("aa_bb_cc_dd_ee_ff"),
            MacAddress::normalize("aa:bb:cc:dd:ee:ff")
        );
        assert_eq!(
            MacAddress::normalize("00_11_22_33_44_77").as_str(),
            "00:11:22:33:44:77"
        );
    }

    #[test]
    fn test_no_other_rewriting() {
        // case, dashes and garbage are kept verbatim
        assert_eq!(MacAddress::from("AA-BB-CC").as_str(), "AA-BB-CC");
        assert_eq!(MacAddress::from("not a mac_").as_str(), "not a mac:");
        assert_ne!(MacAddress::from("AA:BB"), MacAddress::from("aa:bb"));
    }
}
