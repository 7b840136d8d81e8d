//! Page identifiers

use std::fmt;
use std::str::FromStr;

use crate::error::WarpError;

/// The six pages of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageId {
    #[default]
    Home,
    CoRobimy,
    Webfabrikk,
    Geneza,
    Dlaczego,
    Wspolpraca,
}

impl PageId {
    /// Navigation order
    pub const ALL: [PageId; 6] = [
        PageId::Home,
        PageId::CoRobimy,
        PageId::Webfabrikk,
        PageId::Geneza,
        PageId::Dlaczego,
        PageId::Wspolpraca,
    ];

    /// Id used in `data-nav` / `data-page` attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Home => "home",
            PageId::CoRobimy => "co-robimy",
            PageId::Webfabrikk => "webfabrikk",
            PageId::Geneza => "geneza",
            PageId::Dlaczego => "dlaczego",
            PageId::Wspolpraca => "wspolpraca",
        }
    }

    /// HUD navigation label
    pub fn nav_label(&self) -> &'static str {
        match self {
            PageId::Home => "BAZA",
            PageId::CoRobimy => "MISJA",
            PageId::Webfabrikk => "POCHODZENIE",
            PageId::Geneza => "GENEZA",
            PageId::Dlaczego => "CEL",
            PageId::Wspolpraca => "SOJUSZ",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageId {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PageId::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| WarpError::UnknownPage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_values() {
        assert_eq!("co-robimy".parse::<PageId>().unwrap(), PageId::CoRobimy);
        assert_eq!(" wspolpraca ".parse::<PageId>().unwrap(), PageId::Wspolpraca);
        assert_eq!(PageId::Webfabrikk.to_string(), "webfabrikk");
        assert_eq!(PageId::Dlaczego.nav_label(), "CEL");
    }

    #[test]
    fn test_unknown_id() {
        let err = "kontakt".parse::<PageId>().unwrap_err();
        assert!(matches!(err, WarpError::UnknownPage(ref id) if id == "kontakt"));
        assert!("HOME".parse::<PageId>().is_err());
    }
}
