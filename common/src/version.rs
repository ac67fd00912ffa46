use std::{fmt, str::FromStr};

/// Versions the editor offers out of the box.
pub const KNOWN_VERSIONS: &[ClientVersion] = &[
    ClientVersion(710),
    ClientVersion(740),
    ClientVersion(760),
    ClientVersion(860),
    ClientVersion(960),
    ClientVersion(1098),
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Empty client version")]
    Empty,
    #[error("Cannot parse client version: {version}")]
    Invalid { version: String },
}

/// Client version as a plain number, `8.60` is `860`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientVersion(pub u32);

impl ClientVersion {
    pub fn number(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ClientVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl FromStr for ClientVersion {
    type Err = VersionError;

    /// Accepts both `8.60` and `860`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let digits = s.replace('.', "");

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(VersionError::Invalid {
                version: s.to_string(),
            });
        }

        digits
            .parse::<u32>()
            .map(ClientVersion)
            .map_err(|_| VersionError::Invalid {
                version: s.to_string(),
            })
    }
}

impl fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_dotted() {
        assert_eq!("8.60".parse::<ClientVersion>(), Ok(ClientVersion(860)));
        assert_eq!("10.98".parse::<ClientVersion>(), Ok(ClientVersion(1098)));
        assert_eq!(" 7.40 ".parse::<ClientVersion>(), Ok(ClientVersion(740)));
    }

    #[test]
    fn parse_plain() {
        assert_eq!("960".parse::<ClientVersion>(), Ok(ClientVersion(960)));
    }

    #[test]
    fn parse_garbage() {
        assert_eq!("".parse::<ClientVersion>(), Err(VersionError::Empty));
        assert!(matches!(
            "8.6a".parse::<ClientVersion>(),
            Err(VersionError::Invalid { .. })
        ));
        assert!(matches!(
            "..".parse::<ClientVersion>(),
            Err(VersionError::Invalid { .. })
        ));
    }

    #[test]
    fn display_round_trip() {
        for version in KNOWN_VERSIONS {
            let s = version.to_string();
            assert_eq!(s.parse::<ClientVersion>().unwrap(), *version);
        }

        assert_eq!(ClientVersion(1098).to_string(), "10.98");
    }
}
