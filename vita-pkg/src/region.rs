use std::fmt;

/// Region a title was released for, derived from its title ID prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Usa,
    Europe,
    Japan,
    Asia,
    Unknown,
}

const PREFIXES: &[(&[u8; 4], Region)] = &[
    (b"PCSE", Region::Usa),
    (b"PCSA", Region::Usa),
    (b"PCSF", Region::Europe),
    (b"PCSB", Region::Europe),
    (b"PCSC", Region::Japan),
    (b"VCJS", Region::Japan),
    (b"PCSG", Region::Japan),
    (b"VLJS", Region::Japan),
    (b"VLJM", Region::Japan),
    (b"VCAS", Region::Asia),
    (b"PCSH", Region::Asia),
    (b"VLAS", Region::Asia),
    (b"PCSD", Region::Asia),
];

impl Region {
    /// Classifies a title ID (e.g. `PCSE00001`) by its first four bytes.
    ///
    /// The match is exact and case-sensitive. IDs shorter than four bytes
    /// are [`Region::Unknown`].
    #[must_use]
    pub fn classify(title_id: &[u8]) -> Self {
        let Some(prefix) = title_id.first_chunk::<4>() else {
            return Self::Unknown;
        };

        PREFIXES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map_or(Self::Unknown, |&(_, region)| region)
    }

    /// Returns the label used in file names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Europe => "EUR",
            Self::Japan => "JPN",
            Self::Asia => "ASA",
            Self::Unknown => "unknown region",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
