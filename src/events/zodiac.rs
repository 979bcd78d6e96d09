//! Zodiac placement of the sun and moon.
//!
//! Signs are assigned astronomically, by ecliptic longitude in 30° bands
//! from the March equinox point, not by astrological calendar dates.

use chrono::{DateTime, Utc};

use crate::ephemeris::moon;
use crate::solver::solar_longitude;

/// The twelve zodiac signs in ecliptic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Sign containing an ecliptic longitude in degrees.
    pub fn from_longitude_deg(longitude: f64) -> Self {
        let band = (longitude.rem_euclid(360.0) / 30.0) as usize;
        match band {
            0 => Self::Aries,
            1 => Self::Taurus,
            2 => Self::Gemini,
            3 => Self::Cancer,
            4 => Self::Leo,
            5 => Self::Virgo,
            6 => Self::Libra,
            7 => Self::Scorpio,
            8 => Self::Sagittarius,
            9 => Self::Capricorn,
            10 => Self::Aquarius,
            _ => Self::Pisces,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Aries => "♈",
            Self::Taurus => "♉",
            Self::Gemini => "♊",
            Self::Cancer => "♋",
            Self::Leo => "♌",
            Self::Virgo => "♍",
            Self::Libra => "♎",
            Self::Scorpio => "♏",
            Self::Sagittarius => "♐",
            Self::Capricorn => "♑",
            Self::Aquarius => "♒",
            Self::Pisces => "♓",
        }
    }
}

/// Sign the sun occupies at an instant.
pub fn sun_sign(at: DateTime<Utc>) -> ZodiacSign {
    ZodiacSign::from_longitude_deg(solar_longitude(at))
}

/// Sign the moon occupies at an instant.
pub fn moon_sign(at: DateTime<Utc>) -> ZodiacSign {
    ZodiacSign::from_longitude_deg(moon::ecliptic_longitude_deg(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn longitude_bands_map_in_order() {
        assert_eq!(ZodiacSign::from_longitude_deg(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude_deg(29.9), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude_deg(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude_deg(185.0), ZodiacSign::Libra);
        assert_eq!(ZodiacSign::from_longitude_deg(359.9), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude_deg(360.0), ZodiacSign::Aries);
    }

    #[test]
    fn sun_enters_aries_at_the_march_equinox() {
        let just_after = Utc.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap();
        assert_eq!(sun_sign(just_after), ZodiacSign::Aries);

        let midsummer = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        assert_eq!(sun_sign(midsummer), ZodiacSign::Cancer);
    }
}
