use serde::Serialize;

/// Heat map band for a daily probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    None,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl SeverityBand {
    pub const ALL: [SeverityBand; 5] = [
        SeverityBand::None,
        SeverityBand::Low,
        SeverityBand::Moderate,
        SeverityBand::High,
        SeverityBand::VeryHigh,
    ];

    /// `0` is its own band; the rest are right-closed quarters of `(0, 100]`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage <= 0.0 {
            SeverityBand::None
        } else if percentage <= 25.0 {
            SeverityBand::Low
        } else if percentage <= 50.0 {
            SeverityBand::Moderate
        } else if percentage <= 75.0 {
            SeverityBand::High
        } else {
            SeverityBand::VeryHigh
        }
    }

    pub fn index(self) -> u8 {
        match self {
            SeverityBand::None => 0,
            SeverityBand::Low => 1,
            SeverityBand::Moderate => 2,
            SeverityBand::High => 3,
            SeverityBand::VeryHigh => 4,
        }
    }

    pub fn background_rgb(self) -> (u8, u8, u8) {
        match self {
            SeverityBand::None => (0xf9, 0xfa, 0xfb),
            SeverityBand::Low => (0xfe, 0xca, 0xca),
            SeverityBand::Moderate => (0xf8, 0x71, 0x71),
            SeverityBand::High => (0xef, 0x44, 0x44),
            SeverityBand::VeryHigh => (0xdc, 0x26, 0x26),
        }
    }

    pub fn text_rgb(self) -> (u8, u8, u8) {
        match self {
            SeverityBand::None | SeverityBand::Low => (0x37, 0x41, 0x51),
            _ => (0xff, 0xff, 0xff),
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            SeverityBand::None => "0%",
            SeverityBand::Low => "1-25%",
            SeverityBand::Moderate => "26-50%",
            SeverityBand::High => "51-75%",
            SeverityBand::VeryHigh => "75%+",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_right_closed() {
        let test_cases = vec![
            (0.0, SeverityBand::None),
            (0.001, SeverityBand::Low),
            (25.0, SeverityBand::Low),
            (25.0001, SeverityBand::Moderate),
            (50.0, SeverityBand::Moderate),
            (50.5, SeverityBand::High),
            (75.0, SeverityBand::High),
            (75.1, SeverityBand::VeryHigh),
            (100.0, SeverityBand::VeryHigh),
        ];

        for (percentage, expected) in test_cases {
            let band = SeverityBand::from_percentage(percentage);
            assert_eq!(
                band, expected,
                "Expected {:?} for {}%, but got {:?}",
                expected, percentage, band
            );
        }
    }

    #[test]
    fn colors_match_the_legend() {
        assert_eq!(SeverityBand::None.background_rgb(), (0xf9, 0xfa, 0xfb));
        assert_eq!(SeverityBand::Low.background_rgb(), (0xfe, 0xca, 0xca));
        assert_eq!(SeverityBand::Moderate.background_rgb(), (0xf8, 0x71, 0x71));
        assert_eq!(SeverityBand::High.background_rgb(), (0xef, 0x44, 0x44));
        assert_eq!(SeverityBand::VeryHigh.background_rgb(), (0xdc, 0x26, 0x26));
    }

    #[test]
    fn indices_follow_band_order() {
        let indices: Vec<u8> = SeverityBand::ALL.iter().map(|b| b.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }
}
