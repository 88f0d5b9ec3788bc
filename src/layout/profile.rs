use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::ExtractError;
use crate::core::model::FieldName;
use crate::metadata::season::ymd;

/// Report template generations with their own calibrated coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LayoutProfileId {
    Gen2015,
    Gen2016,
    Gen2017,
}

impl LayoutProfileId {
    pub const ALL: [LayoutProfileId; 3] = [
        LayoutProfileId::Gen2015,
        LayoutProfileId::Gen2016,
        LayoutProfileId::Gen2017,
    ];

    /// Template in use on `date`; undated reports get the newest template.
    pub fn for_date(date: Option<NaiveDate>) -> Self {
        let Some(date) = date else {
            return LayoutProfileId::Gen2017;
        };
        if date < ymd(2016, 9, 1) {
            LayoutProfileId::Gen2015
        } else if date < ymd(2017, 9, 1) {
            LayoutProfileId::Gen2016
        } else {
            LayoutProfileId::Gen2017
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutProfileId::Gen2015 => "gen2015",
            LayoutProfileId::Gen2016 => "gen2016",
            LayoutProfileId::Gen2017 => "gen2017",
        }
    }
}

/// Horizontal column range `[x_min, x_max]` owned by one field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldBand {
    pub field: FieldName,
    pub x_min: f32,
    pub x_max: f32,
}

impl FieldBand {
    pub const fn new(field: FieldName, x_min: f32, x_max: f32) -> Self {
        Self { field, x_min, x_max }
    }

    /// Bands are compared half-open so abutting columns do not overlap.
    pub fn overlaps(&self, other: &FieldBand) -> bool {
        self.x_min < other.x_max && other.x_min < self.x_max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutProfile {
    pub id: LayoutProfileId,
    pub anchor_marker: String,
    /// Left-to-right reading order.
    pub field_bands: Vec<FieldBand>,
    pub margin_above: f32,
    pub margin_below: f32,
}

impl LayoutProfile {
    pub fn for_id(id: LayoutProfileId) -> Self {
        use FieldName::*;
        let (bands, margin_above, margin_below) = match id {
            LayoutProfileId::Gen2015 => (
                vec![
                    FieldBand::new(Period, 20.0, 60.0),
                    FieldBand::new(Clock, 60.0, 100.0),
                    FieldBand::new(CallType, 100.0, 210.0),
                    FieldBand::new(Committing, 210.0, 350.0),
                    FieldBand::new(Disadvantaged, 350.0, 490.0),
                    FieldBand::new(Decision, 490.0, 550.0),
                ],
                4.0,
                21.0,
            ),
            LayoutProfileId::Gen2016 => (
                vec![
                    FieldBand::new(Period, 20.0, 60.0),
                    FieldBand::new(Clock, 60.0, 100.0),
                    FieldBand::new(CallType, 100.0, 210.0),
                    FieldBand::new(Committing, 210.0, 350.0),
                    FieldBand::new(Disadvantaged, 350.0, 490.0),
                    FieldBand::new(Decision, 490.0, 550.0),
                ],
                4.0,
                12.0,
            ),
            LayoutProfileId::Gen2017 => (
                vec![
                    FieldBand::new(Period, 20.0, 60.0),
                    FieldBand::new(Clock, 60.0, 100.0),
                    FieldBand::new(CallType, 100.0, 220.0),
                    FieldBand::new(Committing, 220.0, 360.0),
                    FieldBand::new(Disadvantaged, 360.0, 500.0),
                    FieldBand::new(Decision, 500.0, 560.0),
                ],
                0.0,
                20.0,
            ),
        };
        Self {
            id,
            anchor_marker: "Video".to_string(),
            field_bands: bands,
            margin_above,
            margin_below,
        }
    }

    pub fn band(&self, field: FieldName) -> Option<&FieldBand> {
        self.field_bands.iter().find(|b| b.field == field)
    }

    /// Vertical window `[lo, hi]` searched around an anchor at `y0`.
    pub fn window(&self, y0: f32) -> (f32, f32) {
        (y0 - self.margin_above, y0 + self.margin_below)
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        let invalid = |reason: String| ExtractError::InvalidProfile {
            profile: self.id.name().to_string(),
            reason,
        };

        if self.anchor_marker.trim().is_empty() {
            return Err(invalid("empty anchor marker".to_string()));
        }
        if self.margin_above < 0.0 || self.margin_below < 0.0 {
            return Err(invalid("negative vertical margin".to_string()));
        }
        for field in FieldName::ALL {
            let count = self.field_bands.iter().filter(|b| b.field == field).count();
            if count != 1 {
                return Err(invalid(format!("field {field:?} has {count} bands")));
            }
        }
        for band in &self.field_bands {
            if band.x_min >= band.x_max {
                return Err(invalid(format!("band {:?} is empty", band.field)));
            }
        }
        for (i, a) in self.field_bands.iter().enumerate() {
            for b in &self.field_bands[i + 1..] {
                if a.overlaps(b) {
                    let reason = format!("bands {:?} and {:?} overlap", a.field, b.field);
                    return Err(invalid(reason));
                }
                if b.x_min < a.x_min {
                    return Err(invalid(format!("band {:?} is out of reading order", b.field)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shipped_profiles_are_valid() {
        for id in LayoutProfileId::ALL {
            assert_eq!(LayoutProfile::for_id(id).validate(), Ok(()), "{id:?}");
        }
    }

    #[test]
    fn selects_profile_by_report_date() {
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        assert_eq!(LayoutProfileId::for_date(d(2015, 3, 1)), LayoutProfileId::Gen2015);
        assert_eq!(LayoutProfileId::for_date(d(2017, 4, 14)), LayoutProfileId::Gen2016);
        assert_eq!(LayoutProfileId::for_date(d(2018, 1, 2)), LayoutProfileId::Gen2017);
        assert_eq!(LayoutProfileId::for_date(None), LayoutProfileId::Gen2017);
    }

    #[test]
    fn windows_start_just_above_the_anchor_line() {
        let window = |id| LayoutProfile::for_id(id).window(100.0);
        assert_eq!(window(LayoutProfileId::Gen2015), (96.0, 121.0));
        assert_eq!(window(LayoutProfileId::Gen2016), (96.0, 112.0));
        assert_eq!(window(LayoutProfileId::Gen2017), (100.0, 120.0));
    }

    #[test]
    fn rejects_overlapping_bands() {
        let mut profile = LayoutProfile::for_id(LayoutProfileId::Gen2016);
        profile.field_bands[2].x_min = 80.0;
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("overlap"), "{err}");
    }

    #[test]
    fn rejects_missing_field() {
        let mut profile = LayoutProfile::for_id(LayoutProfileId::Gen2015);
        profile.field_bands.pop();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn abutting_bands_do_not_overlap() {
        let a = FieldBand::new(FieldName::Period, 20.0, 60.0);
        let b = FieldBand::new(FieldName::Clock, 60.0, 100.0);
        assert!(!a.overlaps(&b));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bands_of_every_profile_are_pairwise_disjoint(idx in 0usize..3) {
                let profile = LayoutProfile::for_id(LayoutProfileId::ALL[idx]);
                for (i, a) in profile.field_bands.iter().enumerate() {
                    for b in &profile.field_bands[i + 1..] {
                        prop_assert!(!a.overlaps(b));
                    }
                }
            }

            #[test]
            fn validate_catches_any_shifted_band(
                idx in 0usize..3,
                band in 1usize..6,
                shift in 1.0f32..30.0,
            ) {
                let mut profile = LayoutProfile::for_id(LayoutProfileId::ALL[idx]);
                profile.field_bands[band].x_min -= shift;
                prop_assert!(profile.validate().is_err());
            }
        }
    }
}
