use usage_client::domain::{
    ActivityLevel, ClassificationResult, Color, RegularityLevel, Status, UsageRecord,
};

/// Pure classification of an active score against the household's norm bounds.
///
/// Rules, first match wins:
/// - score == 0.0 is "no data" and yields Unknown, whatever the bounds.
/// - score <= low is Abnormal.
/// - low < score <= norm is Low.
/// - norm < score <= high is Active.
/// - score > high is High.
///
/// Bounds are not checked for ordering. NaN matches no bracket and falls
/// through to Unknown.
pub fn classify_activity(score: f64, low: f64, norm: f64, high: f64) -> (ActivityLevel, Color) {
    if score == 0.0 {
        (ActivityLevel::Unknown, Color::Gray)
    } else if score <= low {
        (ActivityLevel::Abnormal, Color::Red)
    } else if low < score && score <= norm {
        (ActivityLevel::Low, Color::Yellow)
    } else if norm < score && score <= high {
        (ActivityLevel::Active, Color::Blue)
    } else if score > high {
        (ActivityLevel::High, Color::Green)
    } else {
        (ActivityLevel::Unknown, Color::Gray)
    }
}

/// Pure classification of the usage pattern's correlation coefficient.
///
/// Rules, first match wins:
/// - 0.0 is "no data" and yields Unknown.
/// - below 0.30 is Abnormal.
/// - [0.30, 0.50) is Low.
/// - [0.50, 0.70) is Normal.
/// - 0.70 and above is High.
pub fn classify_regularity(corr_coef: f64) -> (RegularityLevel, Color) {
    if corr_coef == 0.0 {
        (RegularityLevel::Unknown, Color::Gray)
    } else if corr_coef < 0.30 {
        (RegularityLevel::Abnormal, Color::Red)
    } else if (0.30..0.50).contains(&corr_coef) {
        (RegularityLevel::Low, Color::Yellow)
    } else if (0.50..0.70).contains(&corr_coef) {
        (RegularityLevel::Normal, Color::Blue)
    } else if corr_coef >= 0.70 {
        (RegularityLevel::High, Color::Green)
    } else {
        (RegularityLevel::Unknown, Color::Gray)
    }
}

/// Composite status: the weaker of activity and regularity.
///
/// Unknown on either side short-circuits to Unknown. Otherwise both levels are
/// mapped to their numeric rank and the minimum rank picks the status, so an
/// Active household with Normal regularity reports Normal.
pub fn classify_status(activity: ActivityLevel, regularity: RegularityLevel) -> (Status, Color) {
    let (Some(a), Some(r)) = (activity.rank(), regularity.rank()) else {
        return (Status::Unknown, Color::Gray);
    };

    match a.min(r) {
        1 => (Status::Attention, Color::Red),
        2 => (Status::Normal, Color::Yellow),
        3 => (Status::Normal, Color::Blue),
        4 => (Status::Active, Color::Blue),
        5 => (Status::High, Color::Green),
        _ => (Status::Unknown, Color::Gray),
    }
}

/// Run all three classifications over one normalized record.
pub fn classify_record(record: &UsageRecord) -> ClassificationResult {
    let activity = classify_activity(
        record.active_score,
        record.low_norm,
        record.norm_score,
        record.high_norm,
    );
    let regularity = classify_regularity(record.corr_coef);
    let status = classify_status(activity.0, regularity.0);

    ClassificationResult {
        activity: activity.into(),
        regularity: regularity.into(),
        status: status.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_score_is_unknown_for_any_bounds() {
        for (low, norm, high) in [(0.0, 0.0, 0.0), (0.2, 0.5, 0.8), (-1.0, 0.0, 1.0), (5.0, 1.0, -3.0)] {
            assert_eq!(
                classify_activity(0.0, low, norm, high),
                (ActivityLevel::Unknown, Color::Gray)
            );
        }
    }

    #[test]
    fn activity_boundaries_belong_to_lower_bracket() {
        let (low, norm, high) = (0.2, 0.5, 0.8);
        assert_eq!(classify_activity(0.2, low, norm, high), (ActivityLevel::Abnormal, Color::Red));
        assert_eq!(classify_activity(0.5, low, norm, high), (ActivityLevel::Low, Color::Yellow));
        assert_eq!(classify_activity(0.8, low, norm, high), (ActivityLevel::Active, Color::Blue));
        assert_eq!(classify_activity(0.81, low, norm, high), (ActivityLevel::High, Color::Green));
        assert_eq!(classify_activity(-0.4, low, norm, high), (ActivityLevel::Abnormal, Color::Red));
    }

    #[test]
    fn activity_sweep_hits_every_bracket_in_order() {
        let (low, norm, high) = (0.2, 0.5, 0.8);
        let mut seen = Vec::new();
        for i in 1..=120 {
            let score = i as f64 / 100.0;
            let (level, _) = classify_activity(score, low, norm, high);
            assert_ne!(level, ActivityLevel::Unknown, "score {score} fell through");
            if seen.last() != Some(&level) {
                seen.push(level);
            }
        }
        assert_eq!(
            seen,
            vec![
                ActivityLevel::Abnormal,
                ActivityLevel::Low,
                ActivityLevel::Active,
                ActivityLevel::High
            ]
        );
    }

    #[test]
    fn degenerate_bounds_keep_first_match_order() {
        // low == norm == high: nothing lands in Low or Active.
        assert_eq!(classify_activity(0.5, 0.5, 0.5, 0.5), (ActivityLevel::Abnormal, Color::Red));
        assert_eq!(classify_activity(0.6, 0.5, 0.5, 0.5), (ActivityLevel::High, Color::Green));
        assert_eq!(classify_activity(0.1, 0.0, 0.0, 0.0), (ActivityLevel::High, Color::Green));
        assert_eq!(classify_activity(-0.1, 0.0, 0.0, 0.0), (ActivityLevel::Abnormal, Color::Red));
    }

    #[test]
    fn nan_score_is_unknown() {
        assert_eq!(
            classify_activity(f64::NAN, 0.2, 0.5, 0.8),
            (ActivityLevel::Unknown, Color::Gray)
        );
        assert_eq!(classify_regularity(f64::NAN), (RegularityLevel::Unknown, Color::Gray));
    }

    #[test]
    fn regularity_brackets() {
        assert_eq!(classify_regularity(0.0), (RegularityLevel::Unknown, Color::Gray));
        assert_eq!(classify_regularity(0.29), (RegularityLevel::Abnormal, Color::Red));
        assert_eq!(classify_regularity(-0.5), (RegularityLevel::Abnormal, Color::Red));
        assert_eq!(classify_regularity(0.30), (RegularityLevel::Low, Color::Yellow));
        assert_eq!(classify_regularity(0.499), (RegularityLevel::Low, Color::Yellow));
        assert_eq!(classify_regularity(0.50), (RegularityLevel::Normal, Color::Blue));
        assert_eq!(classify_regularity(0.699), (RegularityLevel::Normal, Color::Blue));
        assert_eq!(classify_regularity(0.70), (RegularityLevel::High, Color::Green));
        assert_eq!(classify_regularity(1.5), (RegularityLevel::High, Color::Green));
    }

    #[test]
    fn unknown_short_circuits_status_on_either_side() {
        assert_eq!(
            classify_status(ActivityLevel::Unknown, RegularityLevel::High),
            (Status::Unknown, Color::Gray)
        );
        assert_eq!(
            classify_status(ActivityLevel::High, RegularityLevel::Unknown),
            (Status::Unknown, Color::Gray)
        );
    }

    #[test]
    fn status_is_the_weakest_link() {
        assert_eq!(
            classify_status(ActivityLevel::Abnormal, RegularityLevel::High),
            (Status::Attention, Color::Red)
        );
        assert_eq!(
            classify_status(ActivityLevel::Active, RegularityLevel::Normal),
            (Status::Normal, Color::Blue)
        );
        assert_eq!(
            classify_status(ActivityLevel::Active, RegularityLevel::High),
            (Status::Active, Color::Blue)
        );
        assert_eq!(
            classify_status(ActivityLevel::High, RegularityLevel::Low),
            (Status::Normal, Color::Yellow)
        );
        assert_eq!(
            classify_status(ActivityLevel::High, RegularityLevel::High),
            (Status::High, Color::Green)
        );
    }

    #[test]
    fn record_classification_end_to_end() {
        let record = UsageRecord {
            active_score: 0.45,
            low_norm: 0.2,
            norm_score: 0.5,
            high_norm: 0.8,
            corr_coef: 0.65,
            ..UsageRecord::default()
        };

        let result = classify_record(&record);
        assert_eq!(result.activity.level, ActivityLevel::Low);
        assert_eq!(result.activity.color, Color::Yellow);
        assert_eq!(result.regularity.level, RegularityLevel::Normal);
        assert_eq!(result.regularity.color, Color::Blue);
        assert_eq!(result.status.level, Status::Normal);
        assert_eq!(result.status.color, Color::Yellow);
    }

    #[test]
    fn zeroed_record_is_unknown_everywhere() {
        let result = classify_record(&UsageRecord::default());
        assert_eq!(result.activity.level, ActivityLevel::Unknown);
        assert_eq!(result.regularity.level, RegularityLevel::Unknown);
        assert_eq!(result.status.level, Status::Unknown);
        assert_eq!(result.status.color, Color::Gray);
    }
}
