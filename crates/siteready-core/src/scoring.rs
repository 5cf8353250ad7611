//! Axis scores, letter grades and the tier decision

use crate::answerability::AnswerabilityMatch;
use crate::types::{Answerability, AuditGrades, AuditScores, Grade, SiteSignals, Tier};

/// Page coverage at which an answerability category earns full marks
pub const FULL_COVERAGE_RATE: f64 = 0.35;
const CATEGORY_POINTS: f64 = 25.0;
/// Ceiling on the category sum before the homepage bonus is added
const AI_BASE_CAP: f64 = 94.0;
const HOMEPAGE_BONUS: f64 = 3.0;

/// Compute all scores. `homepage` is the classification of the homepage
/// text, when the homepage was scanned and fetched.
pub fn compute_scores(signals: &SiteSignals, homepage: Option<AnswerabilityMatch>) -> AuditScores {
    let ai_readiness = ai_readiness_score(&signals.answerability, homepage);
    AuditScores {
        ai_readiness,
        structure: structure_score(signals),
        content_depth: content_depth_score(signals),
        technical_readiness: technical_readiness_score(signals),
        // Headline metric is AI readiness; the other axes do not feed it
        overall: ai_readiness,
    }
}

pub fn ai_readiness_score(
    answerability: &Answerability,
    homepage: Option<AnswerabilityMatch>,
) -> u8 {
    let category = |fraction: f64| (fraction / FULL_COVERAGE_RATE).min(1.0) * CATEGORY_POINTS;

    let base = category(answerability.what_rate)
        + category(answerability.who_rate)
        + category(answerability.how_rate)
        + category(answerability.trust_rate);

    let bonus = homepage.map_or(0.0, |home| {
        let mut bonus = 0.0;
        if home.what {
            bonus += HOMEPAGE_BONUS;
        }
        if home.how {
            bonus += HOMEPAGE_BONUS;
        }
        bonus
    });

    clamp_score(base.min(AI_BASE_CAP) + bonus)
}

pub fn structure_score(signals: &SiteSignals) -> u8 {
    clamp_score(40.0 * signals.title_rate + 35.0 * signals.h1_rate + 25.0 * signals.meta_rate)
}

pub fn content_depth_score(signals: &SiteSignals) -> u8 {
    let length_points = match signals.avg_text_length {
        len if len >= 6000.0 => 75.0,
        len if len >= 2500.0 => 55.0,
        len if len >= 1200.0 => 40.0,
        _ => 20.0,
    };
    let heading_points = match signals.avg_h2_count {
        h2 if h2 >= 6.0 => 25.0,
        h2 if h2 >= 3.0 => 15.0,
        h2 if h2 >= 1.0 => 5.0,
        _ => 0.0,
    };
    clamp_score(length_points + heading_points)
}

pub fn technical_readiness_score(signals: &SiteSignals) -> u8 {
    clamp_score(
        45.0 * signals.json_ld_rate
            + 30.0 * signals.canonical_rate
            + 25.0 * (1.0 - signals.error_rate),
    )
}

/// Round to the nearest integer and clamp into `0..=100`.
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

pub fn grade(score: u8) -> Grade {
    match score {
        100.. => Grade::APlus,
        90..=99 => Grade::A,
        80..=89 => Grade::B,
        70..=79 => Grade::C,
        60..=69 => Grade::D,
        _ => Grade::F,
    }
}

pub fn grade_all(scores: &AuditScores) -> AuditGrades {
    AuditGrades {
        ai_readiness: grade(scores.ai_readiness),
        structure: grade(scores.structure),
        content_depth: grade(scores.content_depth),
        technical_readiness: grade(scores.technical_readiness),
        overall: grade(scores.overall),
    }
}

/// Tier from grades alone.
///
/// Gold needs an A-range overall, or a B overall with neither technical
/// readiness nor content depth failing. Remaining B and C overalls are Silver.
pub fn classify_tier(grades: &AuditGrades) -> Tier {
    let systems_sound =
        !grades.technical_readiness.is_failing() && !grades.content_depth.is_failing();

    match grades.overall {
        Grade::APlus | Grade::A => Tier::Gold,
        Grade::B if systems_sound => Tier::Gold,
        Grade::B | Grade::C => Tier::Silver,
        Grade::D | Grade::F => Tier::Bronze,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answerability(rate: f64) -> Answerability {
        Answerability {
            what_rate: rate,
            who_rate: rate,
            how_rate: rate,
            trust_rate: rate,
        }
    }

    fn grades(overall: Grade, technical: Grade, content: Grade) -> AuditGrades {
        AuditGrades {
            ai_readiness: overall,
            structure: Grade::A,
            content_depth: content,
            technical_readiness: technical,
            overall,
        }
    }

    #[test]
    fn ai_readiness_caps_before_homepage_bonus() {
        assert_eq!(ai_readiness_score(&answerability(1.0), None), 94);
        assert_eq!(ai_readiness_score(&answerability(0.35), None), 94);

        let home = AnswerabilityMatch {
            what: true,
            how: true,
            ..Default::default()
        };
        assert_eq!(ai_readiness_score(&answerability(1.0), Some(home)), 100);

        let what_only = AnswerabilityMatch {
            what: true,
            ..Default::default()
        };
        assert_eq!(ai_readiness_score(&answerability(1.0), Some(what_only)), 97);
    }

    #[test]
    fn ai_readiness_scales_partial_coverage() {
        let partial = Answerability {
            what_rate: 0.07, // a fifth of full coverage
            ..Default::default()
        };
        assert_eq!(ai_readiness_score(&partial, None), 5);
        assert_eq!(ai_readiness_score(&Answerability::default(), None), 0);

        let home = AnswerabilityMatch {
            how: true,
            trust: true,
            ..Default::default()
        };
        assert_eq!(ai_readiness_score(&Answerability::default(), Some(home)), 3);
    }

    #[test]
    fn structure_and_technical_formulas() {
        let signals = SiteSignals {
            title_rate: 1.0,
            h1_rate: 0.5,
            meta_rate: 0.0,
            json_ld_rate: 0.5,
            canonical_rate: 1.0,
            error_rate: 0.5,
            ..Default::default()
        };
        assert_eq!(structure_score(&signals), 58); // 40 + 17.5
        assert_eq!(technical_readiness_score(&signals), 65); // 22.5 + 30 + 12.5
    }

    #[test]
    fn content_depth_steps() {
        let depth = |avg_text_length, avg_h2_count| {
            content_depth_score(&SiteSignals {
                avg_text_length,
                avg_h2_count,
                ..Default::default()
            })
        };
        assert_eq!(depth(6000.0, 6.0), 100);
        assert_eq!(depth(2500.0, 3.0), 70);
        assert_eq!(depth(1200.0, 1.0), 45);
        assert_eq!(depth(1199.0, 0.9), 20);
        assert_eq!(depth(0.0, 0.0), 20);
    }

    #[test]
    fn overall_follows_ai_readiness() {
        let signals = SiteSignals {
            title_rate: 1.0,
            h1_rate: 1.0,
            meta_rate: 1.0,
            answerability: answerability(0.1),
            ..Default::default()
        };
        let scores = compute_scores(&signals, None);
        assert_eq!(scores.overall, scores.ai_readiness);
        assert_eq!(scores.structure, 100);
    }

    #[test]
    fn scores_are_clamped() {
        assert_eq!(clamp_score(-5.0), 0);
        assert_eq!(clamp_score(140.2), 100);
        assert_eq!(clamp_score(89.5), 90);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn grade_breakpoints() {
        assert_eq!(grade(100), Grade::APlus);
        assert_eq!(grade(99), Grade::A);
        assert_eq!(grade(90), Grade::A);
        assert_eq!(grade(89), Grade::B);
        assert_eq!(grade(80), Grade::B);
        assert_eq!(grade(70), Grade::C);
        assert_eq!(grade(60), Grade::D);
        assert_eq!(grade(59), Grade::F);
        assert_eq!(grade(0), Grade::F);
    }

    #[test]
    fn grade_is_monotonic() {
        for high in 0..=100u8 {
            for low in 0..=high {
                assert!(grade(high) >= grade(low), "grade({high}) < grade({low})");
            }
        }
    }

    #[test]
    fn tier_rules() {
        assert_eq!(classify_tier(&grades(Grade::APlus, Grade::F, Grade::F)), Tier::Gold);
        assert_eq!(classify_tier(&grades(Grade::A, Grade::D, Grade::C)), Tier::Gold);
        assert_eq!(classify_tier(&grades(Grade::B, Grade::C, Grade::C)), Tier::Gold);
        assert_eq!(classify_tier(&grades(Grade::B, Grade::D, Grade::A)), Tier::Silver);
        assert_eq!(classify_tier(&grades(Grade::B, Grade::A, Grade::F)), Tier::Silver);
        assert_eq!(classify_tier(&grades(Grade::C, Grade::A, Grade::A)), Tier::Silver);
        assert_eq!(classify_tier(&grades(Grade::D, Grade::A, Grade::A)), Tier::Bronze);
        assert_eq!(classify_tier(&grades(Grade::F, Grade::APlus, Grade::APlus)), Tier::Bronze);
    }

    #[test]
    fn tier_depends_only_on_grades() {
        let low = AuditScores {
            ai_readiness: 80,
            structure: 80,
            content_depth: 70,
            technical_readiness: 70,
            overall: 80,
        };
        let high = AuditScores {
            ai_readiness: 89,
            structure: 88,
            content_depth: 79,
            technical_readiness: 79,
            overall: 89,
        };
        assert_eq!(grade_all(&low), grade_all(&high));
        assert_eq!(classify_tier(&grade_all(&low)), classify_tier(&grade_all(&high)));
    }
}
