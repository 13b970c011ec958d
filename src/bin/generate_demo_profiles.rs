use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use readcoach::annotate::{AnnotatedPassage, HighlightColor, TextRange};
use readcoach::annotate::persist::SavedHighlights;
use readcoach::auth::User;
use readcoach::curriculum::{Curriculum, Question, Week};
use readcoach::engine::SkillCategory;
use readcoach::engine::xp::XpState;
use readcoach::progress::{Attempt, Mistake};
use readcoach::store::export::{EXPORT_VERSION, UserExport};

const OUT_DIR: &str = "demo-profiles";

// ── Helpers ──────────────────────────────────────────────────────────────

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Epoch ms for the `n`th answer of day `day`, two minutes apart.
fn attempt_timestamp(day: u32, n: u32) -> i64 {
    let at = base_time() + chrono::Duration::days(day as i64) + chrono::Duration::seconds(n as i64 * 120);
    at.timestamp_millis()
}

fn date(day: u32) -> NaiveDate {
    base_time().date_naive() + chrono::Duration::days(day as i64)
}

/// Answer every question of a week. `wrong` decides which ones miss.
fn answer_week(
    week: &Week,
    day: u32,
    wrong: impl Fn(&Question) -> bool,
    history: &mut Vec<Attempt>,
    mistakes: &mut Vec<Mistake>,
) {
    // Free-text paraphrases are never logged.
    for (n, question) in week.questions().filter(|q| q.is_multiple_choice()).enumerate() {
        let timestamp = attempt_timestamp(day, n as u32);
        let is_correct = !wrong(question);
        history.push(Attempt {
            week_id: week.id,
            question_id: question.id.clone(),
            is_correct,
            timestamp,
        });
        if !is_correct {
            mistakes.push(Mistake {
                week_id: week.id,
                question_id: question.id.clone(),
                timestamp,
            });
        }
    }
}

/// Highlight the first `chars` characters of the opening paragraph.
fn opening_highlight(week: &Week, chars: usize, color: HighlightColor, saved: &mut SavedHighlights) {
    let Some(passage) = week.passages.first() else {
        return;
    };
    let mut annotated = AnnotatedPassage::new(&passage.content_html);
    let (Some(start), Some(end)) = (annotated.point_at(0, 0), annotated.point_at(0, chars)) else {
        return;
    };
    if annotated
        .apply_highlight(Some(&TextRange::new(start, end)), color)
        .is_applied()
    {
        saved.insert(format!("{}:0", week.id), annotated.paragraphs().to_vec());
    }
}

fn make_export(name: &str, xp: XpState, history: Vec<Attempt>, mistakes: Vec<Mistake>) -> UserExport {
    UserExport {
        readcoach_export_version: EXPORT_VERSION,
        exported_at: base_time(),
        user: User::from_name(name),
        completed_weeks: Vec::new(),
        mistakes,
        history,
        xp,
        highlights: SavedHighlights::new(),
    }
}

// ── Profiles ─────────────────────────────────────────────────────────────

fn build_new_learner() -> UserExport {
    make_export("new-learner", XpState::default(), Vec::new(), Vec::new())
}

fn build_first_weeks(curriculum: &Curriculum) -> UserExport {
    let mut history = Vec::new();
    let mut mistakes = Vec::new();
    let weeks: Vec<&Week> = curriculum.weeks().iter().take(2).collect();
    for (day, week) in weeks.iter().enumerate() {
        // Every third question of the first week is missed.
        answer_week(
            week,
            day as u32,
            |q| day == 0 && q.id.ends_with('3'),
            &mut history,
            &mut mistakes,
        );
    }

    let mut data = make_export(
        "first-weeks",
        XpState {
            xp: 420,
            daily_xp: 60,
            streak: 2,
            last_active: Some(date(1)),
        },
        history,
        mistakes,
    );
    data.completed_weeks = weeks.iter().map(|w| w.id).collect();
    if let Some(week) = weeks.first() {
        opening_highlight(week, 40, HighlightColor::Main, &mut data.highlights);
    }
    data
}

fn build_struggling_inference(curriculum: &Curriculum) -> UserExport {
    let mut history = Vec::new();
    let mut mistakes = Vec::new();
    for (day, week) in curriculum.weeks().iter().take(4).enumerate() {
        answer_week(
            week,
            day as u32 * 2,
            |q| q.kind == SkillCategory::Inference,
            &mut history,
            &mut mistakes,
        );
    }

    let mut data = make_export(
        "struggling-inference",
        XpState {
            xp: 610,
            daily_xp: 15,
            streak: 1,
            last_active: Some(date(6)),
        },
        history,
        mistakes,
    );
    data.completed_weeks = curriculum.weeks().iter().take(3).map(|w| w.id).collect();
    data
}

fn build_exam_ready(curriculum: &Curriculum) -> UserExport {
    let mut history = Vec::new();
    let mut mistakes = Vec::new();
    for (day, week) in curriculum.weeks().iter().enumerate() {
        answer_week(week, day as u32, |_| false, &mut history, &mut mistakes);
    }

    let mut data = make_export(
        "exam-ready",
        XpState {
            xp: 5200,
            daily_xp: 120,
            streak: 21,
            last_active: Some(date(20)),
        },
        history,
        mistakes,
    );
    data.completed_weeks = curriculum.weeks().iter().map(|w| w.id).collect();
    for week in curriculum.weeks() {
        opening_highlight(week, 25, HighlightColor::Evidence, &mut data.highlights);
    }
    data
}

// ── Main ─────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let curriculum = Curriculum::load()?;
    fs::create_dir_all(OUT_DIR)?;

    let profiles: Vec<(&str, UserExport)> = vec![
        ("01-new-learner", build_new_learner()),
        ("02-first-weeks", build_first_weeks(&curriculum)),
        ("03-struggling-inference", build_struggling_inference(&curriculum)),
        ("04-exam-ready", build_exam_ready(&curriculum)),
    ];

    for (name, data) in &profiles {
        let json = serde_json::to_string_pretty(data)?;
        let path = format!("{OUT_DIR}/{name}.json");
        fs::write(&path, &json).with_context(|| format!("cannot write {path}"))?;
        println!("Wrote {path} ({} bytes)", json.len());
    }

    println!("\nGenerated {} demo profiles.", profiles.len());
    println!("Load one with: readcoach --import {OUT_DIR}/02-first-weeks.json");
    Ok(())
}
