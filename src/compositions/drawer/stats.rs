use std::collections::BTreeMap;

use crate::animation::color::Color;
use crate::compositions::background::hex_rgb;
use crate::compositions::remap_clamped;
use crate::foundation::error::ReelResult;
use crate::render::element::{Element, pct, px};

use super::{Assessment, SemesterStats, SuccessRate};

const PANEL_BG: Color = hex_rgb(0x1f2937);
const TRACK_BG: Color = hex_rgb(0x0f172a);
const INK: Color = hex_rgb(0xf3f4f6);

const EXAM_ORDER: [&str; 7] = ["A", "B", "C", "D", "E", "F", "FN"];
const CREDIT_ORDER: [&str; 2] = ["zap", "nezap"];

fn grade_color(grade: &str) -> Color {
    match grade {
        "A" | "zap" => hex_rgb(0x10b981),
        "B" => hex_rgb(0x34d399),
        "C" => hex_rgb(0xfbbf24),
        "D" => hex_rgb(0xfb923c),
        "E" => hex_rgb(0xf87171),
        "F" | "nezap" => hex_rgb(0xef4444),
        "FN" => hex_rgb(0x7f1d1d),
        _ => Color::WHITE,
    }
}

/// Per-grade counts summed over every term, in display order.
///
/// Credit courses fold `zap_nedost` into `nezap`. Terms without the matching breakdown fall
/// back to their raw grade map.
pub fn aggregate_grades(semester: &SemesterStats) -> Vec<(&'static str, u32)> {
    let credit = semester.kind == Assessment::Credit;
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for term in &semester.terms {
        match (&term.credit_grades, &term.grades) {
            (Some(cg), _) if credit => {
                *counts.entry("zap").or_default() += cg.zap;
                *counts.entry("nezap").or_default() += cg.nezap + cg.zap_nedost.unwrap_or(0);
            }
            (_, Some(grades)) => {
                for (grade, n) in grades {
                    *counts.entry(grade.as_str()).or_default() += n;
                }
            }
            _ => {}
        }
    }
    let order: &[&'static str] = if credit { &CREDIT_ORDER } else { &EXAM_ORDER };
    order
        .iter()
        .map(|&g| (g, counts.get(g).copied().unwrap_or(0)))
        .collect()
}

/// Grade histogram of the latest semester, or an empty-state notice.
pub fn success_rate(frame: f64, rate: Option<&SuccessRate>) -> ReelResult<Element> {
    let Some(current) = rate.and_then(|r| r.stats.first()) else {
        return Ok(Element::column()
            .key("stats-empty")
            .opacity(0.3)
            .child(
                Element::text("DATA O ÚSPĚŠNOSTI NEJSOU K DISPOZICI.")
                    .font(14.0, 900)
                    .with_style(|s| s.letter_spacing_em = Some(0.2)),
            ));
    };

    let total = current.total_pass + current.total_fail;
    let grades = aggregate_grades(current);
    let max = grades.iter().map(|&(_, n)| n).max().unwrap_or(0).max(1);
    let kind = match current.kind {
        Assessment::Credit => "Zápočet",
        Assessment::Exam => "Zkouška",
    };

    let mut bars = Element::column().key("grade-bars");
    for (i, &(grade, count)) in grades.iter().enumerate() {
        let start = 10.0 + i as f64 * 3.0;
        let grow = remap_clamped(frame, &[start, start + 15.0], &[0.0, 1.0])?;
        let width = f64::from(count) / f64::from(max) * 100.0 * grow;
        let share = if count > 0 && total > 0 {
            format!("{}%", (f64::from(count) / f64::from(total) * 100.0).round())
        } else {
            String::new()
        };
        bars = bars.child(
            Element::row()
                .key(format!("grade-{grade}"))
                .child(Element::text(grade).font(12.0, 700).color(INK.with_alpha(0.4)))
                .child(
                    Element::block()
                        .height(px(28.0))
                        .radius(4.0)
                        .background(TRACK_BG)
                        .border(Color::WHITE.with_alpha(0.05))
                        .child(
                            Element::block()
                                .key(format!("bar-{grade}"))
                                .width(pct(width))
                                .height(pct(100.0))
                                .background(grade_color(grade)),
                        )
                        .child(Element::text(share).font(11.0, 700).color(INK)),
                )
                .child(
                    Element::text(count.to_string())
                        .font(12.0, 700)
                        .color(INK.with_alpha(0.3)),
                ),
        );
    }

    Ok(Element::column()
        .key("stats")
        .background(PANEL_BG)
        .opacity(remap_clamped(frame, &[0.0, 15.0], &[0.0, 1.0])?)
        .child(
            Element::text(format!("{total} studentů ({kind})"))
                .key("stats-total")
                .font(12.0, 700)
                .color(INK.with_alpha(0.4)),
        )
        .child(bars)
        .child(
            Element::text(current.semester.as_str())
                .key("semester")
                .font(10.0, 700)
                .background(TRACK_BG)
                .radius(999.0)
                .color(INK.with_alpha(0.3)),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositions::drawer::{CreditGrades, TermStats};

    fn credit_semester() -> SemesterStats {
        SemesterStats {
            semester: "LS 2023/2024".to_owned(),
            total_pass: 70,
            total_fail: 30,
            kind: Assessment::Credit,
            terms: vec![
                TermStats {
                    grades: None,
                    credit_grades: Some(CreditGrades {
                        zap: 50,
                        nezap: 10,
                        zap_nedost: Some(5),
                    }),
                },
                TermStats {
                    grades: None,
                    credit_grades: Some(CreditGrades {
                        zap: 20,
                        nezap: 15,
                        zap_nedost: None,
                    }),
                },
            ],
        }
    }

    #[test]
    fn credit_terms_fold_insufficient_into_fail() {
        assert_eq!(
            aggregate_grades(&credit_semester()),
            vec![("zap", 70), ("nezap", 30)]
        );
    }

    #[test]
    fn exam_grades_keep_order_and_fill_gaps() {
        let mut grades = BTreeMap::new();
        grades.insert("FN".to_owned(), 2);
        grades.insert("A".to_owned(), 5);
        let sem = SemesterStats {
            semester: "ZS".to_owned(),
            total_pass: 5,
            total_fail: 2,
            kind: Assessment::Exam,
            terms: vec![
                TermStats {
                    grades: Some(grades.clone()),
                    credit_grades: None,
                },
                TermStats {
                    grades: Some(grades),
                    credit_grades: None,
                },
            ],
        };
        let agg = aggregate_grades(&sem);
        assert_eq!(agg.len(), 7);
        assert_eq!(agg[0], ("A", 10));
        assert_eq!(agg[1], ("B", 0));
        assert_eq!(agg[6], ("FN", 4));
    }

    #[test]
    fn bars_grow_staggered() {
        let rate = SuccessRate {
            stats: vec![credit_semester()],
        };
        let at = |frame: f64| success_rate(frame, Some(&rate)).unwrap();
        let width = |el: &Element, key: &str| el.find(key).and_then(|e| e.style.width);

        let early = at(5.0);
        assert_eq!(early.style.opacity.map(|o| (o * 3.0).round()), Some(1.0));
        assert_eq!(width(&early, "bar-zap"), Some(pct(0.0)));

        let mid = at(17.5);
        assert_eq!(width(&mid, "bar-zap"), Some(pct(50.0)));
        match width(&mid, "bar-nezap") {
            Some(crate::render::element::Length::Percent(w)) => {
                assert!((w - 30.0 / 70.0 * 30.0).abs() < 1e-9, "width {w}")
            }
            other => panic!("unexpected width {other:?}"),
        }

        let done = at(40.0);
        assert_eq!(width(&done, "bar-zap"), Some(pct(100.0)));
        assert_eq!(
            done.find("stats-total").map(Element::text_content).as_deref(),
            Some("100 studentů (Zápočet)")
        );
        assert!(done.text_content().contains("70%"));
    }

    #[test]
    fn missing_data_shows_notice() {
        let el = success_rate(20.0, None).unwrap();
        assert_eq!(el.key.as_deref(), Some("stats-empty"));
        let empty = SuccessRate::default();
        assert!(success_rate(0.0, Some(&empty)).unwrap().find("stats-empty").is_some());
    }
}
