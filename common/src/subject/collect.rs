//! 受験科目の収集
//!
//! 生徒が実際に受験した科目を正規化名でまとめ、科目コードの昇順に並べる。
//! 同じ科目名に複数のコードが現れた場合は、有効なコードのうち最小のものを採用する。

use super::normalize::normalize_subject_name;
use super::{family_digit, is_excluded_family, SubjectWithCode, TOTAL_FAMILY, UNKNOWN_SUBJECT_CODE};
use crate::types::{Exam, Score};
use std::collections::{BTreeSet, HashMap};

/// 受験科目を収集する（科目コード昇順、同コードは初出順）
///
/// 系統8・9の科目は除外する。
pub fn collect_subjects_with_code(exams: &[Exam]) -> Vec<SubjectWithCode> {
    let mut subjects: Vec<SubjectWithCode> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for score in exams.iter().flat_map(|ex| ex.scores.iter()) {
        let canon = normalize_subject_name(score.subject_name.as_deref());
        if canon.is_empty() {
            continue;
        }

        let code = subject_code_of(score);
        if is_excluded_family(family_digit(code)) {
            continue;
        }

        match index_by_name.get(&canon) {
            None => {
                index_by_name.insert(canon.clone(), subjects.len());
                subjects.push(SubjectWithCode::new(canon, code));
            }
            Some(&idx) => {
                let existing = &mut subjects[idx];
                if prefers(code, existing.code) {
                    existing.code = code;
                }
            }
        }
    }

    // 安定ソートなので同コードは初出順のまま
    subjects.sort_by(|a, b| a.code.total_cmp(&b.code));
    subjects
}

/// 新しいコードを既存コードより優先するか
fn prefers(candidate: f64, existing: f64) -> bool {
    match (existing == UNKNOWN_SUBJECT_CODE, candidate == UNKNOWN_SUBJECT_CODE) {
        (true, false) => true,
        (false, false) => candidate < existing,
        _ => false,
    }
}

/// スコアの科目コード（欠落・非数・0以下は不明コード、小数は切り捨てない）
pub fn subject_code_of(score: &Score) -> f64 {
    match score.subject_code {
        Some(code) if code.is_finite() && code > 0.0 => code,
        _ => UNKNOWN_SUBJECT_CODE,
    }
}

/// 科目名 → 科目コードのマップ
pub fn create_subject_code_map(subjects: &[SubjectWithCode]) -> HashMap<String, f64> {
    subjects.iter().map(|s| (s.name.clone(), s.code)).collect()
}

/// デフォルトで表示する科目（系統7 = 合計点系）
pub fn default_checked_subjects(subjects: &[SubjectWithCode]) -> BTreeSet<String> {
    subjects
        .iter()
        .filter(|s| s.family() == TOTAL_FAMILY)
        .map(|s| s.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(name: &str, code: Option<f64>) -> Score {
        Score {
            subject_name: Some(name.to_string()),
            subject_code: code,
            ..Default::default()
        }
    }

    fn exam(scores: Vec<Score>) -> Exam {
        Exam { scores, ..Default::default() }
    }

    #[test]
    fn test_excludes_family_8_and_9() {
        let exams = vec![exam(vec![
            score("英語", Some(1100.0)),
            score("事務A", Some(8000.0)),
            score("事務B", Some(8999.0)),
            score("事務C", Some(9000.0)),
            score("事務D", Some(9999.0)),
        ])];
        let subjects = collect_subjects_with_code(&exams);
        assert_eq!(subjects, vec![SubjectWithCode::new("英語", 1100)]);
    }

    #[test]
    fn test_excluded_score_does_not_register_name() {
        // 除外コードのスコアは名前の登録にも使わない
        let exams = vec![
            exam(vec![score("英語", Some(8100.0))]),
            exam(vec![score("英語", None)]),
        ];
        let subjects = collect_subjects_with_code(&exams);
        assert_eq!(subjects, vec![SubjectWithCode::new("英語", UNKNOWN_SUBJECT_CODE)]);
    }

    #[test]
    fn test_real_code_beats_sentinel() {
        let exams = vec![
            exam(vec![score("X", None)]),
            exam(vec![score("X", Some(2500.0))]),
        ];
        assert_eq!(collect_subjects_with_code(&exams)[0].code, 2500.0);

        let exams = vec![
            exam(vec![score("X", Some(2500.0))]),
            exam(vec![score("X", Some(UNKNOWN_SUBJECT_CODE))]),
        ];
        assert_eq!(collect_subjects_with_code(&exams)[0].code, 2500.0);
    }

    #[test]
    fn test_smaller_code_wins() {
        let exams = vec![
            exam(vec![score("X", Some(2500.0))]),
            exam(vec![score("X", Some(1800.0))]),
            exam(vec![score("X", Some(2100.0))]),
        ];
        assert_eq!(collect_subjects_with_code(&exams)[0].code, 1800.0);
    }

    #[test]
    fn test_fractional_codes_are_kept() {
        // 2500.5 と 2500 は別コードとして比較し、小さい方を採る
        let exams = vec![
            exam(vec![score("X", Some(2500.5))]),
            exam(vec![score("X", Some(2500.0))]),
        ];
        assert_eq!(collect_subjects_with_code(&exams)[0].code, 2500.0);

        let exams = vec![
            exam(vec![score("X", Some(2500.0))]),
            exam(vec![score("X", Some(2500.5))]),
        ];
        assert_eq!(collect_subjects_with_code(&exams)[0].code, 2500.0);

        // 999999.5 は不明コードではない
        let exams = vec![
            exam(vec![score("Y", None)]),
            exam(vec![score("Y", Some(999_999.5))]),
        ];
        let subjects = collect_subjects_with_code(&exams);
        assert_eq!(subjects[0].code, 999_999.5);

        let exams = vec![exam(vec![score("B", Some(1200.0)), score("A", Some(1100.25))])];
        let subjects = collect_subjects_with_code(&exams);
        let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_invalid_codes_become_sentinel() {
        let exams = vec![exam(vec![
            score("A", Some(0.0)),
            score("B", Some(-5.0)),
            score("C", None),
        ])];
        let subjects = collect_subjects_with_code(&exams);
        assert!(subjects.iter().all(|s| s.code == UNKNOWN_SUBJECT_CODE));
        // 同コードは初出順
        let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_merges_normalized_names_and_sorts() {
        let exams = vec![
            exam(vec![score("数学I", Some(2100.0)), score("総合", Some(7100.0))]),
            exam(vec![score("数学Ⅰ", Some(2100.0)), score("英語", Some(1100.0)), score("", Some(1200.0))]),
        ];
        let subjects = collect_subjects_with_code(&exams);
        let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["英語", "数学①", "総合"]);
    }

    #[test]
    fn test_default_checked() {
        let subjects = vec![SubjectWithCode::new("総合", 7100), SubjectWithCode::new("英語", 1100)];
        let checked = default_checked_subjects(&subjects);
        assert_eq!(checked.into_iter().collect::<Vec<_>>(), vec!["総合".to_string()]);

        let subjects = vec![SubjectWithCode::new("英語", 1100)];
        assert!(default_checked_subjects(&subjects).is_empty());
    }

    #[test]
    fn test_code_map() {
        let subjects = vec![SubjectWithCode::new("総合", 7100), SubjectWithCode::new("英語", 1100)];
        let map = create_subject_code_map(&subjects);
        assert_eq!(map.get("英語"), Some(&1100.0));
        assert_eq!(map.len(), 2);
    }
}
