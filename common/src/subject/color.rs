//! 科目の表示色
//!
//! 系統ごとのパレット（高彩度 → 低彩度）から、系統内で科目コードの低い順に
//! 彩度の高い色を割り当てる。色は「現在の科目集合」内の順位で決まるため、
//! 科目集合が変わると同じ科目でも色が変わることがある。

use super::{family_digit, SubjectWithCode};
use std::collections::{BTreeMap, HashMap};

/// 系統外の科目の色
pub const FALLBACK_COLOR: &str = "#9ca3af";

const RED_PALETTE: &[&str] = &["#ef4444", "#f87171", "#fecaca"];
const BLUE_PALETTE: &[&str] = &["#3b82f6", "#60a5fa", "#bfdbfe"];
const YELLOW_PALETTE: &[&str] = &["#eab308", "#facc15", "#fef08a"];
const GREEN_PALETTE: &[&str] = &["#22c55e", "#4ade80", "#bbf7d0"];
const ORANGE_PALETTE: &[&str] = &["#f97316", "#fb923c", "#fed7aa"];
const PURPLE_PALETTE: &[&str] = &["#a855f7", "#c084fc", "#e9d5ff"];
const BLACK_PALETTE: &[&str] = &["#374151", "#6b7280", "#d1d5db"];
const FALLBACK_PALETTE: &[&str] = &[FALLBACK_COLOR];

/// 系統のパレット
pub fn palette_for_family(family: u32) -> &'static [&'static str] {
    match family {
        1 => RED_PALETTE,
        2 => BLUE_PALETTE,
        3 => YELLOW_PALETTE,
        4 => GREEN_PALETTE,
        5 => ORANGE_PALETTE,
        6 => PURPLE_PALETTE,
        7 => BLACK_PALETTE,
        _ => FALLBACK_PALETTE,
    }
}

/// 単一の科目コードの色（系統内の順位を考慮しない）
pub fn subject_color_by_code(code: f64) -> &'static str {
    palette_for_family(family_digit(code))[0]
}

/// 科目リスト全体に色を割り当てる
pub fn assign_subject_colors(subjects: &[SubjectWithCode]) -> HashMap<String, &'static str> {
    let mut by_family: BTreeMap<u32, Vec<&SubjectWithCode>> = BTreeMap::new();
    for subject in subjects {
        by_family.entry(subject.family()).or_default().push(subject);
    }

    let mut colors = HashMap::new();
    for (family, mut group) in by_family {
        let palette = palette_for_family(family);
        group.sort_by(|a, b| a.code.total_cmp(&b.code));
        for (idx, subject) in group.into_iter().enumerate() {
            let color = palette[idx.min(palette.len() - 1)];
            colors.insert(subject.name.clone(), color);
        }
    }
    colors
}
