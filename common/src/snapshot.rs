//! 模試リストのスナップショット
//!
//! 導出データはスナップショットのバージョンが変わったときだけ作り直す。

use crate::types::Exam;
use std::sync::Arc;

/// 不変の模試リストとそのバージョン
#[derive(Debug, Clone, Default)]
pub struct ExamSnapshot {
    version: u64,
    exams: Arc<Vec<Exam>>,
}

impl ExamSnapshot {
    pub fn new(exams: Vec<Exam>) -> Self {
        Self { version: 1, exams: Arc::new(exams) }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    /// 模試リストを差し替えた新しいスナップショット
    pub fn replace(&self, exams: Vec<Exam>) -> Self {
        Self {
            version: self.version + 1,
            exams: Arc::new(exams),
        }
    }
}

/// バージョン付きのメモ
#[derive(Debug, Clone)]
pub struct Memo<T> {
    cached: Option<(u64, T)>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// スナップショットのバージョンが変わっていれば `derive` で作り直す
    pub fn get_or_compute<F>(&mut self, snapshot: &ExamSnapshot, derive: F) -> &T
    where
        F: FnOnce(&[Exam]) -> T,
    {
        if !matches!(&self.cached, Some((v, _)) if *v == snapshot.version()) {
            self.cached = None;
        }
        let (_, value) = self.cached.get_or_insert_with(|| {
            tracing::debug!(version = snapshot.version(), "導出データを再計算");
            (snapshot.version(), derive(snapshot.exams()))
        });
        value
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_recomputes_only_on_version_change() {
        let calls = Cell::new(0);
        let snapshot = ExamSnapshot::new(vec![Exam::default()]);
        let mut memo = Memo::new();

        let count = |exams: &[Exam]| {
            calls.set(calls.get() + 1);
            exams.len()
        };

        assert_eq!(*memo.get_or_compute(&snapshot, count), 1);
        assert_eq!(*memo.get_or_compute(&snapshot, count), 1);
        assert_eq!(calls.get(), 1);

        let next = snapshot.replace(vec![Exam::default(), Exam::default()]);
        assert_eq!(next.version(), 2);
        assert_eq!(*memo.get_or_compute(&next, count), 2);
        assert_eq!(calls.get(), 2);

        memo.invalidate();
        assert_eq!(*memo.get_or_compute(&next, count), 2);
        assert_eq!(calls.get(), 3);
    }
}
