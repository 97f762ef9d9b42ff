use crate::ir::EmployeeRecord;

pub const LEVEL_COUNT: usize = 6;

const TITLE_LEVELS: [(&str, u8); LEVEL_COUNT] = [
    ("Managing Director", 1),
    ("Director", 2),
    ("Vice President", 3),
    ("Assistant Vice President", 4),
    ("Associate", 5),
    ("Analyst", 6),
];

/// Closed mapping from corporate title to rank 1 (most senior) ..= 6.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleHierarchy;

impl TitleHierarchy {
    pub fn rank(title: &str) -> Option<u8> {
        TITLE_LEVELS
            .iter()
            .find(|(name, _)| *name == title)
            .map(|(_, rank)| *rank)
    }

    pub fn rank_of(record: &EmployeeRecord) -> Option<u8> {
        record.title.as_deref().and_then(Self::rank)
    }

    pub fn titles() -> impl Iterator<Item = &'static str> {
        TITLE_LEVELS.iter().map(|(name, _)| *name)
    }

    /// Input indices per level; index 0 holds rank 1. Unranked titles are left out.
    pub fn bucket(records: &[EmployeeRecord]) -> [Vec<usize>; LEVEL_COUNT] {
        let mut buckets: [Vec<usize>; LEVEL_COUNT] = Default::default();
        for (idx, record) in records.iter().enumerate() {
            if let Some(rank) = Self::rank_of(record) {
                buckets[rank as usize - 1].push(idx);
            }
        }
        buckets
    }
}

/// Text shown in a node's title label.
pub fn display_title(title: &str) -> &str {
    if title == "Assistant Vice President" {
        "Assistant VP"
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(id: &str, title: &str) -> EmployeeRecord {
        EmployeeRecord {
            title: Some(title.to_string()),
            ..EmployeeRecord::new(id)
        }
    }

    #[test]
    fn ranks_follow_seniority() {
        assert_eq!(TitleHierarchy::rank("Managing Director"), Some(1));
        assert_eq!(TitleHierarchy::rank("Analyst"), Some(6));
        assert_eq!(TitleHierarchy::rank("analyst"), None);
        assert_eq!(TitleHierarchy::rank("Intern"), None);
        assert_eq!(TitleHierarchy::titles().count(), LEVEL_COUNT);
    }

    #[test]
    fn buckets_drop_unknown_titles() {
        let records = vec![
            titled("1", "Analyst"),
            titled("2", "Chief Vibes Officer"),
            titled("3", "Managing Director"),
            EmployeeRecord::new("4"),
            titled("5", "Analyst"),
        ];
        let buckets = TitleHierarchy::bucket(&records);
        assert_eq!(buckets[0], vec![2]);
        assert_eq!(buckets[5], vec![0, 4]);
        let placed: usize = buckets.iter().map(Vec::len).sum();
        assert_eq!(placed, 3);
    }

    #[test]
    fn only_assistant_vice_president_is_shortened() {
        assert_eq!(display_title("Assistant Vice President"), "Assistant VP");
        assert_eq!(display_title("Vice President"), "Vice President");
        assert_eq!(display_title("assistant vice president"), "assistant vice president");
        assert_eq!(display_title(""), "");
    }
}
