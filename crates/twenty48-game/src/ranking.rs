//! Top-5 leaderboard policy shared by the session and every store.

use twenty48_core::engine::Score;

/// Maximum number of entries kept in the ranking.
pub const RANKING_CAPACITY: usize = 5;
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";
pub const DEFAULT_MAX_NAME_LEN: usize = 20;

/// One leaderboard row. Never mutated after insertion, only evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub id: u64,
    pub name: String,
    pub score: Score,
}

/// Trim `raw`, fall back to `default_name` when blank, and cap the length at
/// `max_chars` characters (at least one).
pub fn normalize_name(raw: &str, default_name: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    let name = if trimmed.is_empty() {
        default_name.trim()
    } else {
        trimmed
    };
    let name = if name.is_empty() { DEFAULT_PLAYER_NAME } else { name };
    name.chars().take(max_chars.max(1)).collect()
}

/// Whether `score` earns a place in `ranking` (sorted descending).
///
/// A ranking with free slots accepts any score. A full ranking requires a
/// score strictly greater than the last entry; ties do not displace it.
pub fn qualifies(ranking: &[RankingEntry], score: Score) -> bool {
    match ranking.get(RANKING_CAPACITY - 1) {
        Some(last) => score > last.score,
        None => true,
    }
}

/// Insert `entry` below every entry with an equal or higher score, then
/// evict everything past the capacity.
pub fn insert_capped(ranking: &mut Vec<RankingEntry>, entry: RankingEntry) {
    let pos = ranking
        .iter()
        .position(|e| e.score < entry.score)
        .unwrap_or(ranking.len());
    ranking.insert(pos, entry);
    ranking.truncate(RANKING_CAPACITY);
}

/// Next free id for a locally built entry.
pub(crate) fn next_id(ranking: &[RankingEntry]) -> u64 {
    ranking.iter().map(|e| e.id).max().map_or(1, |id| id + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking_of(scores: &[Score]) -> Vec<RankingEntry> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| RankingEntry {
                id: i as u64 + 1,
                name: format!("p{}", i + 1),
                score,
            })
            .collect()
    }

    fn scores(ranking: &[RankingEntry]) -> Vec<Score> {
        ranking.iter().map(|e| e.score).collect()
    }

    #[test]
    fn qualification_threshold() {
        assert!(qualifies(&[], 0));
        assert!(qualifies(&ranking_of(&[500, 400, 300, 200]), 10));

        let full = ranking_of(&[500, 400, 300, 200, 100]);
        assert!(qualifies(&full, 350));
        assert!(qualifies(&full, 101));
        assert!(!qualifies(&full, 100));
        assert!(!qualifies(&full, 50));
    }

    #[test]
    fn insert_evicts_lowest() {
        let mut ranking = ranking_of(&[500, 400, 300, 200, 100]);
        insert_capped(
            &mut ranking,
            RankingEntry {
                id: 6,
                name: "new".into(),
                score: 350,
            },
        );
        assert_eq!(scores(&ranking), vec![500, 400, 350, 300, 200]);
        assert_eq!(ranking[2].name, "new");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut ranking = ranking_of(&[300, 200]);
        insert_capped(
            &mut ranking,
            RankingEntry {
                id: 3,
                name: "late".into(),
                score: 200,
            },
        );
        assert_eq!(scores(&ranking), vec![300, 200, 200]);
        assert_eq!(ranking[1].name, "p2");
        assert_eq!(ranking[2].name, "late");
    }

    #[test]
    fn names_are_defaulted_and_capped() {
        assert_eq!(normalize_name("", "Anonymous", 20), "Anonymous");
        assert_eq!(normalize_name("   ", "Anonymous", 20), "Anonymous");
        assert_eq!(normalize_name("  Ana  ", "Anonymous", 20), "Ana");
        assert_eq!(normalize_name("abcdefghij", "Anonymous", 4), "abcd");
        assert_eq!(normalize_name("Jos\u{e9}", "Anonymous", 4), "Jos\u{e9}");
        assert_eq!(normalize_name("", " ", 20), "Anonymous");
    }

    #[test]
    fn next_id_is_past_the_largest() {
        assert_eq!(next_id(&[]), 1);
        let ranking = ranking_of(&[10, 5]);
        assert_eq!(next_id(&ranking), 3);
    }
}
